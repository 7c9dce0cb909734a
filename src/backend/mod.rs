//! Display backends and input sources
//!
//! The screen drives a [`DisplayBackend`] for output and an
//! [`InputSource`] + [`ModeControl`] for keyboard input. Backends hand
//! out opaque [`SurfaceId`]s; the screen never interprets them.

pub mod ansi;
pub mod memory;
#[cfg(unix)]
pub mod tty;

pub use ansi::AnsiBackend;
pub use memory::{MemoryBackend, ScriptedInput};
#[cfg(unix)]
pub use tty::TtyInput;

use crate::core::{Cell, DeviceAttr, Rect, Size};
use crate::error::{CursesError, Result};
use crate::input::RawEvent;

/// Opaque handle to a backend surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

/// Visible cursor shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorVisibility {
    Invisible,
    #[default]
    Normal,
    VeryVisible,
}

impl CursorVisibility {
    /// Parse the classic 0/1/2 encoding
    pub fn from_i32(value: i32) -> Result<Self> {
        match value {
            0 => Ok(CursorVisibility::Invisible),
            1 => Ok(CursorVisibility::Normal),
            2 => Ok(CursorVisibility::VeryVisible),
            other => Err(CursesError::InvalidArgument(format!(
                "cursor visibility {} is not 0, 1 or 2",
                other
            ))),
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            CursorVisibility::Invisible => 0,
            CursorVisibility::Normal => 1,
            CursorVisibility::VeryVisible => 2,
        }
    }
}

/// How long a poll may wait for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Return at once when nothing is pending
    Immediate,
    /// Wait until an event arrives or the source closes
    Block,
}

bitflags::bitflags! {
    /// Input-source behavior toggled through [`ModeControl`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InputMode: u8 {
        /// Deliver input a line at a time.
        const LINE_INPUT      = 1 << 0;
        /// Interpret interrupt and suspend keys as signals.
        const PROCESSED_INPUT = 1 << 1;
    }
}

/// Trait for display backends
pub trait DisplayBackend {
    /// Backend name
    fn name(&self) -> &str;

    /// Size of the display in cells
    fn query_geometry(&mut self) -> Result<Size>;

    /// Allocate a blank surface
    fn create_surface(&mut self, size: Size) -> Result<SurfaceId>;

    /// Release a surface
    fn destroy_surface(&mut self, surface: SurfaceId) -> Result<()>;

    /// Reset every cell of a surface to blank
    fn clear_surface(&mut self, surface: SurfaceId) -> Result<()>;

    /// Make a surface the visible one
    fn publish(&mut self, surface: SurfaceId) -> Result<()>;

    fn write_cell(
        &mut self,
        surface: SurfaceId,
        row: usize,
        col: usize,
        ch: char,
        attrs: DeviceAttr,
    ) -> Result<()>;

    fn read_region(&mut self, surface: SurfaceId, rect: Rect) -> Result<Vec<Cell>>;

    fn write_region(&mut self, surface: SurfaceId, rect: Rect, cells: &[Cell]) -> Result<()>;

    /// Place the visible cursor on a surface
    fn set_cursor(&mut self, surface: SurfaceId, row: usize, col: usize) -> Result<()>;

    fn set_cursor_visibility(&mut self, visibility: CursorVisibility) -> Result<()>;

    /// Return the display to its pre-session state
    fn restore(&mut self) -> Result<()>;
}

/// A source of raw keyboard events
pub trait InputSource {
    /// Next event, or `None` if nothing arrived under `policy`
    fn poll_event(&mut self, policy: TimeoutPolicy) -> Result<Option<RawEvent>>;
}

/// Line-buffering and signal-processing switches of an input source
pub trait ModeControl {
    fn set_input_mode_bits(&mut self, mask: InputMode) -> Result<()>;

    fn clear_input_mode_bits(&mut self, mask: InputMode) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_encoding() {
        assert_eq!(CursorVisibility::from_i32(0).unwrap(), CursorVisibility::Invisible);
        assert_eq!(CursorVisibility::from_i32(2).unwrap().as_i32(), 2);
        assert!(CursorVisibility::from_i32(3).is_err());
        assert_eq!(CursorVisibility::default(), CursorVisibility::Normal);
    }
}
