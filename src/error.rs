//! Error types for screen, window and color operations.
//!
//! Every fallible operation returns [`Result`]. A failed operation leaves
//! window, color and buffer state exactly as it was before the call.

use std::fmt;
use std::io;
use thiserror::Error;

use crate::core::WindowId;

/// Coarse classification of a [`CursesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A move or write outside the window extent.
    Bounds,
    /// Color operation while color mode is off or unsupported.
    Capability,
    /// Formatted output did not fit the scratch area.
    Exhausted,
    /// Display backend or input source failure.
    Backend,
    /// The window was never created or has been torn down.
    InvalidHandle,
    /// No-delay read with no pending input.
    NoInput,
    /// Caller passed an argument outside the accepted domain, or one
    /// that failed to format.
    Usage,
    /// Configuration could not be parsed.
    Config,
}

#[derive(Error, Debug)]
pub enum CursesError {
    #[error("position ({row}, {col}) is outside the {rows}x{cols} window")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("color mode has not been started")]
    ColorModeDisabled,

    #[error("the display cannot redefine colors")]
    ColorsUnchangeable,

    #[error("color {index} is outside the palette of {limit}")]
    ColorOutOfRange { index: usize, limit: usize },

    #[error("color pair {pair} is outside the accepted range {min}..{capacity}")]
    PairOutOfRange {
        pair: usize,
        min: usize,
        capacity: usize,
    },

    #[error("color channel value {0} is outside 0..=1000")]
    ChannelOutOfRange(u16),

    #[error("formatted output exceeds the {bound}-cell scratch area")]
    ScratchOverflow { bound: usize },

    #[error("display backend fault: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("input source closed")]
    InputClosed,

    #[error("window {0} does not exist or has been deleted")]
    InvalidHandle(WindowId),

    #[error("no input available")]
    NoInput,

    #[error("formatting failed: {0}")]
    Format(#[from] fmt::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl CursesError {
    /// Which failure category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CursesError::OutOfBounds { .. } => ErrorKind::Bounds,
            CursesError::ColorModeDisabled
            | CursesError::ColorsUnchangeable
            | CursesError::ColorOutOfRange { .. }
            | CursesError::PairOutOfRange { .. }
            | CursesError::ChannelOutOfRange(_) => ErrorKind::Capability,
            CursesError::ScratchOverflow { .. } => ErrorKind::Exhausted,
            CursesError::Backend(_) | CursesError::Io(_) | CursesError::InputClosed => {
                ErrorKind::Backend
            }
            CursesError::InvalidHandle(_) => ErrorKind::InvalidHandle,
            CursesError::NoInput => ErrorKind::NoInput,
            CursesError::Format(_) | CursesError::InvalidArgument(_) => ErrorKind::Usage,
            CursesError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn backend(msg: impl Into<String>) -> Self {
        CursesError::Backend(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CursesError>;
