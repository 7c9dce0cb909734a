//! cellcurses - curses-style windows over a double-buffered cell display
//!
//! # Overview
//!
//! cellcurses provides:
//! - Windows with a cursor, attributes and input flags
//! - Double-buffered output: writes go to a back surface, refresh
//!   publishes it and carries it forward
//! - Attribute words packing style bits and a color-pair index
//! - A fixed palette and color-pair table
//! - Keyboard input translated to curses key codes in keypad mode
//! - Bounded formatted output (`printw!` and friends)
//! - An ANSI terminal backend and an in-memory backend for tests
//!
//! # Example
//!
//! ```no_run
//! use cellcurses::{mvprintw, Config, Screen, Style, color_pair, Color};
//! use cellcurses::backend::{AnsiBackend, TtyInput};
//!
//! # fn main() -> cellcurses::Result<()> {
//! let config = Config::default();
//! let backend = AnsiBackend::new(std::io::stdout(), config.fallback_size());
//! let mut scr = Screen::init(backend, TtyInput::new()?, config)?;
//! scr.cbreak()?;
//! scr.start_color()?;
//! scr.init_pair(1, Color::Yellow.index(), Color::Blue.index())?;
//! scr.attr_set(scr.stdscr(), Style::BOLD | color_pair(1))?;
//! mvprintw!(scr, 2, 4, "Hello, {}!", "world")?;
//! scr.refresh()?;
//! scr.get_ch()?;
//! scr.end()?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod input;
pub mod screen;

// Re-export commonly used types
pub use backend::{
    AnsiBackend, CursorVisibility, DisplayBackend, InputMode, InputSource, MemoryBackend,
    ModeControl, ScriptedInput, SurfaceId, TimeoutPolicy,
};
pub use config::{Config, ScratchBound};
pub use core::{
    color_pair, pair_number, AttrWord, Cell, Color, ColorPair, DeviceAttr, Grid, Rgb, Size,
    Style, Window, WindowId,
};
pub use error::{CursesError, ErrorKind, Result};
pub use input::{InputParser, Key, KeyCode, RawEvent, VirtualKey};
pub use screen::Screen;
