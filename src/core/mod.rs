//! Core data structures:
//! - Cell: one character position on a surface
//! - Grid: the cells of one surface
//! - AttrWord: packed style bits and color-pair index
//! - ColorTable: palette and color pairs
//! - Window: cursor, attributes, flags and buffer roles

pub mod attr;
pub mod cell;
pub mod color;
pub mod grid;
pub mod window;

pub use attr::{color_pair, pair_number, AttrWord, Style, COLOR_BITS, MAX_PAIRS, PAIR_SHIFT};
pub use cell::{Cell, DeviceAttr, BLANK};
pub use color::{Color, ColorCapabilities, ColorPair, ColorTable, Rgb, CHANNEL_MAX, NUM_COLORS};
pub use grid::{Grid, Rect, Size};
pub use window::{Window, WindowFlags, WindowId, WindowTable};
