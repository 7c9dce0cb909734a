//! Cell - The fundamental display unit
//!
//! Each cell on a display surface holds:
//! - Character (Unicode codepoint)
//! - Device attribute mask (discrete foreground/background color bits,
//!   intensity, reverse video, underscore)
//!
//! Device masks are what a backend understands. Logical attribute words
//! ([`AttrWord`](super::AttrWord)) are turned into device masks by the
//! color table at write time.

bitflags::bitflags! {
    /// Backend attribute mask for one cell.
    ///
    /// Background bits are the foreground bits shifted left by
    /// [`DeviceAttr::BG_SHIFT`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct DeviceAttr: u16 {
        const FG_BLUE      = 0x0001;
        const FG_GREEN     = 0x0002;
        const FG_RED       = 0x0004;
        const FG_INTENSITY = 0x0008;
        const BG_BLUE      = 0x0010;
        const BG_GREEN     = 0x0020;
        const BG_RED       = 0x0040;
        const BG_INTENSITY = 0x0080;
        const REVERSE      = 0x4000;
        const UNDERSCORE   = 0x8000;
    }
}

impl DeviceAttr {
    /// Distance from a foreground color bit to its background bit.
    pub const BG_SHIFT: u32 = 4;

    /// Grey text (all foreground channels) on black.
    pub const DEFAULT: DeviceAttr = DeviceAttr::FG_RED
        .union(DeviceAttr::FG_GREEN)
        .union(DeviceAttr::FG_BLUE);

    /// Derive background bits from foreground bits.
    pub const fn fg_to_bg(fg: DeviceAttr) -> DeviceAttr {
        DeviceAttr::from_bits_truncate((fg.bits() & 0x000f) << Self::BG_SHIFT)
    }

    /// Foreground channel bits as an RGB triple of booleans.
    pub fn fg_rgb(self) -> (bool, bool, bool) {
        (
            self.contains(DeviceAttr::FG_RED),
            self.contains(DeviceAttr::FG_GREEN),
            self.contains(DeviceAttr::FG_BLUE),
        )
    }

    /// Background channel bits as an RGB triple of booleans.
    pub fn bg_rgb(self) -> (bool, bool, bool) {
        (
            self.contains(DeviceAttr::BG_RED),
            self.contains(DeviceAttr::BG_GREEN),
            self.contains(DeviceAttr::BG_BLUE),
        )
    }
}

/// Background character used to fill cleared surfaces
pub const BLANK: char = ' ';

/// A single character cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character to display
    pub ch: char,
    /// Device attribute mask
    pub attrs: DeviceAttr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: BLANK,
            attrs: DeviceAttr::DEFAULT,
        }
    }
}

impl Cell {
    /// Create a cell with default attributes
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            ..Default::default()
        }
    }

    /// Create a cell with an explicit device mask
    pub fn with_attrs(ch: char, attrs: DeviceAttr) -> Self {
        Self { ch, attrs }
    }

    /// Clear the cell to the background character
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fg_to_bg() {
        let fg = DeviceAttr::FG_RED | DeviceAttr::FG_BLUE;
        assert_eq!(DeviceAttr::fg_to_bg(fg), DeviceAttr::BG_RED | DeviceAttr::BG_BLUE);
        // Only the four foreground bits move.
        assert_eq!(DeviceAttr::fg_to_bg(DeviceAttr::REVERSE), DeviceAttr::empty());
    }

    #[test]
    fn test_default_cell() {
        let cell = Cell::default();
        assert_eq!(cell.ch, ' ');
        assert_eq!(cell.attrs.fg_rgb(), (true, true, true));
        assert_eq!(cell.attrs.bg_rgb(), (false, false, false));
    }
}
