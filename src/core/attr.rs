//! Attribute words - style bits plus a color-pair index
//!
//! An attribute word packs two things into a `u32`:
//! - Independent style flags in the low-order bits, one bit each
//! - A color-pair index in the top `COLOR_BITS` bits
//!
//! ```text
//!  31      26 25                      9 8                        0
//! +----------+-------------------------+--------------------------+
//! | pair idx |        (unused)         |        style flags       |
//! +----------+-------------------------+--------------------------+
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Width of the color-pair field.
pub const COLOR_BITS: u32 = 6;

/// Bit position where the color-pair field starts.
pub const PAIR_SHIFT: u32 = u32::BITS - COLOR_BITS;

/// Number of addressable color pairs (`2^COLOR_BITS`).
pub const MAX_PAIRS: usize = 1 << COLOR_BITS;

bitflags::bitflags! {
    /// Style flags stored in the low-order bits of an [`AttrWord`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Style: u32 {
        /// Alternate character set.
        const ALTCHARSET = 1 << 0;
        const BLINK      = 1 << 1;
        /// Extra bright or bold.
        const BOLD       = 1 << 2;
        /// Half bright.
        const DIM        = 1 << 3;
        const INVIS      = 1 << 4;
        const PROTECT    = 1 << 5;
        /// Reverse video.
        const REVERSE    = 1 << 6;
        /// Best highlighting mode of the display.
        const STANDOUT   = 1 << 7;
        const UNDERLINE  = 1 << 8;
    }
}

// Style bits must stay below the pair field.
const _: () = assert!(Style::all().bits() < (1 << PAIR_SHIFT));

/// A packed attribute word: style flags and a color-pair index.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct AttrWord(u32);

impl AttrWord {
    /// No style, pair 0.
    pub const NORMAL: AttrWord = AttrWord(0);

    /// Pack style flags and a pair index.
    ///
    /// Pair indices wider than `COLOR_BITS` lose their high bits in the
    /// shift; they are not clamped.
    pub const fn pack(style: Style, pair: u32) -> Self {
        AttrWord(style.bits() | (pair << PAIR_SHIFT))
    }

    /// Wrap a raw word.
    pub const fn from_bits(bits: u32) -> Self {
        AttrWord(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// The style flags of this word.
    pub const fn style(self) -> Style {
        Style::from_bits_truncate(self.0)
    }

    /// The color-pair index of this word.
    pub const fn pair(self) -> u32 {
        self.0 >> PAIR_SHIFT
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: AttrWord) -> bool {
        self.0 & other.0 == other.0
    }
}

/// The attribute word selecting color pair `n`.
pub const fn color_pair(n: u32) -> AttrWord {
    AttrWord::pack(Style::empty(), n)
}

/// The color-pair index stored in `word`.
pub const fn pair_number(word: AttrWord) -> u32 {
    word.pair()
}

impl From<Style> for AttrWord {
    fn from(style: Style) -> Self {
        AttrWord(style.bits())
    }
}

impl BitOr for AttrWord {
    type Output = AttrWord;

    fn bitor(self, rhs: AttrWord) -> AttrWord {
        AttrWord(self.0 | rhs.0)
    }
}

impl BitOr<Style> for AttrWord {
    type Output = AttrWord;

    fn bitor(self, rhs: Style) -> AttrWord {
        AttrWord(self.0 | rhs.bits())
    }
}

impl BitOr<AttrWord> for Style {
    type Output = AttrWord;

    fn bitor(self, rhs: AttrWord) -> AttrWord {
        AttrWord(self.bits() | rhs.0)
    }
}

impl BitOrAssign for AttrWord {
    fn bitor_assign(&mut self, rhs: AttrWord) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AttrWord {
    type Output = AttrWord;

    fn bitand(self, rhs: AttrWord) -> AttrWord {
        AttrWord(self.0 & rhs.0)
    }
}

impl Not for AttrWord {
    type Output = AttrWord;

    fn not(self) -> AttrWord {
        AttrWord(!self.0)
    }
}

impl fmt::Debug for AttrWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrWord")
            .field("style", &self.style())
            .field("pair", &self.pair())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let word = AttrWord::pack(Style::BOLD | Style::UNDERLINE, 5);
        assert_eq!(word.style(), Style::BOLD | Style::UNDERLINE);
        assert_eq!(word.pair(), 5);
        assert_eq!(word.bits() >> 26, 5);
        assert_eq!(PAIR_SHIFT, 26);
        assert_eq!(MAX_PAIRS, 64);
    }

    #[test]
    fn test_pair_truncated_by_shift() {
        // 65 = 0b1_000001: the seventh bit falls off the top.
        assert_eq!(color_pair(65).pair(), 1);
        assert_eq!(color_pair(64).pair(), 0);
    }

    #[test]
    fn test_style_does_not_leak_into_pair() {
        let word = AttrWord::from(Style::all());
        assert_eq!(pair_number(word), 0);
    }

    #[test]
    fn test_combine_and_clear() {
        let word = Style::REVERSE | color_pair(3);
        assert!(word.contains(Style::REVERSE.into()));
        let cleared = word & !AttrWord::from(Style::REVERSE);
        assert_eq!(cleared, color_pair(3));
        let cleared = word & !color_pair(3);
        assert_eq!(cleared, AttrWord::from(Style::REVERSE));
    }
}
