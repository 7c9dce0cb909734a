//! Color palette and color-pair registry
//!
//! The palette holds `NUM_COLORS` RGB definitions with channels in
//! `0..=1000`. The pair table maps a pair index to a (foreground,
//! background) palette index. Pair 0 is the default pair and cannot be
//! reassigned through [`ColorTable::define_pair`].
//!
//! Nothing here is usable until [`ColorTable::enable`] has been called.

use super::attr::{AttrWord, MAX_PAIRS};
use super::cell::DeviceAttr;
use crate::error::{CursesError, Result};

/// Palette size.
pub const NUM_COLORS: usize = 8;

/// Upper bound of an RGB channel.
pub const CHANNEL_MAX: u16 = 1000;

/// The eight named colors, in palette order.
///
/// The ordering follows the display's bit layout: bit 0 blue, bit 1
/// green, bit 2 red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Yellow = 6,
    White = 7,
}

impl Color {
    pub const ALL: [Color; NUM_COLORS] = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Yellow,
        Color::White,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Default RGB definition of this color.
    pub fn default_rgb(self) -> Rgb {
        let v = self as u8;
        let on = |bit: u8| if v & bit != 0 { CHANNEL_MAX } else { 0 };
        Rgb {
            r: on(4),
            g: on(2),
            b: on(1),
        }
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> u8 {
        color.index()
    }
}

/// One palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Rgb {
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }
}

/// Foreground and background palette indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorPair {
    pub fg: u8,
    pub bg: u8,
}

impl ColorPair {
    pub const fn new(fg: u8, bg: u8) -> Self {
        Self { fg, bg }
    }
}

/// Fixed capabilities of the display, answered without probing hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCapabilities {
    pub has_colors: bool,
    pub can_change_color: bool,
}

impl Default for ColorCapabilities {
    fn default() -> Self {
        Self {
            has_colors: true,
            can_change_color: false,
        }
    }
}

/// Palette, pair table and the color-mode switch
#[derive(Debug, Clone)]
pub struct ColorTable {
    caps: ColorCapabilities,
    palette: [Rgb; NUM_COLORS],
    pairs: [ColorPair; MAX_PAIRS],
    palette_loaded: bool,
    enabled: bool,
}

impl ColorTable {
    pub fn new(caps: ColorCapabilities) -> Self {
        Self {
            caps,
            palette: [Rgb::default(); NUM_COLORS],
            pairs: [ColorPair::default(); MAX_PAIRS],
            palette_loaded: false,
            enabled: false,
        }
    }

    pub fn supports_color(&self) -> bool {
        self.caps.has_colors
    }

    pub fn can_redefine_colors(&self) -> bool {
        self.caps.can_change_color
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of palette entries, or 0 when the display has no color.
    pub fn colors(&self) -> usize {
        if self.caps.has_colors { NUM_COLORS } else { 0 }
    }

    /// Number of color pairs, or 0 when the display has no color.
    pub fn color_pairs(&self) -> usize {
        if self.caps.has_colors { MAX_PAIRS } else { 0 }
    }

    /// Turn color mode on.
    ///
    /// Loads the named default colors the first time, then (re)assigns
    /// pair 0 to white on black. Calling it again is harmless: colors
    /// redefined in between are kept.
    pub fn enable(&mut self) -> Result<()> {
        if !self.caps.has_colors {
            return Err(CursesError::ColorModeDisabled);
        }
        if !self.palette_loaded {
            for color in Color::ALL {
                self.palette[color.index() as usize] = color.default_rgb();
            }
            self.palette_loaded = true;
        }
        self.pairs[0] = ColorPair::new(Color::White.index(), Color::Black.index());
        self.enabled = true;
        Ok(())
    }

    fn require_enabled(&self) -> Result<()> {
        if self.enabled && self.caps.has_colors {
            Ok(())
        } else {
            Err(CursesError::ColorModeDisabled)
        }
    }

    fn check_color(&self, index: usize) -> Result<()> {
        if index < self.colors() {
            Ok(())
        } else {
            Err(CursesError::ColorOutOfRange {
                index,
                limit: self.colors(),
            })
        }
    }

    /// Redefine a palette entry. Nothing changes unless every check passes.
    pub fn define_color(&mut self, index: usize, rgb: Rgb) -> Result<()> {
        self.require_enabled()?;
        if !self.caps.can_change_color {
            return Err(CursesError::ColorsUnchangeable);
        }
        self.check_color(index)?;
        for channel in [rgb.r, rgb.g, rgb.b] {
            if channel > CHANNEL_MAX {
                return Err(CursesError::ChannelOutOfRange(channel));
            }
        }
        self.palette[index] = rgb;
        Ok(())
    }

    /// Current definition of a palette entry.
    pub fn color_content(&self, index: usize) -> Result<Rgb> {
        self.require_enabled()?;
        self.check_color(index)?;
        Ok(self.palette[index])
    }

    /// Assign a pair. Pair 0 is rejected.
    pub fn define_pair(&mut self, pair: usize, fg: u8, bg: u8) -> Result<()> {
        self.require_enabled()?;
        if pair == 0 || pair >= self.color_pairs() {
            return Err(CursesError::PairOutOfRange {
                pair,
                min: 1,
                capacity: self.color_pairs(),
            });
        }
        self.check_color(usize::from(fg))?;
        self.check_color(usize::from(bg))?;
        self.pairs[pair] = ColorPair::new(fg, bg);
        Ok(())
    }

    /// Foreground and background of a pair.
    pub fn pair_colors(&self, pair: usize) -> Result<ColorPair> {
        self.require_enabled()?;
        self.pairs.get(pair).copied().ok_or(CursesError::PairOutOfRange {
            pair,
            min: 0,
            capacity: self.color_pairs(),
        })
    }

    /// Device mask for the color channels of one palette entry, as
    /// foreground bits. Any nonzero channel turns its bit on.
    fn discrete_fg(&self, color: u8) -> DeviceAttr {
        let rgb = self.palette.get(usize::from(color)).copied().unwrap_or_default();
        let mut mask = DeviceAttr::empty();
        if rgb.r != 0 {
            mask |= DeviceAttr::FG_RED;
        }
        if rgb.g != 0 {
            mask |= DeviceAttr::FG_GREEN;
        }
        if rgb.b != 0 {
            mask |= DeviceAttr::FG_BLUE;
        }
        mask
    }

    /// Device color bits for a pair. Background bits are derived from the
    /// foreground mapping of the background color by a fixed shift.
    pub fn pair_to_device_mask(&self, pair: u32) -> DeviceAttr {
        let entry = self.pairs.get(pair as usize).copied().unwrap_or_default();
        self.discrete_fg(entry.fg) | DeviceAttr::fg_to_bg(self.discrete_fg(entry.bg))
    }

    /// Device mask for an attribute word: style bits plus, with color mode
    /// on, the pair's color bits. With color mode off the default grey on
    /// black is used.
    pub fn device_mask(&self, word: AttrWord) -> DeviceAttr {
        use super::attr::Style;

        let style = word.style();
        let mut mask = DeviceAttr::empty();
        if style.contains(Style::BOLD) {
            mask |= DeviceAttr::FG_INTENSITY;
        }
        if style.contains(Style::REVERSE) {
            mask |= DeviceAttr::REVERSE;
        }
        if style.contains(Style::STANDOUT) {
            mask |= DeviceAttr::BG_INTENSITY;
        }
        if style.contains(Style::UNDERLINE) {
            mask |= DeviceAttr::UNDERSCORE;
        }
        if self.enabled {
            mask | self.pair_to_device_mask(word.pair())
        } else {
            mask | DeviceAttr::DEFAULT
        }
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new(ColorCapabilities::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attr::{color_pair, Style};

    fn enabled(can_change: bool) -> ColorTable {
        let mut table = ColorTable::new(ColorCapabilities {
            has_colors: true,
            can_change_color: can_change,
        });
        table.enable().unwrap();
        table
    }

    #[test]
    fn test_disabled_until_enabled() {
        let mut table = ColorTable::default();
        assert!(matches!(table.pair_colors(0), Err(CursesError::ColorModeDisabled)));
        assert!(matches!(table.define_pair(1, 1, 2), Err(CursesError::ColorModeDisabled)));
        assert!(matches!(table.color_content(1), Err(CursesError::ColorModeDisabled)));
    }

    #[test]
    fn test_enable_sets_defaults() {
        let table = enabled(false);
        assert_eq!(table.pair_colors(0).unwrap(), ColorPair::new(7, 0));
        assert_eq!(table.color_content(Color::Yellow as usize).unwrap(), Rgb::new(1000, 1000, 0));
        assert_eq!(table.color_content(Color::Blue as usize).unwrap(), Rgb::new(0, 0, 1000));
    }

    #[test]
    fn test_pair_zero_is_protected() {
        let mut table = enabled(false);
        assert!(table.define_pair(0, 1, 2).is_err());
        assert_eq!(table.pair_colors(0).unwrap(), ColorPair::new(7, 0));
    }

    #[test]
    fn test_define_pair_range() {
        let mut table = enabled(false);
        table.define_pair(63, 4, 1).unwrap();
        assert_eq!(table.pair_colors(63).unwrap(), ColorPair::new(4, 1));
        assert!(table.define_pair(64, 4, 1).is_err());
        assert!(table.pair_colors(64).is_err());
        assert!(table.define_pair(5, 8, 0).is_err());
    }

    #[test]
    fn test_define_color_requires_capability() {
        let mut table = enabled(false);
        assert!(matches!(
            table.define_color(1, Rgb::new(10, 10, 10)),
            Err(CursesError::ColorsUnchangeable)
        ));

        let mut table = enabled(true);
        table.define_color(1, Rgb::new(10, 20, 30)).unwrap();
        assert_eq!(table.color_content(1).unwrap(), Rgb::new(10, 20, 30));
        assert!(table.define_color(1, Rgb::new(1001, 0, 0)).is_err());
        assert!(table.define_color(8, Rgb::new(0, 0, 0)).is_err());
        assert_eq!(table.color_content(1).unwrap(), Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_enable_keeps_redefined_colors() {
        let mut table = enabled(true);
        table.define_color(2, Rgb::new(500, 500, 500)).unwrap();
        table.enable().unwrap();
        assert_eq!(table.color_content(2).unwrap(), Rgb::new(500, 500, 500));
    }

    #[test]
    fn test_pair_device_mask() {
        let mut table = enabled(false);
        table.define_pair(1, Color::Red.index(), Color::Blue.index()).unwrap();
        assert_eq!(table.pair_to_device_mask(1), DeviceAttr::FG_RED | DeviceAttr::BG_BLUE);

        table.define_pair(2, Color::Yellow.index(), Color::Cyan.index()).unwrap();
        assert_eq!(
            table.pair_to_device_mask(2),
            DeviceAttr::FG_RED | DeviceAttr::FG_GREEN | DeviceAttr::BG_GREEN | DeviceAttr::BG_BLUE
        );
        assert_eq!(table.pair_to_device_mask(0), DeviceAttr::DEFAULT);
    }

    #[test]
    fn test_device_mask_styles() {
        let table = ColorTable::default();
        let mask = table.device_mask(Style::BOLD | Style::UNDERLINE | color_pair(3));
        assert!(mask.contains(DeviceAttr::FG_INTENSITY | DeviceAttr::UNDERSCORE));
        // Color mode off: default colors regardless of pair.
        assert!(mask.contains(DeviceAttr::DEFAULT));
        assert!(!mask.intersects(DeviceAttr::BG_RED | DeviceAttr::BG_GREEN | DeviceAttr::BG_BLUE));
    }
}
