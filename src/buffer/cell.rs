//! Cell: the atomic unit of terminal display.
//!
//! A cell is a glyph plus the style it is drawn with. Styles carry a
//! foreground and background [`Color`] and a set of [`Attrs`] flags.
//! Wide glyphs (CJK, some emoji) occupy a lead cell followed by a
//! zero-width continuation cell.

use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

/// A terminal color.
///
/// Either the terminal's configured default, one of the 256 palette
/// entries, or a 24-bit true color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default foreground or background.
    #[default]
    Default,
    /// An indexed palette color (0-255).
    Named(u8),
    /// A 24-bit true color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Black (palette index 0).
    pub const BLACK: Self = Self::Named(0);
    /// Red (palette index 1).
    pub const RED: Self = Self::Named(1);
    /// Green (palette index 2).
    pub const GREEN: Self = Self::Named(2);
    /// Yellow (palette index 3).
    pub const YELLOW: Self = Self::Named(3);
    /// Blue (palette index 4).
    pub const BLUE: Self = Self::Named(4);
    /// Magenta (palette index 5).
    pub const MAGENTA: Self = Self::Named(5);
    /// Cyan (palette index 6).
    pub const CYAN: Self = Self::Named(6);
    /// White (palette index 7).
    pub const WHITE: Self = Self::Named(7);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::Rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl From<(u8, u8, u8)> for Color {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::Rgb(r, g, b)
    }
}

bitflags! {
    /// Text style attributes.
    ///
    /// These can be combined using bitwise OR.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u8 {
        /// Bold text.
        const BOLD = 0b0000_0001;
        /// Dim/faint text.
        const DIM = 0b0000_0010;
        /// Underlined text.
        const UNDERLINE = 0b0000_0100;
        /// Blinking text.
        const BLINK = 0b0000_1000;
        /// Reversed colors (fg/bg swapped).
        const REVERSED = 0b0001_0000;
    }
}

impl std::fmt::Debug for Attrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// The visual style of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Attribute flags.
    pub attrs: Attrs,
}

impl Style {
    /// The terminal's default style: default colors, no attributes.
    pub const DEFAULT: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        attrs: Attrs::empty(),
    };

    /// Create a style with the given foreground color.
    #[inline]
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: color,
            bg: Color::Default,
            attrs: Attrs::empty(),
        }
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Add attribute flags (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = self.attrs.union(attrs);
        self
    }
}

/// A single terminal cell: one glyph drawn with one style.
///
/// `width` is the glyph's display width (0 for a wide-glyph continuation,
/// 1 for normal, 2 for wide CJK).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The glyph to display.
    pub glyph: char,
    /// Display width of the glyph (0 = continuation, 1 = normal, 2 = wide).
    pub width: u8,
    /// The style the glyph is drawn with.
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space with default style).
    pub const EMPTY: Self = Self {
        glyph: ' ',
        width: 1,
        style: Style::DEFAULT,
    };

    /// Create a cell from a glyph with the default style.
    #[inline]
    pub fn new(glyph: char) -> Self {
        Self::styled(glyph, Style::DEFAULT)
    }

    /// Create a cell from a glyph and a style.
    #[inline]
    pub fn styled(glyph: char, style: Style) -> Self {
        let width = UnicodeWidthChar::width(glyph).unwrap_or(0) as u8;
        Self {
            glyph,
            width,
            style,
        }
    }

    /// Create a wide-glyph continuation cell.
    ///
    /// Placed after a wide glyph that takes 2 columns. The background is
    /// inherited so the hidden column paints consistently.
    #[inline]
    pub const fn continuation(style: Style) -> Self {
        Self {
            glyph: '\0',
            width: 0,
            style,
        }
    }

    /// Check if this is a wide-glyph continuation.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.width == 0 && self.glyph == '\0'
    }

    /// Set the style (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Reset the cell to empty (space with default style).
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }
}
