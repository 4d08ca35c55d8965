// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Color labels and display values.

use std::fmt;
use std::str::FromStr;

/// One facelet label: one of the six sticker colors, or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorLabel {
    /// Red sticker (`r`).
    Red,
    /// Blue sticker (`b`).
    Blue,
    /// Green sticker (`g`).
    Green,
    /// Orange sticker (`o`).
    Orange,
    /// Yellow sticker (`y`).
    Yellow,
    /// White sticker (`w`).
    White,
    /// Not filled in yet (`x`).
    Empty,
}

impl ColorLabel {
    /// The six sticker colors, excluding [`ColorLabel::Empty`].
    pub const COLORS: [ColorLabel; 6] = [
        ColorLabel::Red,
        ColorLabel::Blue,
        ColorLabel::Green,
        ColorLabel::Orange,
        ColorLabel::Yellow,
        ColorLabel::White,
    ];

    /// Single-character wire form used in color-state strings.
    pub fn as_char(self) -> char {
        match self {
            ColorLabel::Red => 'r',
            ColorLabel::Blue => 'b',
            ColorLabel::Green => 'g',
            ColorLabel::Orange => 'o',
            ColorLabel::Yellow => 'y',
            ColorLabel::White => 'w',
            ColorLabel::Empty => 'x',
        }
    }

    /// Parse the single-character wire form.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'r' => Some(ColorLabel::Red),
            'b' => Some(ColorLabel::Blue),
            'g' => Some(ColorLabel::Green),
            'o' => Some(ColorLabel::Orange),
            'y' => Some(ColorLabel::Yellow),
            'w' => Some(ColorLabel::White),
            'x' => Some(ColorLabel::Empty),
            _ => None,
        }
    }

    /// Lowercase human name ("red", ..., "empty").
    pub fn name(self) -> &'static str {
        match self {
            ColorLabel::Red => "red",
            ColorLabel::Blue => "blue",
            ColorLabel::Green => "green",
            ColorLabel::Orange => "orange",
            ColorLabel::Yellow => "yellow",
            ColorLabel::White => "white",
            ColorLabel::Empty => "empty",
        }
    }

    /// True for [`ColorLabel::Empty`].
    pub fn is_empty(self) -> bool {
        self == ColorLabel::Empty
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorLabel {
    type Err = String;

    /// Accepts either the wire character or the full name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return ColorLabel::from_char(c).ok_or_else(|| format!("unknown color label '{s}'"));
        }
        ColorLabel::COLORS
            .iter()
            .copied()
            .chain(std::iter::once(ColorLabel::Empty))
            .find(|label| label.name() == s)
            .ok_or_else(|| format!("unknown color label '{s}'"))
    }
}

/// Display value of a facelet, an sRGB triple rendered as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}
