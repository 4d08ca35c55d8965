// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Label ↔ display color codec.
//!
//! `decode` is total over all seven labels. `encode` is its inverse over the
//! six sticker colors only: the empty label has a display value but nothing
//! ever encodes back to it, which is how unfilled cells are detected.

use thiserror::Error;

use crate::color::{ColorLabel, Rgb};

/// Display value used for unfilled facelets.
pub const EMPTY_DISPLAY: Rgb = Rgb([0x80, 0x80, 0x80]);

/// A display value that is not one of the six canonical sticker colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("display value {0} is not a canonical sticker color")]
pub struct UnknownColor(pub Rgb);

/// Canonical display value for a label.
pub fn decode(label: ColorLabel) -> Rgb {
    match label {
        ColorLabel::Red => Rgb([0xff, 0x00, 0x00]),
        ColorLabel::Blue => Rgb([0x00, 0x00, 0xff]),
        ColorLabel::Green => Rgb([0x00, 0x80, 0x00]),
        ColorLabel::Orange => Rgb([0xff, 0xa5, 0x00]),
        ColorLabel::Yellow => Rgb([0xff, 0xff, 0x00]),
        ColorLabel::White => Rgb([0xff, 0xff, 0xff]),
        ColorLabel::Empty => EMPTY_DISPLAY,
    }
}

/// Label for a canonical display value. Never yields [`ColorLabel::Empty`].
pub fn encode(value: Rgb) -> Result<ColorLabel, UnknownColor> {
    ColorLabel::COLORS
        .into_iter()
        .find(|label| decode(*label) == value)
        .ok_or(UnknownColor(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_color_round_trips() {
        for label in ColorLabel::COLORS {
            assert_eq!(encode(decode(label)), Ok(label));
        }
    }

    #[test]
    fn empty_has_a_display_value_but_never_encodes() {
        let shown = decode(ColorLabel::Empty);
        assert_eq!(encode(shown), Err(UnknownColor(shown)));
    }

    #[test]
    fn off_palette_values_are_unknown() {
        let near_red = Rgb([0xfe, 0x00, 0x00]);
        assert_eq!(encode(near_red), Err(UnknownColor(near_red)));
    }

    #[test]
    fn display_values_are_distinct() {
        let mut seen: Vec<Rgb> = ColorLabel::COLORS.into_iter().map(decode).collect();
        seen.push(decode(ColorLabel::Empty));
        let total = seen.len();
        seen.sort_by_key(|c| c.0);
        seen.dedup();
        assert_eq!(seen.len(), total);
    }
}
