// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cube color-state model shared by the capture client.
//!
//! A cube of side `N` is stored as a flat run of `6·N²` color labels in
//! face-major, row-major order with faces `[front, left, back, right, top,
//! bottom]`. This crate owns that representation, the label ↔ display color
//! codec, the reordering handed to the external visualizer, and the pure
//! layout that places every facelet on the unfolded-cross diagram.

pub mod codec;
pub mod color;
pub mod layout;
pub mod state;

pub use codec::UnknownColor;
pub use color::{ColorLabel, Rgb};
pub use layout::{FaceletRect, GridLayout};
pub use state::{mirror_rows, CubeSize, CubeState, Face, ModelError};
