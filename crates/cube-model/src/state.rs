// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical color state of one cube and its external orientation.

use std::fmt;

use thiserror::Error;

use crate::color::ColorLabel;

/// Errors raised by the cube model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Cube side length must be an integer in `1..=MAX`.
    #[error("cube size must be an integer from 1 to {max}, got {0}", max = CubeSize::MAX)]
    InvalidSize(i64),
    /// A color-state string has the wrong length for the cube size.
    #[error("color state for N={size} needs {expected} facelets, got {actual}")]
    InvalidLength {
        /// Cube side length.
        size: u32,
        /// Required length (6·N²).
        expected: usize,
        /// Length received.
        actual: usize,
    },
    /// A color-state string contains a character outside the label set.
    #[error("invalid color label {label:?} at facelet {index}")]
    InvalidLabel {
        /// Facelet index of the offending character.
        index: usize,
        /// The offending character.
        label: char,
    },
    /// A facelet index past the end of the state.
    #[error("facelet {index} out of range (cube has {len})")]
    FaceletOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of facelets.
        len: usize,
    },
}

/// Side length `N` of the cube, fixed for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeSize(u32);

impl CubeSize {
    /// Largest accepted side length. Keeps `6·N²` facelets and `4N` grid
    /// columns far from overflow and the editor allocation small.
    pub const MAX: u32 = 64;

    /// Validate raw user input; rejects values outside `1..=MAX`.
    pub fn new(n: i64) -> Result<Self, ModelError> {
        match u32::try_from(n) {
            Ok(n) if (1..=Self::MAX).contains(&n) => Ok(Self(n)),
            _ => Err(ModelError::InvalidSize(n)),
        }
    }

    /// Side length as an integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Side length as a `usize` for indexing.
    pub fn n(self) -> usize {
        self.0 as usize
    }

    /// Facelets per face (N²).
    pub fn face_len(self) -> usize {
        self.n() * self.n()
    }

    /// Facelets on the whole cube (6·N²).
    pub fn facelet_count(self) -> usize {
        6 * self.face_len()
    }
}

impl fmt::Display for CubeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{n}x{n}x{n}", n = self.0)
    }
}

/// Faces in canonical storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    /// Face 0.
    Front = 0,
    /// Face 1.
    Left = 1,
    /// Face 2.
    Back = 2,
    /// Face 3.
    Right = 3,
    /// Face 4.
    Top = 4,
    /// Face 5.
    Bottom = 5,
}

impl Face {
    /// All faces in storage order.
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Left,
        Face::Back,
        Face::Right,
        Face::Top,
        Face::Bottom,
    ];

    /// Face order expected by the external visualizer.
    pub const EXTERNAL_ORDER: [Face; 6] = [
        Face::Bottom,
        Face::Right,
        Face::Front,
        Face::Top,
        Face::Left,
        Face::Back,
    ];

    /// Storage index of the face.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Reverse the rows of one face (row `r` ↔ row `N-1-r`), columns unchanged.
///
/// An involution for every `n`; on odd `n` the middle row maps to itself.
pub fn mirror_rows<T: Copy>(face: &[T], n: usize) -> Vec<T> {
    debug_assert_eq!(face.len(), n * n);
    face.chunks(n.max(1)).rev().flatten().copied().collect()
}

/// Flat color state of one cube: `6·N²` labels, `face·N² + row·N + col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeState {
    size: CubeSize,
    facelets: Vec<ColorLabel>,
}

impl CubeState {
    /// A state where every facelet is empty.
    pub fn empty(size: CubeSize) -> Self {
        Self {
            size,
            facelets: vec![ColorLabel::Empty; size.facelet_count()],
        }
    }

    /// Parse a label string (e.g. a capture result). Length must be exactly 6·N².
    pub fn from_labels(size: CubeSize, labels: &str) -> Result<Self, ModelError> {
        let facelets = labels
            .chars()
            .enumerate()
            .map(|(index, label)| {
                ColorLabel::from_char(label).ok_or(ModelError::InvalidLabel { index, label })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if facelets.len() != size.facelet_count() {
            return Err(ModelError::InvalidLength {
                size: size.get(),
                expected: size.facelet_count(),
                actual: facelets.len(),
            });
        }
        Ok(Self { size, facelets })
    }

    /// Wholesale replacement with a capture result; the state is untouched on error.
    pub fn replace_all(&mut self, labels: &str) -> Result<(), ModelError> {
        *self = Self::from_labels(self.size, labels)?;
        Ok(())
    }

    /// Cube size this state was created for.
    pub fn size(&self) -> CubeSize {
        self.size
    }

    /// All facelets in canonical order.
    pub fn facelets(&self) -> &[ColorLabel] {
        &self.facelets
    }

    /// Flat index of a facelet.
    pub fn index_of(&self, face: Face, row: usize, col: usize) -> usize {
        face.index() * self.size.face_len() + row * self.size.n() + col
    }

    /// Label at a flat index.
    pub fn get(&self, index: usize) -> Option<ColorLabel> {
        self.facelets.get(index).copied()
    }

    /// Overwrite one facelet.
    pub fn set(&mut self, index: usize, label: ColorLabel) -> Result<(), ModelError> {
        let len = self.facelets.len();
        let slot = self
            .facelets
            .get_mut(index)
            .ok_or(ModelError::FaceletOutOfRange { index, len })?;
        *slot = label;
        Ok(())
    }

    /// Labels of one face in row-major order.
    pub fn face(&self, face: Face) -> &[ColorLabel] {
        let len = self.size.face_len();
        let start = face.index() * len;
        &self.facelets[start..start + len]
    }

    /// Indices of facelets that are still empty.
    pub fn missing(&self) -> Vec<usize> {
        self.facelets
            .iter()
            .enumerate()
            .filter_map(|(i, label)| label.is_empty().then_some(i))
            .collect()
    }

    /// True when no facelet is empty.
    pub fn is_complete(&self) -> bool {
        !self.facelets.iter().any(|label| label.is_empty())
    }

    /// Canonical label string (`6·N²` characters).
    pub fn to_label_string(&self) -> String {
        self.facelets.iter().map(|label| label.as_char()).collect()
    }

    /// Derived label string for the external visualizer.
    ///
    /// Faces are emitted in [`Face::EXTERNAL_ORDER`]; every face except the
    /// bottom is mirrored top-to-bottom on the way out. The canonical state is
    /// not touched.
    pub fn to_external_orientation(&self) -> String {
        let n = self.size.n();
        let mut out = String::with_capacity(self.facelets.len());
        for face in Face::EXTERNAL_ORDER {
            let labels = self.face(face);
            if face == Face::Bottom {
                out.extend(labels.iter().map(|label| label.as_char()));
            } else {
                out.extend(mirror_rows(labels, n).into_iter().map(ColorLabel::as_char));
            }
        }
        out
    }
}
