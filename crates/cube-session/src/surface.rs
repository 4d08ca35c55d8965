// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The facelet editor: one filled cell per facelet, positioned by
//! [`GridLayout`]. Cells hold display values, not labels, so finalizing an
//! edit goes back through the codec and an unfilled cell is detected by the
//! fact that its fill does not encode.

use cube_model::codec::{decode, encode};
use cube_model::{ColorLabel, CubeState, FaceletRect, GridLayout, ModelError, Rgb};

use crate::error::SessionError;

/// One rendered facelet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceletCell {
    /// Where the cell is drawn.
    pub rect: FaceletRect,
    /// Current fill.
    pub fill: Rgb,
}

/// Surface that draws the editor.
pub trait RenderPort {
    /// Draw every cell of the surface.
    fn draw(&mut self, surface: &EditSurface);
}

/// Editable facelet grid built from a [`CubeState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSurface {
    layout: GridLayout,
    cells: Vec<FaceletCell>,
}

impl EditSurface {
    /// Lay out and fill every facelet of `cube`.
    pub fn build(layout: GridLayout, cube: &CubeState) -> Self {
        let cells = layout
            .rects()
            .into_iter()
            .zip(cube.facelets())
            .map(|(rect, label)| FaceletCell {
                rect,
                fill: decode(*label),
            })
            .collect();
        Self { layout, cells }
    }

    /// Layout the cells were placed with.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Cells in canonical facelet order.
    pub fn cells(&self) -> &[FaceletCell] {
        &self.cells
    }

    /// Repaint one cell.
    pub fn update(&mut self, index: usize, label: ColorLabel) -> Result<(), ModelError> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(ModelError::FaceletOutOfRange { index, len })?;
        cell.fill = decode(label);
        Ok(())
    }

    /// Facelet under a surface point.
    pub fn hit_test(&self, x: u32, y: u32) -> Option<usize> {
        self.layout.hit_test(x, y)
    }

    /// Labels for every cell, in canonical order.
    ///
    /// Fails with [`SessionError::IncompleteState`] when any fill is not a
    /// sticker color.
    pub fn decode(&self) -> Result<Vec<ColorLabel>, SessionError> {
        let labels: Vec<_> = self.cells.iter().map(|c| encode(c.fill)).collect();
        let missing = labels.iter().filter(|l| l.is_err()).count();
        if missing > 0 {
            return Err(SessionError::IncompleteState { missing });
        }
        Ok(labels.into_iter().flatten().collect())
    }

    /// Rebuild a complete [`CubeState`] from the cells.
    pub fn to_state(&self) -> Result<CubeState, SessionError> {
        let labels: String = self.decode()?.into_iter().map(ColorLabel::as_char).collect();
        Ok(CubeState::from_labels(self.layout.size(), &labels)?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use cube_model::CubeSize;

    fn surface(labels: &str) -> EditSurface {
        let size = CubeSize::new(2).unwrap();
        let cube = CubeState::from_labels(size, labels).unwrap();
        EditSurface::build(GridLayout::new(size, 400), &cube)
    }

    #[test]
    fn cells_decode_labels() {
        let s = surface("rrrrbbbbggggooooyyyywwww");
        assert_eq!(s.cells().len(), 24);
        assert_eq!(s.cells()[0].fill, decode(ColorLabel::Red));
        assert_eq!(s.cells()[23].fill, decode(ColorLabel::White));
        assert_eq!(
            s.to_state().unwrap().to_label_string(),
            "rrrrbbbbggggooooyyyywwww"
        );
    }

    #[test]
    fn empty_cells_are_counted() {
        let mut s = surface("rrrrbbbbggggooooyyyywwxx");
        assert_eq!(
            s.decode().unwrap_err(),
            SessionError::IncompleteState { missing: 2 }
        );
        s.update(22, ColorLabel::White).unwrap();
        s.update(23, ColorLabel::White).unwrap();
        assert!(s.decode().is_ok());
    }

    #[test]
    fn update_rejects_out_of_range() {
        let mut s = surface("rrrrbbbbggggooooyyyywwww");
        assert_eq!(
            s.update(24, ColorLabel::Red),
            Err(ModelError::FaceletOutOfRange { index: 24, len: 24 })
        );
    }
}
