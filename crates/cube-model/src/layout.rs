// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Unfolded-cross grid layout for the facelet editor.
//!
//! ```text
//!         [top   ]
//! [left ] [front ] [right ] [back  ]
//!         [bottom]   (rows drawn bottom-up)
//! ```
//!
//! Offsets are in cells; a face block is `N` cells square. The layout owns no
//! state beyond `N` and the surface width and must be rebuilt when either
//! changes.

use crate::state::{CubeSize, Face};

/// Screen rectangle of one facelet, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceletRect {
    /// Flat facelet index (`face·N² + row·N + col`).
    pub index: usize,
    /// Face the facelet belongs to.
    pub face: Face,
    /// Row within the face (storage order).
    pub row: usize,
    /// Column within the face.
    pub col: usize,
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Edge length (cells are square).
    pub size: u32,
}

impl FaceletRect {
    /// True when the point lies inside the rectangle (right/bottom edges exclusive).
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.size && py >= self.y && py < self.y + self.size
    }
}

/// Placement of every facelet for a given cube size and surface width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    size: CubeSize,
    surface_width: u32,
    cell: u32,
}

impl GridLayout {
    /// Compute the layout; cell size is `round(surface_width / 4N)`.
    pub fn new(size: CubeSize, surface_width: u32) -> Self {
        let cell = (f64::from(surface_width) / f64::from(4 * size.get())).round() as u32;
        Self {
            size,
            surface_width,
            cell,
        }
    }

    /// Cube size the layout was computed for.
    pub fn size(&self) -> CubeSize {
        self.size
    }

    /// Surface width the layout was computed for.
    pub fn surface_width(&self) -> u32 {
        self.surface_width
    }

    /// Edge length of one facelet in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell
    }

    /// Pixel extent of the whole cross: `(4N·cell, 3N·cell)`.
    pub fn surface_size(&self) -> (u32, u32) {
        let n = self.size.get();
        (4 * n * self.cell, 3 * n * self.cell)
    }

    /// `(left, top)` offset of a face block, in cells.
    pub fn face_offset(&self, face: Face) -> (u32, u32) {
        let n = self.size.get();
        match face {
            Face::Top => (n, 0),
            Face::Bottom => (n, 2 * n),
            side => (((5 - side as u32) % 4) * n, n),
        }
    }

    /// Grid row (within the face block) where a storage row is drawn.
    ///
    /// The bottom face is drawn with its rows reversed.
    pub fn display_row(&self, face: Face, row: usize) -> usize {
        if face == Face::Bottom {
            self.size.n() - 1 - row
        } else {
            row
        }
    }

    /// Screen rectangle of one facelet.
    pub fn facelet_rect(&self, face: Face, row: usize, col: usize) -> FaceletRect {
        let (left, top) = self.face_offset(face);
        let y = self.display_row(face, row) as u32;
        FaceletRect {
            index: face.index() * self.size.face_len() + row * self.size.n() + col,
            face,
            row,
            col,
            x: self.cell * (col as u32 + left),
            y: self.cell * (y + top),
            size: self.cell,
        }
    }

    /// Rectangles for every facelet in canonical index order.
    pub fn rects(&self) -> Vec<FaceletRect> {
        let n = self.size.n();
        let mut out = Vec::with_capacity(self.size.facelet_count());
        for face in Face::ALL {
            for row in 0..n {
                for col in 0..n {
                    out.push(self.facelet_rect(face, row, col));
                }
            }
        }
        out
    }

    /// Facelet index under a surface point, if any.
    pub fn hit_test(&self, x: u32, y: u32) -> Option<usize> {
        if self.cell == 0 {
            return None;
        }
        let n = self.size.get();
        let (gx, gy) = (x / self.cell, y / self.cell);
        Face::ALL.into_iter().find_map(|face| {
            let (left, top) = self.face_offset(face);
            let inside = (left..left + n).contains(&gx) && (top..top + n).contains(&gy);
            inside.then(|| {
                let col = (gx - left) as usize;
                let row = self.display_row(face, (gy - top) as usize);
                face.index() * self.size.face_len() + row * self.size.n() + col
            })
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn layout(n: i64, width: u32) -> GridLayout {
        GridLayout::new(CubeSize::new(n).unwrap(), width)
    }

    #[test]
    fn cell_size_is_rounded_quarter_width_per_n() {
        assert_eq!(layout(3, 480).cell_size(), 40);
        assert_eq!(layout(3, 490).cell_size(), 41); // 40.83 rounds up
        assert_eq!(layout(3, 485).cell_size(), 40); // 40.42 rounds down
        assert_eq!(layout(3, 480).surface_size(), (480, 360));
    }

    #[test]
    fn side_faces_follow_column_formula() {
        let l = layout(3, 480);
        assert_eq!(l.face_offset(Face::Left), (0, 3));
        assert_eq!(l.face_offset(Face::Front), (3, 3));
        assert_eq!(l.face_offset(Face::Right), (6, 3));
        assert_eq!(l.face_offset(Face::Back), (9, 3));
        assert_eq!(l.face_offset(Face::Top), (3, 0));
        assert_eq!(l.face_offset(Face::Bottom), (3, 6));
    }

    #[test]
    fn bottom_face_rows_are_mirrored() {
        let l = layout(3, 480);
        let r = l.facelet_rect(Face::Bottom, 0, 0);
        // local row 0 lands on grid row N-1 of the bottom block
        assert_eq!(r.y, 40 * (2 + 6));
        assert_eq!(r.x, 40 * 3);
        let top = l.facelet_rect(Face::Top, 0, 0);
        assert_eq!((top.x, top.y), (120, 0));
    }

    #[test]
    fn rects_are_in_index_order() {
        let l = layout(2, 400);
        let rects = l.rects();
        assert_eq!(rects.len(), 24);
        assert!(rects.iter().enumerate().all(|(i, r)| r.index == i));
    }

    #[test]
    fn hit_test_misses_outside_the_cross() {
        let l = layout(3, 480);
        assert_eq!(l.hit_test(0, 0), None);
        assert_eq!(l.hit_test(479, 0), None);
        assert_eq!(l.hit_test(130, 10), Some(4 * 9));
    }
}
