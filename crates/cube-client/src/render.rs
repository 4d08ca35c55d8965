// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text rendering of the editor and the play hand-off.

use std::io::Write;

use cube_model::codec::encode;
use cube_session::{EditSurface, RenderPort};
use tracing::warn;

/// Character drawn for a cell whose fill is not a sticker color.
const UNFILLED: char = '.';

/// Draws the unfolded cube as a character grid, one character per facelet.
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    /// Render into `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Hand the externally oriented state to the player.
    pub fn handoff(&mut self, external: &str) {
        if let Err(err) = writeln!(self.out, "play {external}").and_then(|()| self.out.flush()) {
            warn!(%err, "hand-off write failed");
        }
    }

    /// Write a free-form line (usage text, status).
    pub fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(%err, "write failed");
        }
    }
}

/// Character rows of the cross, `3N` rows of `4N` characters.
pub fn grid_rows(surface: &EditSurface) -> Vec<String> {
    let layout = surface.layout();
    let n = layout.size().n();
    let mut grid = vec![vec![' '; 4 * n]; 3 * n];
    for cell in surface.cells() {
        let (left, top) = layout.face_offset(cell.rect.face);
        let gx = left as usize + cell.rect.col;
        let gy = top as usize + layout.display_row(cell.rect.face, cell.rect.row);
        grid[gy][gx] = encode(cell.fill).map_or(UNFILLED, |label| label.as_char());
    }
    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

impl<W: Write> RenderPort for TextRenderer<W> {
    fn draw(&mut self, surface: &EditSurface) {
        let layout = surface.layout();
        let (w, h) = layout.surface_size();
        let mut text = format!(
            "cube {} | cell {}px | surface {w}x{h}\n",
            layout.size(),
            layout.cell_size()
        );
        for row in grid_rows(surface) {
            text.push_str(&row);
            text.push('\n');
        }
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            warn!(%err, "editor draw failed");
        }
    }
}
