// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property tests for the facelet layout and external orientation.

use cube_model::{mirror_rows, ColorLabel, CubeSize, CubeState, Face, GridLayout};
use proptest::prelude::*;

fn label_strategy() -> impl Strategy<Value = ColorLabel> {
    prop::sample::select(ColorLabel::COLORS.to_vec())
}

fn state_strategy() -> impl Strategy<Value = CubeState> {
    (1i64..=6).prop_flat_map(|n| {
        let size = CubeSize::new(n).unwrap();
        prop::collection::vec(label_strategy(), size.facelet_count()).prop_map(move |labels| {
            let text: String = labels.iter().map(|l| l.as_char()).collect();
            CubeState::from_labels(size, &text).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn fresh_state_len_is_six_n_squared(n in 1i64..=12) {
        let size = CubeSize::new(n).unwrap();
        let state = CubeState::empty(size);
        prop_assert_eq!(state.facelets().len() as i64, 6 * n * n);
        prop_assert!(state.facelets().iter().all(|l| *l == ColorLabel::Empty));
    }

    #[test]
    fn mirror_is_an_involution(n in 1usize..=9, seed in prop::collection::vec(any::<u8>(), 81)) {
        let face: Vec<u8> = seed.into_iter().take(n * n).collect();
        prop_assert_eq!(mirror_rows(&mirror_rows(&face, n), n), face);
    }

    #[test]
    fn external_orientation_preserves_multiset(state in state_strategy()) {
        let mut before: Vec<char> = state.to_label_string().chars().collect();
        let mut after: Vec<char> = state.to_external_orientation().chars().collect();
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn external_orientation_inverts(state in state_strategy()) {
        // Undo the permutation and the mirror, face by face.
        let n = state.size().n();
        let face_len = state.size().face_len();
        let external: Vec<char> = state.to_external_orientation().chars().collect();
        let mut rebuilt = vec![' '; external.len()];
        for (slot, face) in Face::EXTERNAL_ORDER.into_iter().enumerate() {
            let chunk = &external[slot * face_len..(slot + 1) * face_len];
            let restored = if face == Face::Bottom { chunk.to_vec() } else { mirror_rows(chunk, n) };
            rebuilt[face.index() * face_len..(face.index() + 1) * face_len].copy_from_slice(&restored);
        }
        prop_assert_eq!(rebuilt.into_iter().collect::<String>(), state.to_label_string());
    }

    #[test]
    fn row_symmetric_state_is_a_fixed_point_per_face(n in 1i64..=5, colors in prop::collection::vec(label_strategy(), 6)) {
        // Uniform faces equal their own mirror, so only the face order changes.
        let size = CubeSize::new(n).unwrap();
        let text: String = colors.iter().flat_map(|c| std::iter::repeat(c.as_char()).take(size.face_len())).collect();
        let state = CubeState::from_labels(size, &text).unwrap();
        let expected: String = Face::EXTERNAL_ORDER
            .into_iter()
            .flat_map(|f| std::iter::repeat(colors[f.index()].as_char()).take(size.face_len()))
            .collect();
        prop_assert_eq!(state.to_external_orientation(), expected);
    }

    #[test]
    fn hit_test_inverts_facelet_rect(n in 1i64..=7, width in 120u32..=1200) {
        let layout = GridLayout::new(CubeSize::new(n).unwrap(), width);
        prop_assume!(layout.cell_size() > 0);
        for rect in layout.rects() {
            prop_assert_eq!(layout.hit_test(rect.x, rect.y), Some(rect.index));
            let last = rect.size - 1;
            prop_assert_eq!(layout.hit_test(rect.x + last, rect.y + last), Some(rect.index));
        }
    }

    #[test]
    fn rects_never_overlap(n in 1i64..=5) {
        let layout = GridLayout::new(CubeSize::new(n).unwrap(), 480);
        let rects = layout.rects();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                prop_assert!(!(a.x == b.x && a.y == b.y), "{:?} collides with {:?}", a, b);
            }
        }
    }
}

#[test]
fn bottom_row_zero_sits_on_last_grid_row_for_n3() {
    let layout = GridLayout::new(CubeSize::new(3).unwrap(), 480);
    let cell = layout.cell_size();
    let (_, top) = layout.face_offset(Face::Bottom);
    for col in 0..3 {
        let rect = layout.facelet_rect(Face::Bottom, 0, col);
        assert_eq!(rect.y / cell - top, 2);
    }
}
