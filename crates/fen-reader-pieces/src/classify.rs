use log::trace;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{dtw_distance, PieceKind, ShapeLibrary};

/// Best-matching reference outline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeMatch {
    pub kind: PieceKind,
    /// DTW distance to the winning outline; lower is closer.
    pub distance: f32,
    /// Index of the winning outline in the library.
    pub shape_index: usize,
}

/// Label a normalized hull outline with the closest reference shape.
///
/// There is no rejection threshold: any non-empty outline gets a label.
/// On equal distances the earlier library entry wins. Returns `None` only for
/// an empty outline.
pub fn classify_outline(outline: &[Point2<f32>], library: &ShapeLibrary) -> Option<ShapeMatch> {
    if outline.is_empty() {
        return None;
    }
    let mut best: Option<ShapeMatch> = None;
    for (shape_index, shape) in library.iter().enumerate() {
        let distance = dtw_distance(outline, &shape.outline);
        trace!("outline vs {:?}#{shape_index}: {distance:.3}", shape.label);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(ShapeMatch {
                kind: shape.label,
                distance,
                shape_index,
            });
        }
    }
    best
}
