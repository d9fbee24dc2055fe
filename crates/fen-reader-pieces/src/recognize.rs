use fen_reader_core::{convex_hull, normalize_to_unit_square, HullPolygon, RgbaImageView};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    classify_outline, piece_color_from_hull, search_piece_points, GiveUpReason, Piece,
    SearchOutcome, ShapeLibrary, ThresholdCache, ThresholdSearchParams,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A square holding a recognized piece, with the evidence behind it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    pub piece: Piece,
    /// Edge threshold that produced the accepted vote cells.
    pub threshold: u32,
    /// Threshold probes spent on this square.
    pub attempts: u32,
    /// DTW distance to the winning reference outline.
    pub distance: f32,
    /// Index of the winning outline in the shape library.
    pub shape_index: usize,
    /// Number of cleaned vote cells.
    pub point_count: usize,
    /// Hull of the vote cells in square pixel coordinates.
    pub hull: HullPolygon,
}

/// Why a square was reported empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyReason {
    /// The threshold search found no piece.
    NoPiece { reason: GiveUpReason, attempts: u32 },
    /// The accepted vote cells are collinear or too few for a hull.
    DegenerateHull { threshold: u32, attempts: u32 },
    /// The hull has zero width or height and cannot be normalized.
    FlatOutline { threshold: u32, attempts: u32 },
}

impl EmptyReason {
    pub fn attempts(&self) -> u32 {
        match *self {
            EmptyReason::NoPiece { attempts, .. }
            | EmptyReason::DegenerateHull { attempts, .. }
            | EmptyReason::FlatOutline { attempts, .. } => attempts,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquareVerdict {
    Piece(Recognition),
    Empty(EmptyReason),
}

impl SquareVerdict {
    pub fn piece(&self) -> Option<Piece> {
        match self {
            SquareVerdict::Piece(r) => Some(r.piece),
            SquareVerdict::Empty(_) => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            SquareVerdict::Piece(r) => r.attempts,
            SquareVerdict::Empty(reason) => reason.attempts(),
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, SquareVerdict::Piece(_))
    }
}

/// Recognize the piece (if any) on one square image.
///
/// Runs the threshold search, then hull, normalization, classification and
/// color sampling on the accepted vote cells. `cache` is read for the first
/// probe and updated when the search succeeds.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(square, params, library, cache), fields(side = square.width))
)]
pub fn recognize_square(
    square: &RgbaImageView<'_>,
    params: &ThresholdSearchParams,
    library: &ShapeLibrary,
    cache: &mut ThresholdCache,
) -> SquareVerdict {
    let found = match search_piece_points(square, params, cache) {
        SearchOutcome::Found(found) => found,
        SearchOutcome::Empty {
            reason, attempts, ..
        } => {
            debug!("no piece after {attempts} probes: {reason:?}");
            return SquareVerdict::Empty(EmptyReason::NoPiece { reason, attempts });
        }
    };

    let Some(hull) = convex_hull(&found.points) else {
        debug!("{} vote cells do not span a hull", found.points.len());
        return SquareVerdict::Empty(EmptyReason::DegenerateHull {
            threshold: found.threshold,
            attempts: found.attempts,
        });
    };
    trace!("hull vertices: {:?}", hull.vertices());

    let Some(outline) = normalize_to_unit_square(&hull.to_points_f32()) else {
        debug!("hull has zero extent on one axis");
        return SquareVerdict::Empty(EmptyReason::FlatOutline {
            threshold: found.threshold,
            attempts: found.attempts,
        });
    };

    // Non-empty outline and library, so a label always comes back.
    let Some(shape) = classify_outline(&outline, library) else {
        return SquareVerdict::Empty(EmptyReason::DegenerateHull {
            threshold: found.threshold,
            attempts: found.attempts,
        });
    };
    let color = piece_color_from_hull(square, &hull);

    SquareVerdict::Piece(Recognition {
        piece: Piece::new(shape.kind, color),
        threshold: found.threshold,
        attempts: found.attempts,
        distance: shape.distance,
        shape_index: shape.shape_index,
        point_count: found.points.len(),
        hull,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceColor, PieceKind, ReferenceShape};
    use fen_reader_core::RgbaImage;
    use nalgebra::Point2;

    /// Light 40x52 rectangle on a green 100px square. Its edge ring has 356
    /// cells at threshold 500, so the point window is lowered to match.
    fn block_square() -> RgbaImage {
        let mut img = RgbaImage::filled(100, 100, [118, 150, 86, 255]);
        for y in 24..76 {
            for x in 30..70 {
                img.put_pixel(x, y, [245, 245, 245, 255]);
            }
        }
        img
    }

    fn block_params() -> ThresholdSearchParams {
        ThresholdSearchParams {
            wanted_min_points: 200,
            wanted_max_points: 500,
            ..ThresholdSearchParams::default()
        }
    }

    fn box_library() -> ShapeLibrary {
        let rect = |label, w: f32| ReferenceShape {
            label,
            outline: vec![
                Point2::new(0.0, 0.0),
                Point2::new(w, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(1.0 - w, 1.0),
            ],
        };
        ShapeLibrary::new(vec![
            rect(PieceKind::Queen, 0.2),
            ReferenceShape {
                label: PieceKind::Rook,
                outline: vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(1.0, 0.0),
                    Point2::new(1.0, 1.0),
                    Point2::new(0.0, 1.0),
                ],
            },
        ])
        .expect("lib")
    }

    #[test]
    fn light_block_is_recognized_as_light_rook() {
        let img = block_square();
        let mut cache = ThresholdCache::new();
        let verdict = recognize_square(&img.view(), &block_params(), &box_library(), &mut cache);
        let SquareVerdict::Piece(rec) = verdict else {
            panic!("expected a piece, got {verdict:?}");
        };
        assert_eq!(rec.piece, Piece::new(PieceKind::Rook, PieceColor::Light));
        assert_eq!(rec.shape_index, 1);
        assert_eq!((rec.threshold, rec.attempts), (500, 1));
        assert_eq!(rec.point_count, 356);
        // Corner pixels fall below the threshold, so the hull is an octagon.
        assert_eq!(rec.hull.len(), 8);
        let bb = rec.hull.bounding_box();
        assert_eq!((bb.min_x, bb.min_y, bb.max_x, bb.max_y), (29, 23, 70, 76));
        assert_eq!(cache.most_recent(), Some(500));
    }

    #[test]
    fn uniform_square_is_empty() {
        let img = RgbaImage::filled(100, 100, [238, 238, 210, 255]);
        let mut cache = ThresholdCache::new();
        let verdict = recognize_square(
            &img.view(),
            &ThresholdSearchParams::default(),
            ShapeLibrary::builtin(),
            &mut cache,
        );
        assert_eq!(
            verdict,
            SquareVerdict::Empty(EmptyReason::NoPiece {
                reason: GiveUpReason::ThresholdCollapsed,
                attempts: 2,
            })
        );
        assert!(!verdict.is_occupied());
        assert_eq!(verdict.piece(), None);
        assert!(cache.is_empty());
    }
}
