//! Reference piece outlines.
//!
//! Each outline is a convex hull normalized to the unit square, listed in hull
//! order starting near the top. Several outlines may share a label; the king
//! has three.

use std::sync::OnceLock;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::PieceKind;

/// Shape library validation errors.
#[derive(thiserror::Error, Debug)]
pub enum ShapeLibraryError {
    #[error("shape library has no outlines")]
    Empty,
    #[error("outline #{index} ({label:?}) has {count} points, need at least 3")]
    TooFewPoints {
        index: usize,
        label: PieceKind,
        count: usize,
    },
    #[error("outline #{index} has a point outside the unit square: ({x}, {y})")]
    PointOutOfRange { index: usize, x: f32, y: f32 },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One labeled outline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceShape {
    pub label: PieceKind,
    pub outline: Vec<Point2<f32>>,
}

impl ReferenceShape {
    fn from_pairs(label: PieceKind, pairs: &[(f32, f32)]) -> Self {
        Self {
            label,
            outline: pairs.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
        }
    }
}

/// Validated, ordered set of reference outlines.
///
/// Serialized as a plain JSON array of `{ "label": "p", "outline": [[x, y], ...] }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ReferenceShape>", into = "Vec<ReferenceShape>")]
pub struct ShapeLibrary {
    shapes: Vec<ReferenceShape>,
}

impl ShapeLibrary {
    /// Validate and wrap a list of outlines.
    pub fn new(shapes: Vec<ReferenceShape>) -> Result<Self, ShapeLibraryError> {
        if shapes.is_empty() {
            return Err(ShapeLibraryError::Empty);
        }
        for (index, shape) in shapes.iter().enumerate() {
            if shape.outline.len() < 3 {
                return Err(ShapeLibraryError::TooFewPoints {
                    index,
                    label: shape.label,
                    count: shape.outline.len(),
                });
            }
            let in_unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
            if let Some(p) = shape.outline.iter().find(|p| !in_unit(p.x) || !in_unit(p.y)) {
                return Err(ShapeLibraryError::PointOutOfRange {
                    index,
                    x: p.x,
                    y: p.y,
                });
            }
        }
        Ok(Self { shapes })
    }

    /// Parse and validate a JSON array of outlines.
    pub fn from_json_str(json: &str) -> Result<Self, ShapeLibraryError> {
        let shapes: Vec<ReferenceShape> = serde_json::from_str(json)?;
        Self::new(shapes)
    }

    /// The built-in outlines, loaded once per process.
    pub fn builtin() -> &'static ShapeLibrary {
        static BUILTIN: OnceLock<ShapeLibrary> = OnceLock::new();
        BUILTIN.get_or_init(|| ShapeLibrary {
            shapes: builtin_shapes(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceShape> {
        self.shapes.iter()
    }

    pub fn shapes(&self) -> &[ReferenceShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Default for ShapeLibrary {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl TryFrom<Vec<ReferenceShape>> for ShapeLibrary {
    type Error = ShapeLibraryError;

    fn try_from(shapes: Vec<ReferenceShape>) -> Result<Self, Self::Error> {
        Self::new(shapes)
    }
}

impl From<ShapeLibrary> for Vec<ReferenceShape> {
    fn from(library: ShapeLibrary) -> Self {
        library.shapes
    }
}

const PAWN: &[(f32, f32)] = &[
    (0.44, 0.0),
    (0.56, 0.0),
    (0.64, 0.031),
    (0.66, 0.046),
    (0.7, 0.108),
    (0.8, 0.338),
    (0.98, 0.8),
    (1.0, 0.862),
    (1.0, 1.0),
    (0.0, 1.0),
    (0.0, 0.862),
    (0.02, 0.8),
    (0.2, 0.338),
    (0.3, 0.108),
    (0.34, 0.046),
    (0.36, 0.031),
    (0.4, 0.015),
];

const ROOK: &[(f32, f32)] = &[
    (0.103, 0.0),
    (0.897, 0.0),
    (0.931, 0.031),
    (1.0, 0.891),
    (1.0, 0.969),
    (0.966, 1.0),
    (0.034, 1.0),
    (0.0, 0.969),
    (0.0, 0.891),
    (0.069, 0.031),
    (0.086, 0.016),
];

const KNIGHT: &[(f32, f32)] = &[
    (0.471, 0.0),
    (0.5, 0.015),
    (0.735, 0.162),
    (0.779, 0.191),
    (0.838, 0.25),
    (0.882, 0.309),
    (0.926, 0.397),
    (0.956, 0.485),
    (0.971, 0.544),
    (0.985, 0.618),
    (1.0, 0.735),
    (1.0, 0.971),
    (0.971, 1.0),
    (0.294, 1.0),
    (0.265, 0.971),
    (0.029, 0.706),
    (0.0, 0.647),
    (0.0, 0.559),
    (0.221, 0.044),
    (0.25, 0.015),
];

const BISHOP: &[(f32, f32)] = &[
    (0.457, 0.0),
    (0.543, 0.0),
    (0.586, 0.042),
    (0.743, 0.31),
    (0.757, 0.338),
    (1.0, 0.944),
    (1.0, 0.972),
    (0.971, 1.0),
    (0.043, 1.0),
    (0.014, 0.986),
    (0.0, 0.972),
    (0.0, 0.944),
    (0.243, 0.338),
    (0.257, 0.31),
    (0.414, 0.042),
    (0.443, 0.014),
];

const KING_CROSS: &[(f32, f32)] = &[
    (0.485, 0.0),
    (0.515, 0.0),
    (0.897, 0.309),
    (0.971, 0.426),
    (1.0, 0.559),
    (0.985, 0.588),
    (0.794, 0.956),
    (0.618, 0.985),
    (0.485, 1.0),
    (0.471, 1.0),
    (0.235, 0.985),
    (0.206, 0.971),
    (0.029, 0.618),
    (0.0, 0.412),
    (0.015, 0.382),
];

const KING_ROUND: &[(f32, f32)] = &[
    (0.467, 0.0),
    (0.533, 0.0),
    (0.867, 0.138),
    (0.947, 0.185),
    (0.973, 0.215),
    (1.0, 0.277),
    (1.0, 0.385),
    (0.827, 0.846),
    (0.76, 0.954),
    (0.747, 0.969),
    (0.707, 0.985),
    (0.547, 1.0),
    (0.44, 1.0),
    (0.293, 0.985),
    (0.253, 0.969),
    (0.187, 0.846),
    (0.173, 0.815),
    (0.013, 0.415),
    (0.0, 0.369),
    (0.0, 0.308),
    (0.013, 0.262),
    (0.027, 0.231),
    (0.08, 0.169),
    (0.107, 0.154),
];

const KING_WIDE: &[(f32, f32)] = &[
    (0.147, 0.0),
    (0.853, 0.0),
    (0.893, 0.02),
    (0.947, 0.06),
    (0.973, 0.1),
    (0.987, 0.14),
    (1.0, 0.2),
    (1.0, 0.28),
    (0.987, 0.34),
    (0.773, 0.98),
    (0.747, 1.0),
    (0.253, 1.0),
    (0.227, 0.98),
    (0.013, 0.34),
    (0.0, 0.24),
    (0.013, 0.14),
    (0.027, 0.1),
    (0.053, 0.06),
    (0.107, 0.02),
];

const QUEEN: &[(f32, f32)] = &[
    (0.487, 0.0),
    (0.763, 0.057),
    (0.974, 0.143),
    (1.0, 0.171),
    (1.0, 0.257),
    (0.829, 0.986),
    (0.803, 1.0),
    (0.75, 1.0),
    (0.5, 0.986),
    (0.263, 0.971),
    (0.197, 0.957),
    (0.158, 0.9),
    (0.0, 0.257),
    (0.0, 0.171),
    (0.026, 0.143),
    (0.263, 0.029),
];

fn builtin_shapes() -> Vec<ReferenceShape> {
    [
        (PieceKind::Pawn, PAWN),
        (PieceKind::Rook, ROOK),
        (PieceKind::Knight, KNIGHT),
        (PieceKind::Bishop, BISHOP),
        (PieceKind::King, KING_CROSS),
        (PieceKind::King, KING_ROUND),
        (PieceKind::King, KING_WIDE),
        (PieceKind::Queen, QUEEN),
    ]
    .into_iter()
    .map(|(label, pairs)| ReferenceShape::from_pairs(label, pairs))
    .collect()
}
