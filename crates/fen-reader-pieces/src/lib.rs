//! Per-square chess piece recognition.
//!
//! One board square at a time:
//! 1. Search an edge threshold (Sobel magnitude) whose cleaned vote count
//!    lands inside a target window, seeded by a two-entry threshold cache.
//! 2. Accumulate small-radius circular votes from the edge pixels and drop
//!    weak cells and small blobs.
//! 3. Take the convex hull of the surviving cells, normalize it to the unit
//!    square and match it against reference outlines with dynamic time
//!    warping.
//! 4. Sample a horizontal scanline through the hull to decide light or dark.
//!
//! ## Quickstart
//!
//! ```
//! use fen_reader_core::RgbaImage;
//! use fen_reader_pieces::{recognize_square, ShapeLibrary, SquareVerdict, ThresholdCache, ThresholdSearchParams};
//!
//! let square = RgbaImage::filled(64, 64, [118, 150, 86, 255]);
//! let mut cache = ThresholdCache::default();
//! let verdict = recognize_square(
//!     &square.view(),
//!     &ThresholdSearchParams::default(),
//!     ShapeLibrary::builtin(),
//!     &mut cache,
//! );
//! assert!(matches!(verdict, SquareVerdict::Empty(_)));
//! ```

mod accumulator;
mod classify;
mod color;
mod dtw;
mod edges;
mod params;
mod piece;
mod recognize;
mod shapes;
mod threshold_search;

pub use accumulator::{accumulate_votes, clean_votes, VoteSpace, ANGLE_SAMPLES};
pub use classify::{classify_outline, ShapeMatch};
pub use color::{is_light_pixel, piece_color_from_hull, resolve_color_line, sample_centerline};
pub use dtw::dtw_distance;
pub use edges::{detect_edges, grayscale_average, EdgeMap};
pub use params::{AccumulatorParams, ThresholdSearchParams};
pub use piece::{Piece, PieceColor, PieceKind};
pub use recognize::{recognize_square, EmptyReason, Recognition, SquareVerdict};
pub use shapes::{ReferenceShape, ShapeLibrary, ShapeLibraryError};
pub use threshold_search::{
    search_piece_points, search_threshold_with, GiveUpReason, ProbeResult, SearchOutcome,
    SquarePoints, ThresholdCache,
};
