//! Core image and geometry types for per-square chess piece recognition.
//!
//! This crate is intentionally small and purely geometric: RGBA/gray raster
//! types, bilinear sampling, the convex hull builder and the unit-square
//! shape normalizer. It knows nothing about pieces, thresholds or boards.

mod error;
mod hull;
mod image;
mod logger;
mod normalize;

pub use error::ImageError;
pub use hull::{convex_hull, cross, BoundingBox, HullPolygon, Winding};
pub use image::{sample_bilinear_rgba, GrayImage, RgbaImage, RgbaImageView};
pub use normalize::{normalize_to_unit_square, NORMALIZED_DECIMALS};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
