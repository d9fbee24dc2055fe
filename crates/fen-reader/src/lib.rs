//! Read the piece placement of a rendered chessboard image.
//!
//! This crate provides:
//! - re-exports of the workspace crates (`core`, `pieces`, `board`)
//! - (feature `image`) end-to-end helpers that decode an image file or raw
//!   RGBA buffer and return the board's FEN piece placement
//! - (feature `cli`) the `fen-reader` binary
//!
//! ## Quickstart
//!
//! ```no_run
//! use fen_reader::detect;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = detect::load_image("board.png")?;
//! let fen = detect::read_fen_default(&img)?;
//! println!("{fen}");
//! # Ok(())
//! # }
//! ```
//!
//! For a stream of boards from one source keep a single
//! [`board::ScanSession`] and call [`detect::read_fen`] for each image, so
//! the threshold cache carries over.
//!
//! ## API map
//! - `fen_reader::core`: RGBA rasters, convex hull, outline normalization, logging.
//! - `fen_reader::pieces`: per-square threshold search, vote accumulation,
//!   shape classification and color sampling.
//! - `fen_reader::board`: board crop, square sampling, scanning and FEN assembly.
//! - `fen_reader::detect` (feature `image`): helpers from `image::RgbaImage`.

pub use fen_reader_board as board;
pub use fen_reader_core as core;
pub use fen_reader_pieces as pieces;

pub use fen_reader_board::{BoardReaderParams, BoardScan, ScanSession, SquareResult};
pub use fen_reader_pieces::{Piece, PieceColor, PieceKind, ShapeLibrary};

#[cfg(feature = "image")]
pub mod detect;

/// Install a `tracing` subscriber and forward `log` records into it.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    // Ignore errors if a logger was already installed.
    let _ = tracing_log::LogTracer::init();
    fen_reader_core::init_tracing(json);
}
