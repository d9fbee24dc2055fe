//! Board-level reading: crop, per-square sampling, scanning and FEN assembly.
//!
//! [`BoardScanner`] drives every square of a board through
//! [`fen_reader_pieces::recognize_square`] and joins the answers into a FEN
//! piece-placement string. The threshold cache lives in a [`ScanSession`]
//! that callers keep across boards.
//!
//! ```
//! use fen_reader_board::{BoardReaderParams, BoardScanner, ScanSession};
//! use fen_reader_core::RgbaImage;
//!
//! let params = BoardReaderParams::default();
//! let scanner = BoardScanner::new(&params)?;
//! let mut session = ScanSession::new();
//!
//! let image = RgbaImage::filled(160, 160, [238, 238, 210, 255]);
//! let scan = scanner.scan_image(&image.view(), &mut session)?;
//! assert_eq!(scan.fen, "8/8/8/8/8/8/8/8");
//! # Ok::<(), fen_reader_board::BoardReadError>(())
//! ```

mod error;
mod fen;
mod geometry;
mod params;
mod sampler;
mod scanner;

pub use error::BoardReadError;
pub use fen::{fen_placement, SquareResult};
pub use geometry::{crop_board, BoardGeometry};
pub use params::BoardReaderParams;
pub use sampler::{BoardImageSampler, SquareSampler};
pub use scanner::{BoardScan, BoardScanner, ScanSession};
