use std::{fs, path::Path};

use crate::{board, core};
use log::info;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Board(#[from] board::BoardReadError),

    #[error(transparent)]
    Decode(#[from] ::image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Borrow an `image::RgbaImage` as the lightweight `fen-reader-core` view.
pub fn rgba_view(img: &::image::RgbaImage) -> core::RgbaImageView<'_> {
    core::RgbaImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Decode an image file and convert it to RGBA.
pub fn load_image(path: impl AsRef<Path>) -> Result<::image::RgbaImage, DetectError> {
    Ok(::image::open(path)?.to_rgba8())
}

/// Load board reader parameters from a JSON file.
///
/// Missing fields keep their defaults.
pub fn load_params(path: impl AsRef<Path>) -> Result<board::BoardReaderParams, DetectError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Scan a board image and return every square plus the FEN placement.
///
/// `session` carries the threshold cache and attempt statistics; reuse it
/// across images from the same source.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, params, session),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn read_fen(
    img: &::image::RgbaImage,
    params: &board::BoardReaderParams,
    session: &mut board::ScanSession,
) -> Result<board::BoardScan, DetectError> {
    let scanner = board::BoardScanner::new(params)?;
    let scan = scanner.scan_image(&rgba_view(img), session)?;
    info!(
        "session: {} boards, {:.1} average attempts",
        session.boards_scanned(),
        session.average_attempts()
    );
    Ok(scan)
}

/// Convenience overload: default parameters, fresh session, FEN only.
pub fn read_fen_default(img: &::image::RgbaImage) -> Result<String, DetectError> {
    let params = board::BoardReaderParams::default();
    let mut session = board::ScanSession::new();
    Ok(read_fen(img, &params, &mut session)?.fen)
}

/// Scan a board given as a raw row-major RGBA buffer.
///
/// The buffer length is checked against `width * height * 4`; a mismatch is
/// reported as [`board::BoardReadError::Image`].
pub fn read_fen_from_rgba_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    params: &board::BoardReaderParams,
    session: &mut board::ScanSession,
) -> Result<board::BoardScan, DetectError> {
    let scanner = board::BoardScanner::new(params)?;
    Ok(scanner.scan_rgba(width as usize, height as usize, pixels, session)?)
}
