//! Board crop and square layout.

use fen_reader_core::{RgbaImage, RgbaImageView};
use serde::{Deserialize, Serialize};

use crate::BoardReadError;

/// Crop `image` to a square of side `min(width, height)`.
///
/// With `centered` the crop is taken from the middle of the longer axis,
/// otherwise from the top-left corner.
pub fn crop_board(image: &RgbaImageView<'_>, centered: bool) -> RgbaImage {
    let side = image.width.min(image.height);
    let (x0, y0) = if centered {
        ((image.width - side) / 2, (image.height - side) / 2)
    } else {
        (0, 0)
    };

    let row_bytes = side * 4;
    let mut data = Vec::with_capacity(side * row_bytes);
    for y in y0..y0 + side {
        let start = (y * image.width + x0) * 4;
        data.extend_from_slice(&image.data[start..start + row_bytes]);
    }
    RgbaImage {
        width: side,
        height: side,
        data,
    }
}

/// Square layout on a square board image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardGeometry {
    /// Board image side, in pixels.
    pub side: usize,
    pub rows: usize,
    pub cols: usize,
    /// Integer square side: `floor(side / max(rows, cols))`.
    pub square_size: usize,
    /// Fractional part of `side / max(rows, cols)`, accumulated once per
    /// square index so later squares do not drift.
    pub cut_offset: f64,
    /// Overscan applied when sampling a square.
    pub zoom_px: usize,
}

impl BoardGeometry {
    pub fn new(side: usize, rows: usize, cols: usize, zoom_px: usize) -> Result<Self, BoardReadError> {
        if rows == 0 || cols == 0 {
            return Err(BoardReadError::InvalidBoardSize { rows, cols });
        }
        let per_square = side as f64 / rows.max(cols) as f64;
        let square_size = side / rows.max(cols);
        if square_size == 0 {
            return Err(BoardReadError::BoardTooSmall { side, rows, cols });
        }
        Ok(Self {
            side,
            rows,
            cols,
            square_size,
            cut_offset: per_square - square_size as f64,
            zoom_px,
        })
    }

    /// Top-left corner of square `(row, col)` in board pixels.
    pub fn square_origin(&self, row: usize, col: usize) -> (f64, f64) {
        let s = self.square_size as f64;
        (
            col as f64 * s + self.cut_offset * col as f64,
            row as f64 * s + self.cut_offset * row as f64,
        )
    }
}
