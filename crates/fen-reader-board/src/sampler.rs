use fen_reader_core::{sample_bilinear_rgba, RgbaImage, RgbaImageView};

use crate::BoardGeometry;

/// Source of per-square pixel buffers.
///
/// Implementations return a `square_size() x square_size()` RGBA raster for
/// any `(row, col)` inside the board.
pub trait SquareSampler {
    fn square_size(&self) -> usize;

    fn sample_square(&self, row: usize, col: usize) -> RgbaImage;
}

/// Samples squares from a cropped, square board image.
///
/// Each source square is stretched by `zoom_px` pixels and shifted back by
/// `floor(zoom_px / 1.5)`, and the top-left `square_size` window is kept.
/// That trims the board grid lines and neighbouring squares off the edges,
/// mostly at the top-left where the shift lands.
#[derive(Clone, Copy, Debug)]
pub struct BoardImageSampler<'a> {
    board: RgbaImageView<'a>,
    geometry: BoardGeometry,
}

impl<'a> BoardImageSampler<'a> {
    pub fn new(board: RgbaImageView<'a>, geometry: BoardGeometry) -> Self {
        Self { board, geometry }
    }

    #[inline]
    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }
}

impl SquareSampler for BoardImageSampler<'_> {
    #[inline]
    fn square_size(&self) -> usize {
        self.geometry.square_size
    }

    fn sample_square(&self, row: usize, col: usize) -> RgbaImage {
        let s = self.geometry.square_size;
        let zoom = self.geometry.zoom_px as f64;
        let shift = (zoom / 1.5).floor();
        let scale = s as f64 / (s as f64 + zoom);
        let (ox, oy) = self.geometry.square_origin(row, col);

        let mut out = RgbaImage::filled(s, s, [0, 0, 0, 0]);
        for dy in 0..s {
            let sy = oy + (dy as f64 + 0.5 + shift) * scale - 0.5;
            for dx in 0..s {
                let sx = ox + (dx as f64 + 0.5 + shift) * scale - 0.5;
                out.put_pixel(dx, dy, sample_bilinear_rgba(&self.board, sx, sy));
            }
        }
        out
    }
}
