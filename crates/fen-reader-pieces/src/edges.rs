use fen_reader_core::{GrayImage, RgbaImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Binary edge map: 255 on edge pixels, 0 elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    image: GrayImage,
    edge_count: usize,
}

impl EdgeMap {
    #[inline]
    pub fn width(&self) -> usize {
        self.image.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.image.height
    }

    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.image.get(x, y) != 0
    }

    /// Number of edge pixels.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// `true` when no pixel passed the threshold.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.edge_count == 0
    }

    #[inline]
    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }
}

/// Unweighted RGB average, rounded to the nearest gray level. Alpha is ignored.
pub fn grayscale_average(src: &RgbaImageView<'_>) -> GrayImage {
    let mut out = GrayImage::zeros(src.width, src.height);
    for (dst, px) in out.data.iter_mut().zip(src.data.chunks_exact(4)) {
        let sum = px[0] as u32 + px[1] as u32 + px[2] as u32;
        *dst = ((sum + 1) / 3) as u8;
    }
    out
}

/// Sobel edge map thresholded on gradient magnitude.
///
/// A pixel is an edge when `sqrt(gx² + gy²) > threshold`. The one-pixel
/// border is never an edge.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "trace", skip(src), fields(width = src.width, height = src.height))
)]
pub fn detect_edges(src: &RgbaImageView<'_>, threshold: u32) -> EdgeMap {
    let gray = grayscale_average(src);
    let (w, h) = (gray.width, gray.height);
    let mut image = GrayImage::zeros(w, h);
    let mut edge_count = 0usize;
    let limit = threshold as i64 * threshold as i64;

    if w >= 3 && h >= 3 {
        let g = |x: usize, y: usize| gray.data[y * w + x] as i64;
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                // Leading side minus trailing side, center row/column weighted 2.
                let gx = g(x - 1, y - 1) + 2 * g(x - 1, y) + g(x - 1, y + 1)
                    - (g(x + 1, y - 1) + 2 * g(x + 1, y) + g(x + 1, y + 1));
                let gy = g(x - 1, y - 1) + 2 * g(x, y - 1) + g(x + 1, y - 1)
                    - (g(x - 1, y + 1) + 2 * g(x, y + 1) + g(x + 1, y + 1));
                // Squared comparison: magnitude > t <=> magnitude² > t² for t >= 0.
                if gx * gx + gy * gy > limit {
                    image.data[y * w + x] = 255;
                    edge_count += 1;
                }
            }
        }
    }

    EdgeMap { image, edge_count }
}
