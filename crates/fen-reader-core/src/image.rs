use crate::ImageError;

/// Borrowed RGBA raster, row-major, 4 bytes per pixel.
#[derive(Clone, Copy, Debug)]
pub struct RgbaImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h*4
}

impl<'a> RgbaImageView<'a> {
    /// Wrap a raw RGBA buffer, checking that its length matches the dimensions.
    pub fn from_raw(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageError> {
        let expected = rgba_len(width, height)?;
        if data.len() != expected {
            return Err(ImageError::InvalidBufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// RGBA value at `(x, y)`. Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// RGBA value at `(x, y)` or `None` outside the raster.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.pixel(x as usize, y as usize))
    }
}

/// Owned RGBA raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbaImage {
    /// Raster of the given size filled with a single color.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        RgbaImageView::from_raw(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> RgbaImageView<'_> {
        RgbaImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.view().pixel(x, y)
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }
}

/// Owned single-channel raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}

fn rgba_len(width: usize, height: usize) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(ImageError::InvalidDimensions { width, height })
}

#[inline]
fn get_clamped(src: &RgbaImageView<'_>, x: i32, y: i32) -> [u8; 4] {
    let x = x.clamp(0, src.width as i32 - 1) as usize;
    let y = y.clamp(0, src.height as i32 - 1) as usize;
    src.pixel(x, y)
}

/// Bilinear RGBA sample at a fractional position (pixel centers at integers).
///
/// Coordinates outside the raster clamp to the nearest edge pixel, which is
/// what a canvas does when a source rectangle touches the image border.
#[inline]
pub fn sample_bilinear_rgba(src: &RgbaImageView<'_>, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_clamped(src, x0, y0);
    let p10 = get_clamped(src, x0 + 1, y0);
    let p01 = get_clamped(src, x0, y0 + 1);
    let p11 = get_clamped(src, x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let a = p00[c] as f64 + fx * (p10[c] as f64 - p00[c] as f64);
        let b = p01[c] as f64 + fx * (p11[c] as f64 - p01[c] as f64);
        out[c] = (a + fy * (b - a)).round().clamp(0.0, 255.0) as u8;
    }
    out
}
