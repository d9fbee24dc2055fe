//! Light/dark decision from a horizontal scanline through the piece hull.

use fen_reader_core::{HullPolygon, RgbaImageView};
use log::trace;
use nalgebra::Point2;

use crate::PieceColor;

/// Perceived brightness above mid-gray on an opaque pixel.
#[inline]
pub fn is_light_pixel(px: [u8; 4]) -> bool {
    let brightness = 0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64;
    brightness > 127.0 && px[3] > 127
}

/// Light/dark flags along the hull's middle row.
///
/// The row is `round((min_y + max_y) / 2)` of the hull's bounding box, scanned
/// from `min_x` to `max_x` inclusive. Pixels outside the buffer or outside the
/// hull are skipped.
pub fn sample_centerline(square: &RgbaImageView<'_>, hull: &HullPolygon) -> Vec<bool> {
    let bb = hull.bounding_box();
    let y = ((bb.min_y + bb.max_y) as f64 / 2.0 + 0.5).floor() as i32;
    (bb.min_x..=bb.max_x)
        .filter(|&x| hull.contains(Point2::new(x, y)))
        .filter_map(|x| square.get(x, y))
        .map(is_light_pixel)
        .collect()
}

fn majority(line: &[bool]) -> PieceColor {
    let light = line.iter().filter(|&&l| l).count();
    if light > line.len() - light {
        PieceColor::Light
    } else {
        PieceColor::Dark
    }
}

/// Decide the piece color from a sampled scanline.
///
/// A line with exactly two transitions (piece body framed by background) or a
/// strong imbalance (one class at least 75% of the samples ahead of the other)
/// is decided by majority. Otherwise the leading and trailing runs are treated
/// as background and trimmed before deciding. Ties and empty lines are dark.
pub fn resolve_color_line(line: &[bool]) -> PieceColor {
    let n = line.len();
    let transitions = line.windows(2).filter(|w| w[0] != w[1]).count();
    let light = line.iter().filter(|&&l| l).count();
    let dark = n - light;
    if transitions == 2 || light.abs_diff(dark) as f64 >= 0.75 * n as f64 {
        return majority(line);
    }

    let (mut start, mut end) = (0, n - 1);
    while start < end && line[start] == line[start + 1] {
        start += 1;
    }
    while end > start && line[end] == line[end - 1] {
        end -= 1;
    }
    let core = &line[start..=end];
    trace!("color line trimmed to {}..={} of {n}", start, end);
    if core.iter().all(|&l| l) {
        PieceColor::Light
    } else if core.iter().all(|&l| !l) {
        PieceColor::Dark
    } else {
        majority(core)
    }
}

/// Sample the hull's middle row of `square` and resolve it.
pub fn piece_color_from_hull(square: &RgbaImageView<'_>, hull: &HullPolygon) -> PieceColor {
    resolve_color_line(&sample_centerline(square, hull))
}
