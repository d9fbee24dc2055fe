use nalgebra::Point2;

/// Decimal places kept by [`normalize_to_unit_square`].
pub const NORMALIZED_DECIMALS: i32 = 3;

/// Rescale a point set so its bounding box spans exactly `[0, 1]` on both axes.
///
/// Each axis is scaled independently (aspect ratio is not preserved) and every
/// coordinate is rounded to [`NORMALIZED_DECIMALS`] places, which keeps shape
/// comparisons stable. Point order is preserved.
///
/// Returns `None` for an empty set or when all points share one `x` or one
/// `y`, since that axis cannot be stretched.
pub fn normalize_to_unit_square(points: &[Point2<f32>]) -> Option<Vec<Point2<f32>>> {
    let first = points.first()?;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let span_x = max_x - min_x;
    let span_y = max_y - min_y;
    if !(span_x > 0.0 && span_y > 0.0) {
        return None;
    }

    Some(
        points
            .iter()
            .map(|p| {
                Point2::new(
                    round_to_grid((p.x - min_x) / span_x),
                    round_to_grid((p.y - min_y) / span_y),
                )
            })
            .collect(),
    )
}

#[inline]
fn round_to_grid(v: f32) -> f32 {
    let scale = 10f32.powi(NORMALIZED_DECIMALS);
    (v * scale).round() / scale
}
