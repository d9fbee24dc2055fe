use nalgebra::Point2;

/// Dynamic time warping distance between two point sequences.
///
/// `C[i][j] = |a_i - b_j| + min(C[i-1][j], C[i][j-1], C[i-1][j-1])`, with the
/// first row and column accumulated along a single sequence. Returns the cost
/// of aligning the last points of both sequences, or `f32::INFINITY` when
/// either sequence is empty.
///
/// Callers compare distances computed with the same argument order (observed
/// outline first); swapping the arguments is not guaranteed to give a
/// bit-identical result.
pub fn dtw_distance(a: &[Point2<f32>], b: &[Point2<f32>]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return f32::INFINITY;
    }

    let mut prev = vec![0.0f32; b.len()];
    let mut curr = vec![0.0f32; b.len()];

    prev[0] = (a[0] - b[0]).norm();
    for j in 1..b.len() {
        prev[j] = prev[j - 1] + (a[0] - b[j]).norm();
    }

    for &pa in &a[1..] {
        curr[0] = prev[0] + (pa - b[0]).norm();
        for j in 1..b.len() {
            let best = prev[j].min(curr[j - 1]).min(prev[j - 1]);
            curr[j] = (pa - b[j]).norm() + best;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len() - 1]
}
