//! Small-radius circular vote accumulator and its noise cleaner.

use nalgebra::Point2;

use crate::{AccumulatorParams, EdgeMap};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Number of integer angles (0..180 degrees) each edge pixel votes along.
pub const ANGLE_SAMPLES: usize = 180;

/// Square grid of vote counts, indexed `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteSpace {
    side: usize,
    votes: Vec<u32>,
}

impl VoteSpace {
    pub fn zeros(side: usize) -> Self {
        Self {
            side,
            votes: vec![0; side * side],
        }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.votes[y * self.side + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u32) {
        self.votes[y * self.side + x] = value;
    }

    /// Number of cells holding at least one vote.
    pub fn nonzero_count(&self) -> usize {
        self.votes.iter().filter(|&&v| v > 0).count()
    }

    /// Coordinates of cells holding at least one vote, row-major.
    pub fn nonzero_points(&self) -> Vec<Point2<i32>> {
        self.votes
            .iter()
            .enumerate()
            .filter(|(_, &v)| v > 0)
            .map(|(i, _)| Point2::new((i % self.side) as i32, (i / self.side) as i32))
            .collect()
    }
}

fn build_vote_lut(radius: f32) -> [(f32, f32); ANGLE_SAMPLES] {
    let mut lut = [(0.0f32, 0.0f32); ANGLE_SAMPLES];
    for (deg, slot) in lut.iter_mut().enumerate() {
        let (sin_t, cos_t) = (deg as f32).to_radians().sin_cos();
        *slot = (radius * cos_t, radius * sin_t);
    }
    lut
}

/// Cast circular-center votes from every edge pixel.
///
/// For each edge pixel `(x, y)` and each angle `θ` in `0..180` degrees the
/// cell `(round(x - r·cosθ), round(y - r·sinθ))` gets one vote, provided both
/// coordinates lie in `[margin, side - margin)`. The edge map is assumed
/// square; the vote space has its width as side.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "trace", skip(edges, params), fields(edges = edges.edge_count()))
)]
pub fn accumulate_votes(edges: &EdgeMap, params: &AccumulatorParams) -> VoteSpace {
    let side = edges.width();
    let mut space = VoteSpace::zeros(side);
    let lo = params.margin as i64;
    let hi = side as i64 - params.margin as i64;
    if lo >= hi {
        return space;
    }

    let lut = build_vote_lut(params.radius);
    for y in 0..edges.height().min(side) {
        for x in 0..side {
            if !edges.is_edge(x, y) {
                continue;
            }
            for &(dx, dy) in &lut {
                let a = (x as f32 - dx).round() as i64;
                let b = (y as f32 - dy).round() as i64;
                if a >= lo && a < hi && b >= lo && b < hi {
                    space.votes[b as usize * side + a as usize] += 1;
                }
            }
        }
    }
    space
}

/// Drop weak cells, then drop 4-connected blobs that are too small.
///
/// Blobs are labeled in a single pass with an explicit stack; a labeled cell
/// is never pushed again.
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(votes, params)))]
pub fn clean_votes(votes: &VoteSpace, params: &AccumulatorParams) -> VoteSpace {
    let side = votes.side;
    let mut cleaned = VoteSpace {
        side,
        votes: votes
            .votes
            .iter()
            .map(|&v| if v >= params.vote_cutoff { v } else { 0 })
            .collect(),
    };

    let mut labels = vec![0u32; side * side];
    let mut next_label = 1u32;
    let mut stack: Vec<usize> = Vec::new();
    let mut blob: Vec<usize> = Vec::new();

    for seed in 0..side * side {
        if cleaned.votes[seed] == 0 || labels[seed] != 0 {
            continue;
        }

        labels[seed] = next_label;
        stack.push(seed);
        blob.clear();
        while let Some(idx) = stack.pop() {
            blob.push(idx);
            let (x, y) = (idx % side, idx / side);
            let mut visit = |n: usize| {
                if cleaned.votes[n] != 0 && labels[n] == 0 {
                    labels[n] = next_label;
                    stack.push(n);
                }
            };
            if x + 1 < side {
                visit(idx + 1);
            }
            if x > 0 {
                visit(idx - 1);
            }
            if y + 1 < side {
                visit(idx + side);
            }
            if y > 0 {
                visit(idx - side);
            }
        }

        if blob.len() < params.min_blob_size {
            for &idx in &blob {
                cleaned.votes[idx] = 0;
            }
        }
        next_label += 1;
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect_edges;
    use fen_reader_core::RgbaImage;

    fn params() -> AccumulatorParams {
        AccumulatorParams::default()
    }

    #[test]
    fn single_isolated_cell_is_removed() {
        let mut votes = VoteSpace::zeros(16);
        votes.set(8, 8, 500);
        let cleaned = clean_votes(&votes, &params());
        assert_eq!(cleaned.nonzero_count(), 0);
    }

    #[test]
    fn empty_space_stays_empty() {
        let votes = VoteSpace::zeros(12);
        assert_eq!(clean_votes(&votes, &params()), votes);
    }

    #[test]
    fn cells_below_cutoff_are_cleared() {
        let mut votes = VoteSpace::zeros(30);
        for x in 2..27 {
            votes.set(x, 10, 179);
            votes.set(x, 20, 180);
        }
        let cleaned = clean_votes(&votes, &params());
        assert_eq!(cleaned.nonzero_count(), 25);
        assert!((2..27).all(|x| cleaned.get(x, 20) == 180 && cleaned.get(x, 10) == 0));
    }

    #[test]
    fn blob_size_threshold_is_inclusive_at_minimum() {
        let mut votes = VoteSpace::zeros(40);
        // 20-cell horizontal run survives, 19-cell run does not.
        for x in 0..20 {
            votes.set(x + 5, 5, 200);
        }
        for x in 0..19 {
            votes.set(x + 5, 30, 200);
        }
        let cleaned = clean_votes(&votes, &params());
        assert_eq!(cleaned.nonzero_count(), 20);
        assert_eq!(cleaned.get(5, 5), 200);
        assert_eq!(cleaned.get(5, 30), 0);
    }

    #[test]
    fn diagonal_neighbours_are_separate_blobs() {
        let mut votes = VoteSpace::zeros(40);
        // 25 cells on a diagonal: every cell is its own 4-connected blob.
        for i in 0..25 {
            votes.set(i + 5, i + 5, 400);
        }
        assert_eq!(clean_votes(&votes, &params()).nonzero_count(), 0);
    }

    #[test]
    fn small_radius_votes_land_on_the_edge_pixel() {
        // Bright 10x10 block in a dark 32x32 square.
        let mut img = RgbaImage::filled(32, 32, [20, 20, 20, 255]);
        for y in 11..21 {
            for x in 11..21 {
                img.put_pixel(x, y, [230, 230, 230, 255]);
            }
        }
        let edges = detect_edges(&img.view(), 100);
        let votes = accumulate_votes(&edges, &params());
        for y in 0..32 {
            for x in 0..32 {
                let inside_margin = (5..27).contains(&x) && (5..27).contains(&y);
                let expected = if edges.is_edge(x, y) && inside_margin {
                    ANGLE_SAMPLES as u32
                } else {
                    0
                };
                assert_eq!(votes.get(x, y), expected, "({x},{y})");
            }
        }
        // The edge ring is one blob, so cleaning keeps all of it.
        let cleaned = clean_votes(&votes, &params());
        assert_eq!(cleaned.nonzero_count(), votes.nonzero_count());
        assert!(cleaned.nonzero_count() > 20);
    }

    #[test]
    fn margin_wider_than_half_side_yields_no_votes() {
        let mut img = RgbaImage::filled(8, 8, [0, 0, 0, 255]);
        img.put_pixel(4, 4, [255, 255, 255, 255]);
        let edges = detect_edges(&img.view(), 10);
        assert!(!edges.is_blank());
        assert_eq!(accumulate_votes(&edges, &params()).nonzero_count(), 0);
    }
}
