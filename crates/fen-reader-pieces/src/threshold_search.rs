//! Adaptive per-square edge threshold search.
//!
//! Too many cleaned vote cells means the threshold lets texture through, so
//! the next probe goes higher; too few means piece edges are being lost, so
//! it goes lower. The first probe of a square may reuse a threshold that
//! worked on an earlier square (see [`ThresholdCache`]).

use fen_reader_core::RgbaImageView;
use log::{debug, trace};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{accumulate_votes, clean_votes, detect_edges, ThresholdSearchParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// The two most recent thresholds that produced a successful detection.
///
/// Only a hint: squares on one board (and consecutive boards from the same
/// source) tend to share lighting, so a threshold that worked before is a
/// good first probe. Results never depend on what the cache holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdCache {
    recent: [Option<u32>; 2],
}

impl ThresholdCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn most_recent(&self) -> Option<u32> {
        self.recent[0]
    }

    #[inline]
    pub fn previous(&self) -> Option<u32> {
        self.recent[1]
    }

    /// Number of stored thresholds (0, 1 or 2).
    pub fn len(&self) -> usize {
        self.recent.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First-probe hint: the second most recent threshold, once two are known.
    ///
    /// Probing the older entry alternates between the two latest working
    /// values across squares.
    pub fn hint(&self) -> Option<u32> {
        match self.recent {
            [Some(_), Some(previous)] => Some(previous),
            _ => None,
        }
    }

    /// Push a successful threshold; the former most recent becomes previous.
    pub fn record(&mut self, threshold: u32) {
        self.recent[1] = self.recent[0];
        self.recent[0] = Some(threshold);
    }

    pub fn clear(&mut self) {
        self.recent = [None, None];
    }
}

/// What one probe observed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProbeResult {
    /// Edge pixels at this threshold.
    pub edge_count: usize,
    /// Cleaned vote cells at this threshold.
    pub points: Vec<Point2<i32>>,
}

/// Why a square was given up on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiveUpReason {
    /// No edge at all even at a permissive threshold.
    NoEdges,
    /// Permissive threshold and still no vote cell survived cleaning.
    ThresholdCollapsed,
    /// The threshold bracket became empty without reaching the window.
    BracketExhausted,
    /// The probe budget ran out.
    AttemptsExhausted,
}

/// Cleaned vote cells from the successful probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquarePoints {
    pub threshold: u32,
    pub attempts: u32,
    pub points: Vec<Point2<i32>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(SquarePoints),
    Empty {
        reason: GiveUpReason,
        attempts: u32,
        last_threshold: Option<u32>,
    },
}

impl SearchOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            SearchOutcome::Found(found) => found.attempts,
            SearchOutcome::Empty { attempts, .. } => *attempts,
        }
    }
}

/// Run the threshold search with an arbitrary probe function.
///
/// `probe(threshold)` reports the edge count and cleaned vote cells for a
/// threshold. This is the search policy on its own, so it can be driven by
/// the real image pipeline ([`search_piece_points`]) or by a synthetic model.
pub fn search_threshold_with<F>(
    params: &ThresholdSearchParams,
    cache: &mut ThresholdCache,
    mut probe: F,
) -> SearchOutcome
where
    F: FnMut(u32) -> ProbeResult,
{
    let mut lo: i64 = 0;
    let mut hi: i64 = params.max_threshold as i64;
    let mut hint = cache.hint();
    let mut last_threshold = None;

    for attempt in 1..=params.max_attempts {
        let threshold = match hint.take() {
            Some(cached) => cached,
            None => {
                if lo > hi {
                    // Re-probing an empty bracket repeats the previous answer.
                    return SearchOutcome::Empty {
                        reason: GiveUpReason::BracketExhausted,
                        attempts: attempt - 1,
                        last_threshold,
                    };
                }
                ((lo + hi).div_euclid(2)) as u32
            }
        };
        last_threshold = Some(threshold);

        let result = probe(threshold);
        let count = result.points.len();
        debug!(
            "probe #{attempt}: threshold={threshold} edges={} points={count} bracket=[{lo}, {hi}]",
            result.edge_count
        );

        if result.edge_count == 0 && threshold <= params.no_edges_threshold {
            return SearchOutcome::Empty {
                reason: GiveUpReason::NoEdges,
                attempts: attempt,
                last_threshold,
            };
        }
        if count == 0 && threshold <= params.collapse_threshold {
            return SearchOutcome::Empty {
                reason: GiveUpReason::ThresholdCollapsed,
                attempts: attempt,
                last_threshold,
            };
        }

        if count > params.wanted_max_points {
            lo = threshold as i64 + 1;
        } else if count > params.wanted_min_points {
            cache.record(threshold);
            trace!("threshold {threshold} accepted, cache now {cache:?}");
            return SearchOutcome::Found(SquarePoints {
                threshold,
                attempts: attempt,
                points: result.points,
            });
        } else {
            hi = threshold as i64 - 1;
        }
    }

    SearchOutcome::Empty {
        reason: GiveUpReason::AttemptsExhausted,
        attempts: params.max_attempts,
        last_threshold,
    }
}

/// Edge detection, vote accumulation and cleaning for one threshold.
fn probe_square(square: &RgbaImageView<'_>, threshold: u32, params: &ThresholdSearchParams) -> ProbeResult {
    let edges = detect_edges(square, threshold);
    if edges.is_blank() {
        return ProbeResult::default();
    }
    let votes = accumulate_votes(&edges, &params.accumulator);
    let cleaned = clean_votes(&votes, &params.accumulator);
    ProbeResult {
        edge_count: edges.edge_count(),
        points: cleaned.nonzero_points(),
    }
}

/// Search the edge threshold for one square and return its cleaned vote cells.
///
/// On success the threshold is recorded in `cache`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(square, params, cache), fields(side = square.width))
)]
pub fn search_piece_points(
    square: &RgbaImageView<'_>,
    params: &ThresholdSearchParams,
    cache: &mut ThresholdCache,
) -> SearchOutcome {
    search_threshold_with(params, cache, |threshold| probe_square(square, threshold, params))
}
