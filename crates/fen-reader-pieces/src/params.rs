use serde::{Deserialize, Serialize};

/// Circular vote accumulation and vote-space cleaning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulatorParams {
    /// Radius (pixels) of the circular feature each edge pixel votes for.
    pub radius: f32,
    /// Votes landing closer than this to the square border are discarded.
    pub margin: usize,
    /// Cells with fewer votes than this are cleared before blob filtering.
    pub vote_cutoff: u32,
    /// 4-connected blobs smaller than this many cells are cleared.
    pub min_blob_size: usize,
}

impl Default for AccumulatorParams {
    fn default() -> Self {
        Self {
            radius: 0.2,
            margin: 5,
            vote_cutoff: 180,
            min_blob_size: 20,
        }
    }
}

/// Bounded binary search for a per-square edge threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSearchParams {
    /// A probe succeeds when its cleaned point count is above this value...
    #[serde(alias = "wantedMinPoints")]
    pub wanted_min_points: usize,
    /// ...and not above this one.
    #[serde(alias = "wantedMaxPoints")]
    pub wanted_max_points: usize,
    /// Upper end of the initial threshold bracket (the lower end is 0).
    pub max_threshold: u32,
    /// Probe budget per square.
    pub max_attempts: u32,
    /// An empty edge map at a probe at or below this threshold means the
    /// square has no piece.
    pub no_edges_threshold: u32,
    /// Zero cleaned points at a probe at or below this threshold means the
    /// square has no piece.
    pub collapse_threshold: u32,
    pub accumulator: AccumulatorParams,
}

impl Default for ThresholdSearchParams {
    fn default() -> Self {
        Self {
            wanted_min_points: 750,
            wanted_max_points: 900,
            max_threshold: 1000,
            max_attempts: 25,
            no_edges_threshold: 100,
            collapse_threshold: 300,
            accumulator: AccumulatorParams::default(),
        }
    }
}
