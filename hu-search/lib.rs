pub mod builder;
pub mod candidates;
pub mod config;
pub mod configured_search;
pub mod error;
pub mod resample;
pub mod search;
pub mod types;

pub use builder::SearchBuilder;
pub use candidates::{scale_filter_keeps, CandidateGenerator, ScanPlan};
pub use config::SearchConfig;
pub use configured_search::ConfiguredSearch;
pub use error::{SearchError, SearchResult};
pub use resample::Resampler;
pub use search::{validate_params, PreparedReference, ShapeSearch};
pub use types::{CancelToken, Candidate, ScoredCandidate, SearchStep};

pub use hu_core::{MatchResult, Rect, ScalePolicy, SearchParams, ThresholdParams};

use image::GrayImage;

/// Locate `reference` in `scene` with default extraction parameters and
/// resampled scale windows
pub fn locate(
    reference: &GrayImage,
    scene: &GrayImage,
    grid_step: usize,
    scales: &[f64],
) -> SearchResult<MatchResult> {
    let params = SearchParams {
        grid_step,
        scales: scales.to_vec(),
        ..SearchParams::default()
    };
    ShapeSearch::new(params)?.locate(reference, scene)
}
