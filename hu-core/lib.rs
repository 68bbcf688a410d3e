#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seven log-scaled, sign-normalized Hu moment invariants
pub type HuDescriptor = [f64; 7];

/// Scale factors used by the multi-scale search
pub const MULTI_SCALE_SET: [f64; 5] = [0.8, 0.9, 1.0, 1.1, 1.2];

/// Axis-aligned rectangle in scene pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Integer center, rounded towards the origin
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when the rectangle lies fully inside a `width x height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// How scale factors other than 1.0 turn into footprint-sized windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScalePolicy {
    /// Resize the footprint window by `s` and keep it only if the rounded
    /// size lands back on the footprint.
    ExactFootprint,
    /// Sample a `round(pw*s) x round(ph*s)` window and resample it to the
    /// footprint.
    #[default]
    Resample,
}

/// Locally-adaptive binarization parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThresholdParams {
    /// Side of the Gaussian neighbourhood (odd, >= 3)
    pub block_size: usize,
    /// Offset subtracted from the local mean
    pub bias: f64,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            block_size: 11,
            bias: 2.0,
        }
    }
}

/// Search knobs: scan density, scale coverage and extraction parameters.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchParams {
    /// Distance in pixels between neighbouring scan origins
    pub grid_step: usize,
    pub scales: Vec<f64>,
    pub scale_policy: ScalePolicy,
    /// Factor applied to the reference before its footprint is fixed
    pub reference_scale: f64,
    pub parallel: bool,
    pub n_threads: usize,
    pub threshold: ThresholdParams,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            grid_step: 1,
            scales: vec![1.0],
            scale_policy: ScalePolicy::default(),
            reference_scale: 1.0,
            parallel: true,
            n_threads: num_cpus::get().max(1),
            threshold: ThresholdParams::default(),
        }
    }
}

/// Best candidate found by a search.
///
/// `best_region` is `None` and `best_distance` is infinite when the scene
/// produced no candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchResult {
    pub best_region: Option<Rect>,
    pub best_distance: f64,
    pub best_scale: Option<f64>,
    pub candidates_evaluated: usize,
}

impl MatchResult {
    pub fn no_candidates() -> Self {
        Self {
            best_region: None,
            best_distance: f64::INFINITY,
            best_scale: None,
            candidates_evaluated: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.best_region.is_none()
    }

    pub fn center(&self) -> Option<(u32, u32)> {
        self.best_region.map(|r| r.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center_and_edges() {
        let r = Rect::new(10, 20, 31, 40);
        assert_eq!(r.center(), (25, 40));
        assert_eq!(r.right(), 41);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.area(), 31 * 40);
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(Rect::new(80, 80, 20, 20).fits_within(100, 100));
        assert!(!Rect::new(81, 80, 20, 20).fits_within(100, 100));
        assert!(!Rect::new(u32::MAX, 0, 2, 1).fits_within(100, 100));
    }

    #[test]
    fn test_no_candidates_result() {
        let result = MatchResult::no_candidates();
        assert!(result.is_empty());
        assert!(result.best_distance.is_infinite());
        assert_eq!(result.center(), None);
    }

    #[test]
    fn test_default_params() {
        let params = SearchParams::default();
        assert_eq!(params.grid_step, 1);
        assert_eq!(params.scales, vec![1.0]);
        assert_eq!(params.scale_policy, ScalePolicy::Resample);
        assert_eq!(params.threshold.block_size, 11);
        assert_eq!(params.threshold.bias, 2.0);
        assert!(params.n_threads >= 1);
    }
}
