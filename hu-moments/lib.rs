use hu_core::{HuDescriptor, ThresholdParams};
use image::GrayImage;

mod moments;
mod threshold;

pub use moments::{NormalizedMoments, RegionMoments};
pub use threshold::{binarize, gaussian_kernel};

/// Keeps `log10` defined for invariants that are exactly zero
pub const LOG_EPSILON: f64 = 1e-30;

/// Turns grayscale regions into Hu moment descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct HuExtractor {
    params: ThresholdParams,
}

impl HuExtractor {
    pub fn new(params: ThresholdParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ThresholdParams {
        &self.params
    }

    /// Binarize `region`, take its moment invariants and log-scale them.
    ///
    /// Empty regions and masks without foreground produce all-zero
    /// invariants, i.e. a descriptor of `[30.0; 7]`.
    pub fn describe(&self, region: &GrayImage) -> HuDescriptor {
        let mask = binarize(region, &self.params);
        let hu = RegionMoments::from_mask(&mask).normalized().hu_invariants();
        log_scale(&hu)
    }
}

/// `-sign(h) * log10(|h| + eps)` per component
pub fn log_scale(hu: &[f64; 7]) -> HuDescriptor {
    let mut out = [0.0; 7];
    for (o, &h) in out.iter_mut().zip(hu.iter()) {
        *o = -1.0f64.copysign(h) * (h.abs() + LOG_EPSILON).log10();
    }
    out
}

/// Euclidean distance between two descriptors
pub fn descriptor_distance(a: &HuDescriptor, b: &HuDescriptor) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
