use crate::config::SearchConfig;
use crate::configured_search::ConfiguredSearch;
use crate::error::SearchResult;
use crate::search::ShapeSearch;
use hu_core::{ScalePolicy, SearchParams, MULTI_SCALE_SET};

/// Fluent API builder for search configuration
#[derive(Debug, Clone, Default)]
pub struct SearchBuilder {
    params: SearchParams,
}

impl SearchBuilder {
    /// Create new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance between neighbouring scan origins
    pub fn grid_step(mut self, step: usize) -> Self {
        self.params.grid_step = step;
        self
    }

    pub fn scales(mut self, scales: &[f64]) -> Self {
        self.params.scales = scales.to_vec();
        self
    }

    pub fn scale_policy(mut self, policy: ScalePolicy) -> Self {
        self.params.scale_policy = policy;
        self
    }

    /// Resize the reference by `factor` before the footprint is fixed
    pub fn reference_scale(mut self, factor: f64) -> Self {
        self.params.reference_scale = factor;
        self
    }

    /// Set the adaptive threshold neighbourhood size
    pub fn block_size(mut self, size: usize) -> Self {
        self.params.threshold.block_size = size;
        self
    }

    /// Set the adaptive threshold bias
    pub fn bias(mut self, bias: f64) -> Self {
        self.params.threshold.bias = bias;
        self
    }

    /// Enable/disable the parallel row scan
    pub fn parallel(mut self, enable: bool) -> Self {
        self.params.parallel = enable;
        self
    }

    /// Set number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.params.n_threads = n_threads;
        self
    }

    /// Apply simple preset (single scale, every pixel)
    pub fn preset_simple(mut self) -> Self {
        self.params.grid_step = 1;
        self.params.scales = vec![1.0];
        self.params.scale_policy = ScalePolicy::Resample;
        self.params.reference_scale = 1.0;
        self
    }

    /// Apply multi-scale preset (five scales, resampled windows)
    pub fn preset_multi_scale(mut self) -> Self {
        self.params.grid_step = 2;
        self.params.scales = MULTI_SCALE_SET.to_vec();
        self.params.scale_policy = ScalePolicy::Resample;
        self.params.reference_scale = 1.0;
        self
    }

    /// Apply original preset (half-size reference, exact-footprint filter)
    pub fn preset_original(mut self) -> Self {
        self.params.grid_step = 2;
        self.params.scales = MULTI_SCALE_SET.to_vec();
        self.params.scale_policy = ScalePolicy::ExactFootprint;
        self.params.reference_scale = 0.5;
        self
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Build configured searcher
    pub fn build(self) -> SearchResult<ConfiguredSearch> {
        let search = ShapeSearch::new(self.params.clone())?;
        Ok(ConfiguredSearch {
            search,
            config: self,
        })
    }

    /// Generate summary of current configuration
    pub fn summary(&self) -> String {
        let p = &self.params;
        format!(
            "SearchBuilder: step={}, scales={:?}, policy={:?}, reference_scale={}, block={}, bias={}, parallel={}, threads={}",
            p.grid_step,
            p.scales,
            p.scale_policy,
            p.reference_scale,
            p.threshold.block_size,
            p.threshold.bias,
            p.parallel,
            p.n_threads
        )
    }

    /// Create builder from existing configuration
    pub fn from_config(config: SearchConfig) -> Self {
        Self {
            params: config.params,
        }
    }

    /// Convert to SearchConfig
    pub fn to_config(self) -> SearchConfig {
        SearchConfig {
            params: self.params,
            ..SearchConfig::new()
        }
    }
}
