use crate::builder::SearchBuilder;
use crate::error::SearchResult;
use crate::search::validate_params;
use hu_core::{ScalePolicy, SearchParams, ThresholdParams, MULTI_SCALE_SET};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Search parameters plus metadata, the unit that gets saved and loaded
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Metadata
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub version: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: SearchParams,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchConfig {
    /// Single-scale search at every pixel
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
            version: None,
            params: SearchParams::default(),
        }
    }

    /// Exhaustive single-scale scan, step 1, scale set `{1.0}`
    pub fn simple_preset() -> Self {
        Self {
            name: Some("Simple".to_string()),
            description: Some("Single-scale scan at every pixel".to_string()),
            version: Some("1.0".to_string()),
            params: SearchParams {
                grid_step: 1,
                scales: vec![1.0],
                ..SearchParams::default()
            },
        }
    }

    /// Five scales around 1.0 on a two-pixel grid, windows resampled
    pub fn multi_scale_preset() -> Self {
        Self {
            name: Some("Multi-scale".to_string()),
            description: Some("Scales 0.8 to 1.2 on a 2 px grid, resampled windows".to_string()),
            version: Some("1.0".to_string()),
            params: SearchParams {
                grid_step: 2,
                scales: MULTI_SCALE_SET.to_vec(),
                scale_policy: ScalePolicy::Resample,
                ..SearchParams::default()
            },
        }
    }

    /// Reproduces the classic person-in-crowd run: reference halved, five
    /// scales filtered to the exact footprint, two-pixel grid
    pub fn original_preset() -> Self {
        Self {
            name: Some("Original".to_string()),
            description: Some(
                "Half-size reference, exact-footprint scale filter, 2 px grid".to_string(),
            ),
            version: Some("1.0".to_string()),
            params: SearchParams {
                grid_step: 2,
                scales: MULTI_SCALE_SET.to_vec(),
                scale_policy: ScalePolicy::ExactFootprint,
                reference_scale: 0.5,
                threshold: ThresholdParams::default(),
                ..SearchParams::default()
            },
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to a [`SearchBuilder`] for further customization
    pub fn to_builder(self) -> SearchBuilder {
        SearchBuilder::from_config(self)
    }

    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        let p = &self.params;
        format!(
            "SearchConfig{}: step={}, scales={:?}, policy={:?}, reference_scale={}, threshold={}x{}/{}, parallel={} ({} threads)",
            self.name.as_deref().map(|n| format!(" '{}'", n)).unwrap_or_default(),
            p.grid_step,
            p.scales,
            p.scale_policy,
            p.reference_scale,
            p.threshold.block_size,
            p.threshold.block_size,
            p.threshold.bias,
            p.parallel,
            p.n_threads
        )
    }

    pub fn validate(&self) -> SearchResult<()> {
        validate_params(&self.params)
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON and validate
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML and validate
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    #[test]
    fn test_presets_are_valid() {
        for config in [
            SearchConfig::new(),
            SearchConfig::simple_preset(),
            SearchConfig::multi_scale_preset(),
            SearchConfig::original_preset(),
        ] {
            assert!(config.validate().is_ok(), "{}", config.summary());
        }
    }

    #[test]
    fn test_original_preset_values() {
        let config = SearchConfig::original_preset();
        assert_eq!(config.params.grid_step, 2);
        assert_eq!(config.params.scales, MULTI_SCALE_SET.to_vec());
        assert_eq!(config.params.scale_policy, ScalePolicy::ExactFootprint);
        assert_eq!(config.params.reference_scale, 0.5);
        assert_eq!(config.name.as_deref(), Some("Original"));
    }

    #[test]
    fn test_with_metadata_and_summary() {
        let config = SearchConfig::simple_preset().with_metadata("Crowd", "Person in a crowd");
        assert_eq!(config.name.as_deref(), Some("Crowd"));
        assert_eq!(config.version.as_deref(), Some("1.0"));
        let summary = config.summary();
        assert!(summary.contains("'Crowd'"));
        assert!(summary.contains("step=1"));
        assert!(summary.contains("11x11/2"));
    }

    #[test]
    fn test_validate_reports_bad_params() {
        let mut config = SearchConfig::new();
        config.params.grid_step = 0;
        assert_eq!(config.validate(), Err(SearchError::InvalidGridStep(0)));
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn test_json_round_trip() {
            let config = SearchConfig::original_preset();
            let json = config.to_json().unwrap();
            assert!(json.contains("\"exact_footprint\""));
            let back = SearchConfig::from_json(&json).unwrap();
            assert_eq!(back, config);
        }

        #[test]
        fn test_toml_round_trip() {
            let config = SearchConfig::multi_scale_preset();
            let text = config.to_toml().unwrap();
            let back = SearchConfig::from_toml(&text).unwrap();
            assert_eq!(back, config);
        }

        #[test]
        fn test_partial_toml_uses_defaults() {
            let text = "name = \"Coarse\"\n\n[params]\ngrid_step = 4\nscales = [0.9, 1.0]\n\n[params.threshold]\nbias = 5.0\n";
            let config = SearchConfig::from_toml(text).unwrap();
            assert_eq!(config.name.as_deref(), Some("Coarse"));
            assert_eq!(config.params.grid_step, 4);
            assert_eq!(config.params.scales, vec![0.9, 1.0]);
            assert_eq!(config.params.scale_policy, ScalePolicy::Resample);
            assert_eq!(config.params.threshold.block_size, 11);
            assert_eq!(config.params.threshold.bias, 5.0);
        }

        #[test]
        fn test_invalid_config_rejected_on_load() {
            let json = r#"{"params": {"grid_step": 0}}"#;
            assert!(SearchConfig::from_json(json).is_err());
        }

        #[test]
        fn test_file_round_trip() {
            let dir = std::env::temp_dir();
            let path = dir.join(format!("hu_search_config_{}.toml", std::process::id()));
            let config = SearchConfig::original_preset();
            config.save_toml(&path).unwrap();
            let loaded = SearchConfig::load_toml(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert_eq!(loaded, config);
        }
    }
}
