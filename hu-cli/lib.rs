use hu_moments::binarize;
use hu_search::{SearchBuilder, SearchConfig, SearchError, ShapeSearch};
use image::{GrayImage, ImageReader, RgbImage};
use log::{debug, info};
use std::path::Path;

pub mod present;

pub use hu_core::{self, MatchResult, Rect, ScalePolicy, SearchParams};
pub use hu_search::{self, CancelToken};

#[derive(Debug)]
pub enum LocatorError {
    Search(SearchError),
    Image(image::ImageError),
    Config(String),
}

impl std::fmt::Display for LocatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocatorError::Search(e) => write!(f, "Search error: {}", e),
            LocatorError::Image(e) => write!(f, "Image error: {}", e),
            LocatorError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for LocatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocatorError::Search(e) => Some(e),
            LocatorError::Image(e) => Some(e),
            LocatorError::Config(_) => None,
        }
    }
}

impl From<SearchError> for LocatorError {
    fn from(err: SearchError) -> Self {
        LocatorError::Search(err)
    }
}

impl From<image::ImageError> for LocatorError {
    fn from(err: image::ImageError) -> Self {
        LocatorError::Image(err)
    }
}

impl From<std::io::Error> for LocatorError {
    fn from(err: std::io::Error) -> Self {
        LocatorError::Image(image::ImageError::IoError(err))
    }
}

pub type LocatorResult<T> = Result<T, LocatorError>;

/// Load a search configuration, JSON for `.json` files and TOML otherwise
pub fn load_config<P: AsRef<Path>>(path: P) -> LocatorResult<SearchConfig> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let loaded = if is_json {
        SearchConfig::load_json(path)
    } else {
        SearchConfig::load_toml(path)
    };
    loaded.map_err(|e| LocatorError::Config(format!("{}: {}", path.display(), e)))
}

/// Decode any supported image file to 8-bit grayscale
pub fn load_gray<P: AsRef<Path>>(path: P) -> LocatorResult<GrayImage> {
    Ok(ImageReader::open(path)?.decode()?.to_luma8())
}

/// Decode any supported image file to 8-bit RGB
pub fn load_color<P: AsRef<Path>>(path: P) -> LocatorResult<RgbImage> {
    Ok(ImageReader::open(path)?.decode()?.to_rgb8())
}

/// High-level shape locator: image decoding plus a configured search
#[derive(Debug, Clone)]
pub struct ShapeLocator {
    search: ShapeSearch,
    config: SearchConfig,
}

impl ShapeLocator {
    /// Create a locator from a validated configuration
    pub fn new(config: SearchConfig) -> LocatorResult<Self> {
        let search = ShapeSearch::new(config.params.clone())?;
        debug!("{}", config.summary());
        Ok(Self { search, config })
    }

    pub fn from_builder(builder: SearchBuilder) -> LocatorResult<Self> {
        Self::new(builder.to_config())
    }

    /// Locate `reference` inside `scene`
    pub fn locate_images(&self, reference: &GrayImage, scene: &GrayImage) -> LocatorResult<MatchResult> {
        Ok(self.search.locate(reference, scene)?)
    }

    /// Cancellable variant of [`locate_images`](Self::locate_images)
    pub fn locate_images_with_cancel(
        &self,
        reference: &GrayImage,
        scene: &GrayImage,
        cancel: &CancelToken,
    ) -> LocatorResult<MatchResult> {
        Ok(self.search.locate_with_cancel(reference, scene, cancel)?)
    }

    /// Decode both files as grayscale and locate the reference
    pub fn locate_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        reference: P,
        scene: Q,
    ) -> LocatorResult<MatchResult> {
        let reference_img = load_gray(reference.as_ref())?;
        let scene_img = load_gray(scene.as_ref())?;
        info!(
            "Reference {} ({}x{}), scene {} ({}x{})",
            reference.as_ref().display(),
            reference_img.width(),
            reference_img.height(),
            scene.as_ref().display(),
            scene_img.width(),
            scene_img.height()
        );
        self.locate_images(&reference_img, &scene_img)
    }

    /// Binary mask the extractor sees for `region`, as 0/255
    pub fn mask(&self, region: &GrayImage) -> GrayImage {
        binarize(region, &self.config.params.threshold)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn search(&self) -> &ShapeSearch {
        &self.search
    }
}
