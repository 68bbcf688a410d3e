use crate::builder::SearchBuilder;
use crate::error::SearchResult;
use crate::search::ShapeSearch;
use crate::types::{CancelToken, ScoredCandidate};
use hu_core::{MatchResult, SearchParams};
use image::GrayImage;

/// A [`ShapeSearch`] together with the builder that produced it.
#[derive(Debug, Clone)]
pub struct ConfiguredSearch {
    pub(crate) search: ShapeSearch,
    pub(crate) config: SearchBuilder,
}

impl ConfiguredSearch {
    /// Find the region of `scene` that best matches `reference`.
    pub fn locate(&self, reference: &GrayImage, scene: &GrayImage) -> SearchResult<MatchResult> {
        self.search.locate(reference, scene)
    }

    /// Cancellable variant of [`locate`](Self::locate).
    pub fn locate_with_cancel(
        &self,
        reference: &GrayImage,
        scene: &GrayImage,
        cancel: &CancelToken,
    ) -> SearchResult<MatchResult> {
        self.search.locate_with_cancel(reference, scene, cancel)
    }

    /// Score one window of `scene`.
    pub fn evaluate(
        &self,
        reference: &GrayImage,
        scene: &GrayImage,
        origin: (u32, u32),
        scale: f64,
    ) -> SearchResult<Option<ScoredCandidate>> {
        self.search.evaluate(reference, scene, origin, scale)
    }

    /// Get a reference to the underlying `ShapeSearch`.
    pub fn search(&self) -> &ShapeSearch {
        &self.search
    }

    pub fn params(&self) -> &SearchParams {
        self.search.params()
    }

    /// Get a summary of the search configuration.
    pub fn config_summary(&self) -> String {
        self.config.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_configured_search_locates() {
        let mut scene = GrayImage::from_fn(60, 60, |x, y| Luma([((x * 7 + y * 13) % 29) as u8]));
        for y in 20..30 {
            for x in 12..22 {
                scene.put_pixel(x, y, Luma([220]));
            }
        }
        let reference = GrayImage::from_pixel(10, 10, Luma([220]));

        let configured = SearchBuilder::new().threads(2).build().unwrap();
        let result = configured.locate(&reference, &scene).unwrap();
        let region = result.best_region.unwrap();
        assert_eq!((region.x, region.y), (12, 20));
        assert!(result.best_distance < 1e-12);

        let scored = configured.evaluate(&reference, &scene, (12, 20), 1.0).unwrap().unwrap();
        assert_eq!(scored.distance, result.best_distance);
        assert!(configured.config_summary().contains("threads=2"));
        assert_eq!(configured.params().n_threads, 2);
    }
}
