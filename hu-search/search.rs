use crate::candidates::ScanPlan;
use crate::error::{SearchError, SearchResult};
use crate::resample::Resampler;
use crate::types::{CancelToken, Candidate, ScoredCandidate, SearchStep};
use hu_core::{HuDescriptor, MatchResult, SearchParams};
use hu_moments::{descriptor_distance, HuExtractor};
use image::GrayImage;
use log::{debug, trace, warn};
use rayon::prelude::*;
use std::sync::Arc;

/// Check every knob of `params` before a search runs
pub fn validate_params(params: &SearchParams) -> SearchResult<()> {
    if params.grid_step == 0 {
        return Err(SearchError::InvalidGridStep(params.grid_step));
    }
    if params.scales.is_empty() {
        return Err(SearchError::EmptyScaleSet);
    }
    if let Some(&bad) = params.scales.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
        return Err(SearchError::InvalidScale(bad));
    }
    if !(params.reference_scale.is_finite() && params.reference_scale > 0.0) {
        return Err(SearchError::InvalidReferenceScale(params.reference_scale));
    }
    let block = params.threshold.block_size;
    if block < 3 || block % 2 == 0 {
        return Err(SearchError::InvalidBlockSize(block));
    }
    if !params.threshold.bias.is_finite() {
        return Err(SearchError::InvalidBias(params.threshold.bias));
    }
    if params.n_threads == 0 {
        return Err(SearchError::InvalidThreadCount(params.n_threads));
    }
    Ok(())
}

/// Reference descriptor and the footprint every window is compared at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedReference {
    pub descriptor: HuDescriptor,
    pub footprint: (u32, u32),
}

/// Partial scan state; rows combine with [`ScanOutcome::merge`]
#[derive(Debug, Clone, Copy, Default)]
struct ScanOutcome {
    best: Option<ScoredCandidate>,
    evaluated: usize,
    cancelled: bool,
}

impl ScanOutcome {
    fn offer(&mut self, scored: ScoredCandidate) {
        self.evaluated += 1;
        if self.best.map_or(true, |best| scored.beats(&best)) {
            self.best = Some(scored);
        }
    }

    fn merge(self, other: ScanOutcome) -> ScanOutcome {
        let best = match (self.best, other.best) {
            (Some(a), Some(b)) => Some(if b.beats(&a) { b } else { a }),
            (a, b) => a.or(b),
        };
        ScanOutcome {
            best,
            evaluated: self.evaluated + other.evaluated,
            cancelled: self.cancelled || other.cancelled,
        }
    }

    fn into_result(self) -> SearchResult<MatchResult> {
        if self.cancelled {
            return Err(SearchError::Cancelled {
                evaluated: self.evaluated,
            });
        }
        Ok(match self.best {
            Some(best) => MatchResult {
                best_region: Some(best.candidate.region),
                best_distance: best.distance,
                best_scale: Some(best.candidate.scale),
                candidates_evaluated: self.evaluated,
            },
            None => MatchResult {
                candidates_evaluated: self.evaluated,
                ..MatchResult::no_candidates()
            },
        })
    }
}

/// Exhaustive sliding-window search for the region of a scene whose shape
/// descriptor is closest to a reference.
///
/// The search is a pure function of its inputs: the scene and the reference
/// are only read, and a `ShapeSearch` can be reused for any number of pairs.
#[derive(Debug, Clone)]
pub struct ShapeSearch {
    params: SearchParams,
    extractor: HuExtractor,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl ShapeSearch {
    /// Validates `params` and, for parallel searches, builds the worker pool
    pub fn new(params: SearchParams) -> SearchResult<Self> {
        validate_params(&params)?;

        let pool = if params.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(params.n_threads)
                .build()?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Self {
            extractor: HuExtractor::new(params.threshold),
            params,
            pool,
        })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn extractor(&self) -> &HuExtractor {
        &self.extractor
    }

    /// Apply the reference pre-scale and describe the result once
    pub fn prepare_reference(&self, reference: &GrayImage) -> SearchResult<PreparedReference> {
        let (w, h) = reference.dimensions();
        if w == 0 || h == 0 {
            return Err(SearchError::EmptyReference {
                width: w,
                height: h,
            });
        }

        let scaled;
        let reference = if self.params.reference_scale == 1.0 {
            reference
        } else {
            scaled = Resampler::scale_image(reference, self.params.reference_scale);
            &scaled
        };

        let footprint = reference.dimensions();
        if footprint.0 == 0 || footprint.1 == 0 {
            return Err(SearchError::EmptyReference {
                width: footprint.0,
                height: footprint.1,
            });
        }

        Ok(PreparedReference {
            descriptor: self.extractor.describe(reference),
            footprint,
        })
    }

    fn plan(&self, scene: &GrayImage, footprint: (u32, u32)) -> ScanPlan {
        ScanPlan::new(
            scene.dimensions(),
            footprint,
            self.params.grid_step,
            &self.params.scales,
            self.params.scale_policy,
        )
    }

    /// Sample the candidate window at footprint size and compare it
    fn score(
        &self,
        scene: &GrayImage,
        reference: &PreparedReference,
        candidate: Candidate,
    ) -> ScoredCandidate {
        let (pw, ph) = reference.footprint;
        let window = Resampler::resample_region(scene, candidate.region, pw, ph);
        let descriptor = self.extractor.describe(&window);
        ScoredCandidate {
            candidate,
            distance: descriptor_distance(&reference.descriptor, &descriptor),
        }
    }

    fn scan_row(
        &self,
        scene: &GrayImage,
        reference: &PreparedReference,
        plan: &ScanPlan,
        y: u32,
        cancel: Option<&CancelToken>,
    ) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        if cancel.is_some_and(CancelToken::is_cancelled) {
            outcome.cancelled = true;
            return outcome;
        }
        for candidate in plan.row(y) {
            outcome.offer(self.score(scene, reference, candidate));
        }
        outcome
    }

    /// Find the best-matching region of `scene`.
    ///
    /// Returns [`MatchResult::no_candidates`] when the reference footprint
    /// does not fit inside the scene.
    pub fn locate(&self, reference: &GrayImage, scene: &GrayImage) -> SearchResult<MatchResult> {
        self.run(reference, scene, None)
    }

    /// Like [`locate`](Self::locate), but gives up with
    /// [`SearchError::Cancelled`] once `cancel` is set. The token is polled
    /// before each scan row.
    pub fn locate_with_cancel(
        &self,
        reference: &GrayImage,
        scene: &GrayImage,
        cancel: &CancelToken,
    ) -> SearchResult<MatchResult> {
        self.run(reference, scene, Some(cancel))
    }

    fn run(
        &self,
        reference: &GrayImage,
        scene: &GrayImage,
        cancel: Option<&CancelToken>,
    ) -> SearchResult<MatchResult> {
        let reference = self.prepare_reference(reference)?;
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(SearchError::Cancelled { evaluated: 0 });
        }

        let plan = self.plan(scene, reference.footprint);
        if plan.is_empty() {
            warn!(
                "Footprint {}x{} does not fit scene {}x{}, no candidates",
                reference.footprint.0,
                reference.footprint.1,
                scene.width(),
                scene.height()
            );
            return Ok(MatchResult::no_candidates());
        }

        debug!(
            "Scanning {}x{} scene with {}x{} footprint: {} origins x {} scales, step {}, {:?}",
            scene.width(),
            scene.height(),
            reference.footprint.0,
            reference.footprint.1,
            plan.origin_count(),
            plan.scales().len(),
            self.params.grid_step,
            self.params.scale_policy
        );

        let outcome = match &self.pool {
            Some(pool) => {
                let rows: Vec<u32> = plan.rows().collect();
                pool.install(|| {
                    rows.par_iter()
                        .map(|&y| self.scan_row(scene, &reference, &plan, y, cancel))
                        .reduce(ScanOutcome::default, ScanOutcome::merge)
                })
            }
            None => {
                let mut outcome = ScanOutcome::default();
                for y in plan.rows() {
                    outcome = outcome.merge(self.scan_row(scene, &reference, &plan, y, cancel));
                    if outcome.cancelled {
                        break;
                    }
                    trace!(
                        "Row {} done: {} evaluated, best {:?}",
                        y,
                        outcome.evaluated,
                        outcome.best.map(|b| b.distance)
                    );
                }
                outcome
            }
        };

        let result = outcome.into_result();
        match &result {
            Ok(found) => debug!(
                "Evaluated {} candidates, best distance {:.6} at {:?}",
                found.candidates_evaluated, found.best_distance, found.best_region
            ),
            Err(err) => debug!("{}", err),
        }
        result
    }

    /// Sequential scan that reports every evaluation to `observer`
    pub fn locate_observed<F>(
        &self,
        reference: &GrayImage,
        scene: &GrayImage,
        mut observer: F,
    ) -> SearchResult<MatchResult>
    where
        F: FnMut(&SearchStep),
    {
        let reference = self.prepare_reference(reference)?;
        let plan = self.plan(scene, reference.footprint);

        let mut outcome = ScanOutcome::default();
        for candidate in plan.iter() {
            let scored = self.score(scene, &reference, candidate);
            outcome.offer(scored);
            observer(&SearchStep {
                scored,
                best_distance: outcome.best.map_or(f64::INFINITY, |b| b.distance),
                evaluated: outcome.evaluated,
            });
        }
        outcome.into_result()
    }

    /// Score the single candidate at `origin` and `scale`.
    ///
    /// `Ok(None)` when the scaled window leaves the scene or the scale
    /// policy drops it.
    pub fn evaluate(
        &self,
        reference: &GrayImage,
        scene: &GrayImage,
        origin: (u32, u32),
        scale: f64,
    ) -> SearchResult<Option<ScoredCandidate>> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SearchError::InvalidScale(scale));
        }
        let reference = self.prepare_reference(reference)?;
        let plan = ScanPlan::new(
            scene.dimensions(),
            reference.footprint,
            1,
            &[scale],
            self.params.scale_policy,
        );
        Ok(plan
            .candidate(origin.0, origin.1, 0)
            .map(|candidate| self.score(scene, &reference, candidate)))
    }
}
