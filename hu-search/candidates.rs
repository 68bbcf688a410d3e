use crate::resample::scaled_length;
use crate::types::Candidate;
use hu_core::{Rect, ScalePolicy};

/// True when resizing a `pw x ph` window by `scale` lands back on `pw x ph`
/// (sizes rounded half away from zero).
pub fn scale_filter_keeps(pw: u32, ph: u32, scale: f64) -> bool {
    scaled_length(pw, scale) == Some(pw) && scaled_length(ph, scale) == Some(ph)
}

/// Everything needed to enumerate the candidates of one search
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPlan {
    scene_width: u32,
    scene_height: u32,
    footprint: (u32, u32),
    step: u32,
    scales: Vec<f64>,
    policy: ScalePolicy,
}

impl ScanPlan {
    pub fn new(
        scene: (u32, u32),
        footprint: (u32, u32),
        step: usize,
        scales: &[f64],
        policy: ScalePolicy,
    ) -> Self {
        Self {
            scene_width: scene.0,
            scene_height: scene.1,
            footprint,
            step: u32::try_from(step.max(1)).unwrap_or(u32::MAX),
            scales: scales.to_vec(),
            policy,
        }
    }

    pub fn footprint(&self) -> (u32, u32) {
        self.footprint
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// No origin fits, or there is nothing to try at each origin
    pub fn is_empty(&self) -> bool {
        let (pw, ph) = self.footprint;
        pw == 0
            || ph == 0
            || pw > self.scene_width
            || ph > self.scene_height
            || self.scales.is_empty()
    }

    fn last_x(&self) -> u32 {
        self.scene_width - self.footprint.0
    }

    fn last_y(&self) -> u32 {
        self.scene_height - self.footprint.1
    }

    /// Scan row origins, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = u32> + '_ {
        let last = if self.is_empty() { None } else { Some(self.last_y()) };
        last.into_iter()
            .flat_map(move |last| (0..=last).step_by(self.step as usize))
    }

    /// Scan column origins, left to right
    pub fn columns(&self) -> impl Iterator<Item = u32> + '_ {
        let last = if self.is_empty() { None } else { Some(self.last_x()) };
        last.into_iter()
            .flat_map(move |last| (0..=last).step_by(self.step as usize))
    }

    /// Number of scan origins, ignoring the scale filter
    pub fn origin_count(&self) -> usize {
        self.rows().count() * self.columns().count()
    }

    /// Candidates of one scan row in enumeration order
    pub fn row(&self, y: u32) -> impl Iterator<Item = Candidate> + '_ {
        self.columns().flat_map(move |x| {
            (0..self.scales.len()).filter_map(move |i| self.candidate(x, y, i))
        })
    }

    /// Candidate for origin `(x, y)` and the `scale_index`-th scale, or `None`
    /// when the scale policy drops it
    pub fn candidate(&self, x: u32, y: u32, scale_index: usize) -> Option<Candidate> {
        let scale = *self.scales.get(scale_index)?;
        let (pw, ph) = self.footprint;

        let region = match self.policy {
            ScalePolicy::ExactFootprint => {
                if !scale_filter_keeps(pw, ph, scale) {
                    return None;
                }
                Rect::new(x, y, pw, ph)
            }
            ScalePolicy::Resample => {
                let sw = scaled_length(pw, scale)?;
                let sh = scaled_length(ph, scale)?;
                Rect::new(x, y, sw, sh)
            }
        };

        if region.width == 0
            || region.height == 0
            || !region.fits_within(self.scene_width, self.scene_height)
        {
            return None;
        }

        Some(Candidate {
            region,
            scale,
            scale_index,
        })
    }

    /// Lazy iterator over every candidate in enumeration order
    pub fn iter(&self) -> CandidateGenerator<'_> {
        let cursor = if self.is_empty() { None } else { Some((0, 0, 0)) };
        CandidateGenerator { plan: self, cursor }
    }

    /// Cursor that follows `(x, y, scale_index)` in enumeration order
    fn advance(&self, x: u32, y: u32, scale_index: usize) -> Option<(u32, u32, usize)> {
        if scale_index + 1 < self.scales.len() {
            return Some((x, y, scale_index + 1));
        }
        let step = self.step as u64;
        if x as u64 + step <= self.last_x() as u64 {
            return Some((x + self.step, y, 0));
        }
        if y as u64 + step <= self.last_y() as u64 {
            return Some((0, y + self.step, 0));
        }
        None
    }
}

/// Row-major walk over a [`ScanPlan`]
#[derive(Debug, Clone)]
pub struct CandidateGenerator<'a> {
    plan: &'a ScanPlan,
    cursor: Option<(u32, u32, usize)>,
}

impl Iterator for CandidateGenerator<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        while let Some((x, y, i)) = self.cursor {
            self.cursor = self.plan.advance(x, y, i);
            if let Some(candidate) = self.plan.candidate(x, y, i) {
                return Some(candidate);
            }
        }
        None
    }
}
