use hu_core::Rect;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One scan window: the scene rectangle that gets sampled and the scale
/// it was generated for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub region: Rect,
    pub scale: f64,
    pub scale_index: usize,
}

impl Candidate {
    /// Position in enumeration order: rows first, then columns, then scales
    pub fn order_key(&self) -> (u32, u32, usize) {
        (self.region.y, self.region.x, self.scale_index)
    }
}

/// Candidate with its descriptor distance to the reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub distance: f64,
}

impl ScoredCandidate {
    /// True if `self` should replace `other` as the best match.
    ///
    /// Lower distance wins; equal distances go to the earlier candidate.
    pub fn beats(&self, other: &ScoredCandidate) -> bool {
        match self.distance.total_cmp(&other.distance) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => {
                self.candidate.order_key() < other.candidate.order_key()
            }
        }
    }
}

/// Progress report handed to search observers after each evaluation
#[derive(Debug, Clone, Copy)]
pub struct SearchStep {
    pub scored: ScoredCandidate,
    pub best_distance: f64,
    pub evaluated: usize,
}

/// Cooperative cancellation flag shared between a search and its caller
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
