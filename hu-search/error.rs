#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    InvalidGridStep(usize),
    EmptyScaleSet,
    InvalidScale(f64),
    InvalidReferenceScale(f64),
    InvalidBlockSize(usize),
    InvalidBias(f64),
    InvalidThreadCount(usize),
    EmptyReference { width: u32, height: u32 },
    ThreadPool(String),
    Cancelled { evaluated: usize },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::InvalidGridStep(step) => {
                write!(f, "Invalid grid step: {} (must be >= 1)", step)
            }
            SearchError::EmptyScaleSet => write!(f, "Scale set is empty"),
            SearchError::InvalidScale(s) => {
                write!(f, "Invalid scale factor: {} (must be finite and > 0)", s)
            }
            SearchError::InvalidReferenceScale(s) => {
                write!(f, "Invalid reference scale: {} (must be finite and > 0)", s)
            }
            SearchError::InvalidBlockSize(size) => {
                write!(f, "Invalid threshold block size: {} (must be odd and >= 3)", size)
            }
            SearchError::InvalidBias(bias) => {
                write!(f, "Invalid threshold bias: {} (must be finite)", bias)
            }
            SearchError::InvalidThreadCount(n) => {
                write!(f, "Invalid thread count: {} (must be >= 1)", n)
            }
            SearchError::EmptyReference { width, height } => {
                write!(f, "Reference image {}x{} is empty", width, height)
            }
            SearchError::ThreadPool(msg) => write!(f, "Thread pool error: {}", msg),
            SearchError::Cancelled { evaluated } => {
                write!(f, "Search cancelled after {} candidates (incomplete)", evaluated)
            }
        }
    }
}

impl std::error::Error for SearchError {}

impl From<rayon::ThreadPoolBuildError> for SearchError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        SearchError::ThreadPool(err.to_string())
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
