//! Error types for the hydration core.

use thiserror::Error;

/// User-supplied input that was rejected before any state changed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter a size between 1 and 2000 ml (got {0})")]
    CupSizeOutOfRange(u32),

    #[error("Weight must be a positive number of kilograms (got {0})")]
    InvalidWeight(f64),

    #[error("Unknown climate `{0}`, expected one of hot, humid, mild, cold")]
    UnknownClimate(String),

    #[error("Unknown gender `{0}`, expected one of female, male, other")]
    UnknownGender(String),

    #[error("Unknown theme `{0}`, expected one of light, dark, system")]
    UnknownTheme(String),

    #[error("Unknown cup icon `{0}`")]
    UnknownIcon(String),

    #[error("No {size}ml cup in the catalog")]
    CupNotInCatalog { size: u32 },
}

/// Failures of the persistent key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
}

/// Errors returned from hydration state operations.
///
/// Storage failures never surface here, they are logged and the in-memory
/// state stays authoritative.
#[derive(Debug, Error)]
pub enum HydrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, HydrationError>;

/// Startup configuration could not be resolved.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to find a home directory for app data, set HYDRATE_DATA_DIR")]
    NoProjectDirs,
}
