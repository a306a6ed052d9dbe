//! Error types for zen-core

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a loading pass as a whole
#[derive(Error, Debug)]
pub enum AddonError {
    /// No shared-library suffix is known for this platform
    #[error("Unsupported platform: {platform}")]
    UnsupportedPlatform { platform: String },

    /// The addon directory exists but could not be enumerated
    #[error("Failed to read addon directory {dir}: {source}")]
    DiscoveryFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The core library could not be loaded
    #[error("Failed to load core library {path}: {reason}")]
    CoreLoad { path: PathBuf, reason: String },

    /// The library directory could not be added to the linker search path
    #[error("Failed to register library directory {dir}: {reason}")]
    SearchPath { dir: PathBuf, reason: String },
}

/// Errors from a single library load attempt
///
/// These never escape a discovery pass; they are folded into
/// [`LoadResult::Failed`](crate::addon::LoadResult::Failed).
#[derive(Error, Debug)]
pub enum LoadError {
    /// The platform loader rejected the library
    #[error("Failed to load library: {0}")]
    Library(#[from] libloading::Error),

    /// The loader panicked while loading
    #[error("Loader panicked")]
    Panicked,

    /// A custom loader refused the library
    #[error("Library rejected: {0}")]
    Rejected(String),
}
