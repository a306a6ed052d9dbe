//! Per-candidate outcomes of a discovery pass

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Why a candidate was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// File name lacks the platform's shared-library suffix
    ExtensionMismatch,
    /// Entry matches the suffix but is a directory
    NotAFile,
}

/// Outcome of trying to load one addon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadResult {
    /// Library is now loaded into the process
    Loaded,
    /// No load was attempted
    Skipped { reason: SkipReason },
    /// The loader reported an error
    Failed { reason: String },
}

impl LoadResult {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadResult::Loaded)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadResult::Failed { .. })
    }
}

/// A candidate path together with what happened to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonLoad {
    pub path: PathBuf,
    pub result: LoadResult,
}
