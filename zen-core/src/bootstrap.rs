//! Startup sequence: core library, then addons

use std::path::PathBuf;

use zen_paths::InstallLayout;

use crate::addon::{AddonLoad, LibraryLoader, run_discovery};
use crate::config::AutoloadConfig;
use crate::core_lib::load_core;
use crate::error::AddonError;
use crate::search_path;

/// What a [`bootstrap`] call loaded
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// Path of the loaded core library
    pub core: PathBuf,
    /// One entry per addon candidate
    pub addons: Vec<AddonLoad>,
}

impl Bootstrap {
    /// Number of addons loaded successfully
    pub fn loaded(&self) -> usize {
        self.addons.iter().filter(|a| a.result.is_loaded()).count()
    }

    /// Number of addons that failed to load
    pub fn failed(&self) -> usize {
        self.addons.iter().filter(|a| a.result.is_failed()).count()
    }
}

/// Run the addon discovery pass over every configured directory.
///
/// Returns immediately, without touching the filesystem, when the config is
/// suppressed. Directories are scanned in order and their results
/// concatenated. A directory that cannot be enumerated is logged and passed
/// over, so records of addons already loaded from earlier directories are
/// never lost. Only an unsupported platform or a failed search-path
/// registration fails the call.
pub fn autoload<L>(loader: &L, config: &AutoloadConfig) -> Result<Vec<AddonLoad>, AddonError>
where
    L: LibraryLoader + ?Sized,
{
    if config.suppressed {
        tracing::info!("Addon autoload suppressed");
        return Ok(Vec::new());
    }

    config.platform.suffix()?;
    search_path::register_library_dir(&config.platform, &config.library_dir)?;

    let mut results = Vec::new();
    for dir in &config.directories {
        match run_discovery(loader, dir, &config.platform) {
            Ok(loads) => results.extend(loads),
            Err(e @ AddonError::DiscoveryFailed { .. }) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable addon directory");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(results)
}

/// Load the core library, then autoload addons.
///
/// A missing or broken core aborts startup; broken addons do not.
pub fn bootstrap<L>(
    loader: &L,
    layout: &InstallLayout,
    config: &AutoloadConfig,
) -> Result<Bootstrap, AddonError>
where
    L: LibraryLoader + ?Sized,
{
    let core = load_core(loader, layout, &config.platform)?;
    let addons = autoload(loader, config)?;

    let summary = Bootstrap { core, addons };
    tracing::info!(
        loaded = summary.loaded(),
        failed = summary.failed(),
        "Startup libraries loaded"
    );

    Ok(summary)
}
