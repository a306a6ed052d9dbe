//! Loading of the native core library

use std::path::PathBuf;

use zen_paths::InstallLayout;

use crate::addon::{LibraryLoader, LoadResult, load_one};
use crate::error::AddonError;
use crate::platform::Platform;
use crate::search_path;

/// Load the core library from the install `lib` directory.
///
/// Registers the directory with the dynamic linker first where the platform
/// needs it. Unlike addons, failing to load the core is an error.
pub fn load_core<L>(
    loader: &L,
    layout: &InstallLayout,
    platform: &Platform,
) -> Result<PathBuf, AddonError>
where
    L: LibraryLoader + ?Sized,
{
    let name = platform.core_library_name()?;
    let lib_dir = layout.library_dir();
    search_path::register_library_dir(platform, &lib_dir)?;

    let path = lib_dir.join(name);
    tracing::debug!(path = %path.display(), "Loading core library");

    match load_one(loader, &path) {
        LoadResult::Failed { reason } => Err(AddonError::CoreLoad { path, reason }),
        _ => {
            tracing::info!(path = %path.display(), "Core library loaded");
            Ok(path)
        }
    }
}
