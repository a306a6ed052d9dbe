//! Dynamic-linker search path registration
//!
//! On Windows the core library and the DLLs it links against are resolved
//! through the loader's search path, so the install `lib` directory has to be
//! registered before the first load. Other platforms resolve by absolute path
//! and need nothing.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::AddonError;
use crate::platform::Platform;

/// Variable consulted by the Windows loader when the dedicated API is missing
pub const SEARCH_PATH_ENV: &str = "PATH";

static USER_DIRS_REGISTERED: AtomicBool = AtomicBool::new(false);

/// How a library directory was made visible to the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPathRegistration {
    /// The platform resolves libraries without help
    NotRequired,
    /// Registered through the loader's directory API
    DllDirectory,
    /// Appended to the search-path environment variable
    EnvPath,
}

/// Whether any directory was registered through the loader's directory API.
///
/// Such directories are only searched when libraries are loaded with the
/// matching flags.
pub fn user_dirs_registered() -> bool {
    USER_DIRS_REGISTERED.load(Ordering::Acquire)
}

/// Make `dir` visible to the dynamic linker for `platform`.
///
/// Prefers the loader's directory API and falls back to appending `dir` to
/// `PATH`. Safe to call repeatedly with the same directory. Only a Windows
/// host registers anything, whatever `platform` says.
pub fn register_library_dir(
    platform: &Platform,
    dir: &Path,
) -> Result<SearchPathRegistration, AddonError> {
    if !platform.needs_search_path_registration() {
        return Ok(SearchPathRegistration::NotRequired);
    }

    // The process's own loader does not consult a foreign platform's search path
    if !cfg!(windows) {
        tracing::debug!(
            dir = %dir.display(),
            %platform,
            "Search path registration ignored on this host"
        );
        return Ok(SearchPathRegistration::NotRequired);
    }

    if add_dll_directory(dir) {
        USER_DIRS_REGISTERED.store(true, Ordering::Release);
        tracing::debug!(dir = %dir.display(), "Registered library directory");
        return Ok(SearchPathRegistration::DllDirectory);
    }

    append_env_path(SEARCH_PATH_ENV, dir)?;
    Ok(SearchPathRegistration::EnvPath)
}

/// Append `dir` to the path list in the environment variable `var`
fn append_env_path(var: &str, dir: &Path) -> Result<(), AddonError> {
    let current = std::env::var_os(var);
    let updated = append_search_path(current.as_deref(), dir)?;

    if current.as_deref() != Some(updated.as_os_str()) {
        // SAFETY: registration happens during single-threaded startup, before
        // any library that could read the environment concurrently is loaded.
        unsafe {
            std::env::set_var(var, &updated);
        }
        tracing::debug!(dir = %dir.display(), var, "Appended library directory to search path");
    }

    Ok(())
}

/// Append `dir` to a path list unless it is already present.
///
/// An absent or empty list becomes just `dir`.
pub fn append_search_path(current: Option<&OsStr>, dir: &Path) -> Result<OsString, AddonError> {
    let mut entries: Vec<PathBuf> = current
        .filter(|c| !c.is_empty())
        .map(|c| std::env::split_paths(c).collect())
        .unwrap_or_default();

    if !entries.iter().any(|entry| entry == dir) {
        entries.push(dir.to_path_buf());
    }

    std::env::join_paths(entries).map_err(|e| AddonError::SearchPath {
        dir: dir.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(windows)]
fn add_dll_directory(dir: &Path) -> bool {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::System::LibraryLoader::AddDllDirectory;

    let wide: Vec<u16> = dir
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: `wide` is NUL-terminated UTF-16 and outlives the call.
    let cookie = unsafe { AddDllDirectory(wide.as_ptr()) };
    !cookie.is_null()
}

#[cfg(not(windows))]
fn add_dll_directory(_dir: &Path) -> bool {
    false
}
