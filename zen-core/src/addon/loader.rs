//! Native library loading

use libloading::Library;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::LoadError;

/// Loads a shared library into the current process
///
/// Implementations must report failures through the returned error rather
/// than panicking, though callers contain panics regardless.
pub trait LibraryLoader: Send + Sync {
    /// Load the library at `path`
    fn load(&self, path: &Path) -> Result<(), LoadError>;
}

/// A library kept loaded, keyed by its canonical path
struct Retained {
    path: PathBuf,
    _library: Library,
}

/// Handles of every distinct library loaded through [`NativeLoader`].
///
/// Never drained: dropping the last handle would unload a library, and loads
/// are irreversible for the lifetime of the process. One handle per path is
/// kept; a repeated load's extra handle is dropped, which only decrements the
/// platform loader's reference count. The lock also serializes calls into
/// the platform loader.
static LOADED: Mutex<Vec<Retained>> = Mutex::new(Vec::new());

fn loaded_libraries() -> MutexGuard<'static, Vec<Retained>> {
    LOADED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`LibraryLoader`] backed by the platform dynamic linker
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeLoader;

impl NativeLoader {
    pub fn new() -> Self {
        Self
    }

    /// Number of distinct libraries held for the process
    pub fn loaded_count() -> usize {
        loaded_libraries().len()
    }
}

impl LibraryLoader for NativeLoader {
    fn load(&self, path: &Path) -> Result<(), LoadError> {
        let mut loaded = loaded_libraries();

        // SAFETY: Loading runs the library's initializers. Addons are placed in
        // the install tree by the user and are trusted like the core itself.
        let library = unsafe { open(path)? };

        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if loaded.iter().any(|r| r.path == key) {
            tracing::trace!(path = %path.display(), "Library already retained");
        } else {
            tracing::trace!(path = %path.display(), "Library handle retained");
            loaded.push(Retained {
                path: key,
                _library: library,
            });
        }
        Ok(())
    }
}

#[cfg(not(windows))]
unsafe fn open(path: &Path) -> Result<Library, libloading::Error> {
    unsafe { Library::new(path) }
}

#[cfg(windows)]
unsafe fn open(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::windows::{
        LOAD_LIBRARY_SEARCH_DEFAULT_DIRS, LOAD_LIBRARY_SEARCH_DLL_LOAD_DIR,
        Library as WindowsLibrary,
    };

    // Directories added with AddDllDirectory are only searched when asked for
    if crate::search_path::user_dirs_registered() {
        let flags = LOAD_LIBRARY_SEARCH_DEFAULT_DIRS | LOAD_LIBRARY_SEARCH_DLL_LOAD_DIR;
        let library = unsafe { WindowsLibrary::load_with_flags(path, flags)? };
        Ok(library.into())
    } else {
        unsafe { Library::new(path) }
    }
}
