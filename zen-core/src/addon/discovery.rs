//! Discovery pass over an addon directory

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use super::loader::LibraryLoader;
use super::types::{AddonLoad, LoadResult, SkipReason};
use crate::error::{AddonError, LoadError};
use crate::platform::Platform;

/// Shared-library suffix for `platform`
pub fn resolve_suffix(platform: &Platform) -> Result<&'static str, AddonError> {
    platform.suffix()
}

/// List entries of `dir` whose file name ends with `suffix`.
///
/// Only direct children are considered. The result is sorted so passes are
/// deterministic. A missing directory, or a path that is not a directory,
/// yields no candidates. An empty suffix matches nothing.
pub fn discover_candidates(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, AddonError> {
    if suffix.is_empty() {
        return Ok(Vec::new());
    }

    let discovery_failed = |source: io::Error| AddonError::DiscoveryFailed {
        dir: dir.to_path_buf(),
        source,
    };

    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            tracing::debug!(dir = %dir.display(), "Addon path is not a directory");
            return Ok(Vec::new());
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "Addon directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(discovery_failed(e)),
    }

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(discovery_failed)? {
        let entry = entry.map_err(discovery_failed)?;
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            found.push(entry.path());
        }
    }

    found.sort();
    Ok(found)
}

/// Attempt to load one library, folding every failure into the result.
///
/// Panics raised by the loader are contained and reported as failures.
pub fn load_one<L>(loader: &L, path: &Path) -> LoadResult
where
    L: LibraryLoader + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| loader.load(path))) {
        Ok(Ok(())) => LoadResult::Loaded,
        Ok(Err(e)) => LoadResult::Failed {
            reason: e.to_string(),
        },
        Err(_) => LoadResult::Failed {
            reason: LoadError::Panicked.to_string(),
        },
    }
}

/// Load every addon in `dir` matching the platform suffix.
///
/// Each candidate is attempted exactly once, in sorted order, and a failure
/// never stops the remaining candidates. Fails only when the platform is
/// unsupported or the directory exists but cannot be read.
pub fn run_discovery<L>(
    loader: &L,
    dir: &Path,
    platform: &Platform,
) -> Result<Vec<AddonLoad>, AddonError>
where
    L: LibraryLoader + ?Sized,
{
    let suffix = resolve_suffix(platform)?;
    let candidates = discover_candidates(dir, suffix)?;

    let mut results = Vec::with_capacity(candidates.len());
    for path in candidates {
        let result = attempt(loader, &path);
        results.push(AddonLoad { path, result });
    }

    tracing::debug!(
        dir = %dir.display(),
        attempted = results.len(),
        loaded = results.iter().filter(|r| r.result.is_loaded()).count(),
        "Addon discovery finished"
    );

    Ok(results)
}

/// Load a single, explicitly named addon.
///
/// Returns [`SkipReason::ExtensionMismatch`] without touching the loader when
/// the file name does not carry the platform suffix.
pub fn load_file<L>(loader: &L, path: &Path, platform: &Platform) -> Result<LoadResult, AddonError>
where
    L: LibraryLoader + ?Sized,
{
    let suffix = resolve_suffix(platform)?;
    let matches = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(suffix));

    if !matches {
        tracing::debug!(path = %path.display(), suffix, "Skipping addon with foreign suffix");
        return Ok(LoadResult::Skipped {
            reason: SkipReason::ExtensionMismatch,
        });
    }

    Ok(attempt(loader, path))
}

fn attempt<L>(loader: &L, path: &Path) -> LoadResult
where
    L: LibraryLoader + ?Sized,
{
    if path.is_dir() {
        tracing::debug!(path = %path.display(), "Skipping addon directory entry");
        return LoadResult::Skipped {
            reason: SkipReason::NotAFile,
        };
    }

    tracing::info!(path = %path.display(), "Loading addon module from [{}]", path.display());
    let result = load_one(loader, path);
    if let LoadResult::Failed { reason } = &result {
        tracing::warn!(
            path = %path.display(),
            error = %reason,
            "Failed to load addon module [{}]",
            path.display()
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Loader that records attempts and fails for names containing "bad"
    #[derive(Default)]
    struct RecordingLoader {
        attempts: Mutex<Vec<PathBuf>>,
    }

    impl LibraryLoader for RecordingLoader {
        fn load(&self, path: &Path) -> Result<(), LoadError> {
            self.attempts.lock().unwrap().push(path.to_path_buf());
            let name = path.file_name().unwrap().to_string_lossy();
            if name.contains("bad") {
                Err(LoadError::Rejected("invalid ELF header".to_string()))
            } else {
                Ok(())
            }
        }
    }

    struct PanickingLoader;

    impl LibraryLoader for PanickingLoader {
        fn load(&self, _path: &Path) -> Result<(), LoadError> {
            panic!("loader blew up");
        }
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_discover_filters_by_suffix() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.so");
        touch(dir.path(), "b.txt");
        touch(dir.path(), "c.so");

        let found = discover_candidates(dir.path(), ".so").unwrap();
        assert_eq!(names(&found), vec!["a.so", "c.so"]);
    }

    #[test]
    fn test_discover_is_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta.dll", "alpha.dll", "mid.dll"] {
            touch(dir.path(), name);
        }

        let found = discover_candidates(dir.path(), ".dll").unwrap();
        assert_eq!(names(&found), vec!["alpha.dll", "mid.dll", "zeta.dll"]);
    }

    #[test]
    fn test_discover_does_not_recurse() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        touch(&nested, "deep.so");
        touch(dir.path(), "top.so");

        let found = discover_candidates(dir.path(), ".so").unwrap();
        assert_eq!(names(&found), vec!["top.so"]);
    }

    #[test]
    fn test_discover_requires_full_suffix() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "libfoo.so.1");
        touch(dir.path(), "libbar.dylib");

        let found = discover_candidates(dir.path(), ".so").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let found = discover_candidates(&dir.path().join("missing"), ".so").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_file_path_is_empty() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "autoload");
        let found = discover_candidates(&file, ".so").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_empty_suffix_matches_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.so");
        assert!(discover_candidates(dir.path(), "").unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_unreadable_path_fails() {
        let result = discover_candidates(Path::new("bad\0dir"), ".so");
        assert!(matches!(result, Err(AddonError::DiscoveryFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_path_through_file_fails() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "afile");

        let result = discover_candidates(&file.join("autoload"), ".so");
        match result {
            Err(AddonError::DiscoveryFailed { dir: failed, .. }) => {
                assert_eq!(failed, file.join("autoload"));
            }
            other => panic!("expected DiscoveryFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_load_one_maps_error_to_failed() {
        let dir = TempDir::new().unwrap();
        let path = touch(dir.path(), "bad.so");

        let result = load_one(&RecordingLoader::default(), &path);
        match result {
            LoadResult::Failed { reason } => assert!(reason.contains("invalid ELF header")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_load_one_contains_panics() {
        let result = load_one(&PanickingLoader, Path::new("whatever.so"));
        assert!(result.is_failed());
    }

    #[test]
    fn test_run_discovery_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "bad.so");
        touch(dir.path(), "good.so");

        let loader = RecordingLoader::default();
        let results = run_discovery(&loader, dir.path(), &Platform::Linux).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.result.is_loaded()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.result.is_failed()).count(), 1);
        assert_eq!(loader.attempts.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_run_discovery_skips_matching_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("weird.so")).unwrap();
        touch(dir.path(), "real.so");

        let loader = RecordingLoader::default();
        let results = run_discovery(&loader, dir.path(), &Platform::Linux).unwrap();

        assert_eq!(results.len(), 2);
        let weird = results
            .iter()
            .find(|r| r.path.ends_with("weird.so"))
            .unwrap();
        assert_eq!(
            weird.result,
            LoadResult::Skipped {
                reason: SkipReason::NotAFile
            }
        );
        assert_eq!(names(&loader.attempts.lock().unwrap()), vec!["real.so"]);
    }

    #[test]
    fn test_run_discovery_unsupported_platform() {
        let dir = TempDir::new().unwrap();
        let result = run_discovery(
            &RecordingLoader::default(),
            dir.path(),
            &Platform::Other("haiku".to_string()),
        );
        assert!(matches!(result, Err(AddonError::UnsupportedPlatform { .. })));
    }

    #[test]
    fn test_load_file_extension_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = touch(dir.path(), "addon.dll");

        let loader = RecordingLoader::default();
        let result = load_file(&loader, &path, &Platform::Linux).unwrap();

        assert_eq!(
            result,
            LoadResult::Skipped {
                reason: SkipReason::ExtensionMismatch
            }
        );
        assert!(loader.attempts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_load_file_matching_suffix_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = touch(dir.path(), "addon.dylib");

        let result = load_file(&RecordingLoader::default(), &path, &Platform::MacOs).unwrap();
        assert!(result.is_loaded());
    }
}
