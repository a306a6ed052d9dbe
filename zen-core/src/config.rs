//! Autoload configuration

use std::ffi::OsStr;
use std::path::PathBuf;

use zen_paths::InstallLayout;

use crate::platform::Platform;

/// Any non-empty value disables the addon discovery pass
pub const NO_AUTOLOAD_ENV: &str = "ZEN_NOAUTOLOAD";

/// Extra addon directories, in the platform's path-list syntax
pub const AUTOLOAD_PATH_ENV: &str = "ZEN_AUTOLOAD_PATH";

/// Configuration for the addon discovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoloadConfig {
    /// Skip discovery entirely
    pub suppressed: bool,
    /// Platform whose library suffix is matched
    pub platform: Platform,
    /// Directory holding the core library, registered with the linker
    /// before the first addon is loaded
    pub library_dir: PathBuf,
    /// Directories scanned in order
    pub directories: Vec<PathBuf>,
}

impl AutoloadConfig {
    /// Configuration for `layout` on the current platform, not suppressed,
    /// scanning only the install `autoload` directory.
    pub fn new(layout: &InstallLayout) -> Self {
        Self {
            suppressed: false,
            platform: Platform::current(),
            library_dir: layout.library_dir(),
            directories: vec![layout.autoload_dir()],
        }
    }

    /// Configuration for `layout` read from the environment.
    ///
    /// `ZEN_NOAUTOLOAD` is read here and nowhere else. Directories are the
    /// install `autoload` directory, then `<data dir>/autoload`, then every
    /// entry of `ZEN_AUTOLOAD_PATH`.
    pub fn from_env(layout: &InstallLayout) -> Self {
        let mut config = Self::new(layout);
        config.suppressed = is_suppressed(std::env::var_os(NO_AUTOLOAD_ENV).as_deref());

        config.add_directory(zen_paths::data_dir().join("autoload"));
        if let Some(extra) = std::env::var_os(AUTOLOAD_PATH_ENV) {
            for dir in std::env::split_paths(&extra) {
                config.add_directory(dir);
            }
        }

        tracing::debug!(
            suppressed = config.suppressed,
            platform = %config.platform,
            directories = ?config.directories,
            "AutoloadConfig initialized"
        );

        config
    }

    /// Override the suppression flag
    pub fn with_suppressed(mut self, suppressed: bool) -> Self {
        self.suppressed = suppressed;
        self
    }

    /// Override the platform
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Replace the scanned directories
    pub fn with_directories(mut self, directories: Vec<PathBuf>) -> Self {
        self.directories = Vec::new();
        for dir in directories {
            self.add_directory(dir);
        }
        self
    }

    /// Append a directory to scan, ignoring empty and repeated entries
    pub fn add_directory(&mut self, dir: PathBuf) {
        if !dir.as_os_str().is_empty() && !self.directories.contains(&dir) {
            self.directories.push(dir);
        }
    }
}

/// Whether a value of `ZEN_NOAUTOLOAD` disables discovery
pub fn is_suppressed(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
