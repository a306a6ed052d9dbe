//! Installation layout and XDG paths for zen.
//!
//! A zen installation is a single root directory holding the native core
//! library and its companions:
//!
//! ```text
//! <root>/
//!   include/    C/C++ headers for building addons
//!   lib/        the core library (libzeno.so, zeno.dll, libzeno.dylib)
//!   cmake/      CMake package files
//!   autoload/   addon libraries loaded at startup
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the installation root.
pub const INSTALL_DIR_ENV: &str = "ZEN_INSTALL_DIR";

/// Paths of a zen installation, all relative to one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: PathBuf,
}

impl InstallLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the installation of the running process.
    ///
    /// Uses `$ZEN_INSTALL_DIR` if set and non-empty. Otherwise the executable
    /// is assumed to live in `<root>/bin/`, so the root is the parent of the
    /// executable's directory. Falls back to the current directory when
    /// neither can be determined.
    pub fn from_env() -> Self {
        if let Some(root) = std::env::var_os(INSTALL_DIR_ENV).filter(|v| !v.is_empty()) {
            return Self::new(root);
        }

        let root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        Self::new(root)
    }

    /// Join `parts` onto the installation root.
    ///
    /// # Examples
    ///
    /// ```
    /// use zen_paths::InstallLayout;
    ///
    /// let layout = InstallLayout::new("/opt/zen");
    /// let lib = layout.rel2abs(["lib", "libzeno.so"]);
    /// assert_eq!(lib, std::path::PathBuf::from("/opt/zen/lib/libzeno.so"));
    /// ```
    pub fn rel2abs<I, P>(&self, parts: I) -> PathBuf
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut path = self.root.clone();
        for part in parts {
            path.push(part);
        }
        path
    }

    pub fn install_dir(&self) -> &Path {
        &self.root
    }

    pub fn include_dir(&self) -> PathBuf {
        self.rel2abs(["include"])
    }

    pub fn library_dir(&self) -> PathBuf {
        self.rel2abs(["lib"])
    }

    pub fn cmake_dir(&self) -> PathBuf {
        self.rel2abs(["cmake"])
    }

    /// Directory scanned for addon libraries at startup.
    pub fn autoload_dir(&self) -> PathBuf {
        self.rel2abs(["autoload"])
    }
}

/// Get the zen data directory, home of the per-user `autoload` directory.
///
/// Returns `$XDG_DATA_HOME/zen` when that variable holds an absolute path,
/// otherwise `~/.local/share/zen`. XDG layout is used on every platform so
/// user addons live at the same documented place on Linux and macOS, rather
/// than under `~/Library/Application Support`.
pub fn data_dir() -> PathBuf {
    data_dir_from(std::env::var_os("XDG_DATA_HOME"), dirs::home_dir())
}

fn data_dir_from(xdg_data: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    // Empty or relative values are invalid under the XDG base directory rules
    if let Some(xdg) = xdg_data.map(PathBuf::from).filter(|p| p.is_absolute()) {
        return xdg.join("zen");
    }
    home.unwrap_or_default().join(".local/share/zen")
}
