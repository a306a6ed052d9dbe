//! Platform identification and native-library naming

use std::fmt;

use crate::error::AddonError;

/// Operating system family, as far as library loading is concerned
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
    /// Any other OS, carrying the name it was identified by
    Other(String),
}

impl Platform {
    /// Platform the current process was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other(std::env::consts::OS.to_string())
        }
    }

    /// Parse an OS name as reported by hosts and build tools.
    ///
    /// Accepts `linux`, `win32`/`windows` and `darwin`/`macos`, ignoring case.
    pub fn from_os_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "linux" => Platform::Linux,
            "win32" | "windows" => Platform::Windows,
            "darwin" | "macos" => Platform::MacOs,
            other => Platform::Other(other.to_string()),
        }
    }

    /// Filename suffix of loadable shared libraries, including the dot
    pub fn suffix(&self) -> Result<&'static str, AddonError> {
        match self {
            Platform::Linux => Ok(".so"),
            Platform::Windows => Ok(".dll"),
            Platform::MacOs => Ok(".dylib"),
            Platform::Other(_) => Err(self.unsupported()),
        }
    }

    /// File name of the core library inside the install `lib` directory
    pub fn core_library_name(&self) -> Result<&'static str, AddonError> {
        match self {
            Platform::Linux => Ok("libzeno.so"),
            Platform::Windows => Ok("zeno.dll"),
            Platform::MacOs => Ok("libzeno.dylib"),
            Platform::Other(_) => Err(self.unsupported()),
        }
    }

    /// Whether the library directory must be registered with the dynamic
    /// linker before anything is loaded
    pub fn needs_search_path_registration(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    fn unsupported(&self) -> AddonError {
        AddonError::UnsupportedPlatform {
            platform: self.to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Other(name) => write!(f, "{}", name),
        }
    }
}
