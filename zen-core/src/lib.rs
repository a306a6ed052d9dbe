//! zen-core: native core and addon loading for zen
//!
//! This crate brings the precompiled zen core library and its addons into
//! the current process:
//!
//! - **Platforms** - [`Platform`] names the shared-library suffix and core
//!   library file for each OS
//! - **Addon discovery** - [`addon::run_discovery`] loads every addon in a
//!   directory, isolating failures per library
//! - **Search path** - [`search_path::register_library_dir`] makes the core's
//!   directory visible to the Windows loader
//! - **Startup** - [`bootstrap`] loads the core, then [`autoload`]s addons
//!   unless `ZEN_NOAUTOLOAD` is set
//!
//! # Quick Start
//!
//! ```no_run
//! use zen_core::{AutoloadConfig, NativeLoader, bootstrap};
//! use zen_paths::InstallLayout;
//!
//! fn example() -> Result<(), zen_core::AddonError> {
//!     let layout = InstallLayout::from_env();
//!     let config = AutoloadConfig::from_env(&layout);
//!
//!     let loaded = bootstrap(&NativeLoader::new(), &layout, &config)?;
//!     println!("{} addons loaded, {} failed", loaded.loaded(), loaded.failed());
//!     Ok(())
//! }
//! ```

pub mod addon;
pub mod bootstrap;
pub mod config;
pub mod core_lib;
pub mod error;
pub mod platform;
pub mod search_path;

pub use addon::{AddonLoad, LibraryLoader, LoadResult, NativeLoader, SkipReason};
pub use bootstrap::{Bootstrap, autoload, bootstrap};
pub use config::{AUTOLOAD_PATH_ENV, AutoloadConfig, NO_AUTOLOAD_ENV};
pub use core_lib::load_core;
pub use error::{AddonError, LoadError};
pub use platform::Platform;
pub use search_path::SearchPathRegistration;
