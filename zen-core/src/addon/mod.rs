//! Addon discovery and loading
//!
//! Addons are independently compiled shared libraries dropped into an
//! `autoload` directory. At startup every file in that directory carrying
//! the platform suffix (`.so`, `.dll`, `.dylib`) is loaded into the process:
//!
//! - [`run_discovery`]: one best-effort pass over a directory
//! - [`LibraryLoader`]: the seam through which libraries are loaded
//! - [`NativeLoader`]: the dynamic-linker backed loader
//!
//! A failing addon is logged and reported as [`LoadResult::Failed`]; it never
//! stops the pass or the host.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use zen_core::Platform;
//! use zen_core::addon::{NativeLoader, run_discovery};
//!
//! let results = run_discovery(
//!     &NativeLoader::new(),
//!     Path::new("/opt/zen/autoload"),
//!     &Platform::current(),
//! )?;
//! for load in &results {
//!     println!("{}: {:?}", load.path.display(), load.result);
//! }
//! # Ok::<(), zen_core::AddonError>(())
//! ```

mod discovery;
mod loader;
mod types;

pub use discovery::{discover_candidates, load_file, load_one, resolve_suffix, run_discovery};
pub use loader::{LibraryLoader, NativeLoader};
pub use types::{AddonLoad, LoadResult, SkipReason};
