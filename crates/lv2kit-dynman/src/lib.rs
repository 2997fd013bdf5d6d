//! Dynamic manifest libraries opened with the platform loader
//!
//! [`SharedLibraryLoader`] implements [`lv2kit::dyn_manifest::DynManifestLoader`]
//! by opening the library with `dlopen` (Unix) or `LoadLibrary` (Windows) and
//! calling its `lv2_dyn_manifest_*` entry points. Install it on a world with
//! [`lv2kit::World::set_dyn_manifest_loader`].

mod loader;

pub use loader::{SharedLibrary, SharedLibraryLoader};
