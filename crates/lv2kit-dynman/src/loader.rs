//! Platform shared library loading for dynamic manifests
//!
//! The library stays loaded for as long as the [`SharedLibrary`] lives and
//! is unloaded when it is dropped, after `close` has run.

use libloading::Library;
use lv2kit::dyn_manifest::{
    DynManifestError, DynManifestLibrary, DynManifestLoader, CLOSE_SYMBOL, GET_DATA_SYMBOL,
    OPEN_SYMBOL,
};
use lv2kit_logger as logger;
use std::ffi::{c_char, c_int, c_void, CString};
use std::path::Path;
use std::ptr;

type Handle = *mut c_void;
type OpenFn = unsafe extern "C" fn(*mut Handle, *const *const c_void) -> c_int;
type GetDataFn = unsafe extern "C" fn(Handle, *mut libc::FILE, *const c_char) -> c_int;
type CloseFn = unsafe extern "C" fn(Handle);

/// Opens dynamic manifest libraries with `dlopen` / `LoadLibrary`
#[derive(Debug, Default, Clone, Copy)]
pub struct SharedLibraryLoader;

impl SharedLibraryLoader {
    pub fn new() -> Self {
        SharedLibraryLoader
    }

    #[cfg(unix)]
    fn load(path: &Path) -> Result<Library, libloading::Error> {
        use libloading::os::unix::Library as UnixLibrary;

        // Only the three manifest entry points are ever called
        let library = unsafe { UnixLibrary::open(Some(path), libc::RTLD_LAZY)? };
        Ok(library.into())
    }

    #[cfg(windows)]
    fn load(path: &Path) -> Result<Library, libloading::Error> {
        unsafe { Library::new(path) }
    }
}

impl DynManifestLoader for SharedLibraryLoader {
    fn open(&self, library: &Path) -> Result<Box<dyn DynManifestLibrary>, DynManifestError> {
        let load_failed = |reason: String| DynManifestError::LoadFailed {
            path: library.display().to_string(),
            reason,
        };
        if !library.exists() {
            return Err(load_failed("no such file".to_string()));
        }

        logger::debug(&format!(
            "Loading dynamic manifest library: {}",
            library.display()
        ));
        let loaded = Self::load(library).map_err(|e| load_failed(e.to_string()))?;
        Ok(Box::new(SharedLibrary {
            library: loaded,
            handle: ptr::null_mut(),
        }))
    }
}

/// An opened dynamic manifest library and its manifest handle
pub struct SharedLibrary {
    library: Library,
    handle: Handle,
}

impl SharedLibrary {
    fn symbol<T: Copy>(&self, name: &'static str) -> Result<T, DynManifestError> {
        unsafe { self.library.get::<T>(name.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|_| DynManifestError::MissingEntryPoint(name))
    }
}

impl DynManifestLibrary for SharedLibrary {
    fn open(&mut self) -> Result<(), DynManifestError> {
        let open: OpenFn = self.symbol(OPEN_SYMBOL)?;
        // No host features are offered; the array is just its terminator
        let features: [*const c_void; 1] = [ptr::null()];
        let code = unsafe { open(&mut self.handle, features.as_ptr()) };
        if code != 0 {
            return Err(DynManifestError::CallFailed {
                symbol: OPEN_SYMBOL,
                code,
            });
        }
        Ok(())
    }

    fn get_data(&mut self, plugin_uri: &str) -> Result<String, DynManifestError> {
        let get_data: GetDataFn = self.symbol(GET_DATA_SYMBOL)?;
        let failed = |code| DynManifestError::CallFailed {
            symbol: GET_DATA_SYMBOL,
            code,
        };
        let uri = CString::new(plugin_uri).map_err(|_| failed(-1))?;

        let file = unsafe { libc::tmpfile() };
        if file.is_null() {
            return Err(failed(-1));
        }
        let code = unsafe { get_data(self.handle, file, uri.as_ptr()) };
        let text = unsafe { read_all(file) };
        unsafe { libc::fclose(file) };

        if code != 0 {
            return Err(failed(code));
        }
        tracing::debug!(
            "Dynamic manifest returned {} bytes for <{}>",
            text.len(),
            plugin_uri
        );
        Ok(text)
    }

    fn close(&mut self) -> Result<(), DynManifestError> {
        let close: CloseFn = self.symbol(CLOSE_SYMBOL)?;
        unsafe { close(self.handle) };
        self.handle = ptr::null_mut();
        Ok(())
    }
}

impl std::fmt::Debug for SharedLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedLibrary")
            .field("opened", &!self.handle.is_null())
            .finish()
    }
}

/// Rewind `file` and read it to the end
///
/// `file` must be a valid open stream.
unsafe fn read_all(file: *mut libc::FILE) -> String {
    libc::rewind(file);
    let mut out = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = libc::fread(buf.as_mut_ptr().cast(), 1, buf.len(), file);
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&out).into_owned()
}
