//! Scoped loading of a service artifact
//!
//! Loading a shared object runs its initializers; svcdeb only ever loads artifacts
//! the caller built. The library is closed when the [`LoadedArtifact`] is dropped.

use std::ffi::{CStr, c_char};
use std::path::Path;

use libloading::{Library, Symbol};

use super::{ENTRY_POINT_SYMBOL, RUNTIME_ABI_SYMBOL, SymbolSource};
use crate::error::{Result, artifact_unreadable};

type EntryPointFn = unsafe extern "C" fn() -> *const c_char;

/// A service artifact loaded for the duration of one introspection
#[derive(Debug)]
pub struct LoadedArtifact {
    library: Library,
}

impl LoadedArtifact {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(artifact_unreadable(path, "no such file"));
        }
        // SAFETY: loading runs the artifact's initializers; the artifact is the
        // caller's own build output
        let library = unsafe { Library::new(path) }.map_err(|e| artifact_unreadable(path, e))?;
        Ok(Self { library })
    }

    fn symbol<T>(&self, name: &str) -> Option<Symbol<'_, T>> {
        // SAFETY: callers name the type the runtime convention exports under `name`
        unsafe { self.library.get::<T>(name.as_bytes()) }.ok()
    }
}

impl SymbolSource for LoadedArtifact {
    fn runtime_abi(&self) -> Option<u32> {
        let marker = self.symbol::<*const u32>(RUNTIME_ABI_SYMBOL)?;
        let address = *marker;
        if address.is_null() {
            return None;
        }
        // SAFETY: the symbol is an exported, initialized u32 static
        Some(unsafe { address.read() })
    }

    fn entry_point_descriptor(&self) -> Option<std::result::Result<String, String>> {
        let entry = self.symbol::<EntryPointFn>(ENTRY_POINT_SYMBOL)?;
        // SAFETY: the entry point takes no arguments and returns a static C string
        let raw = unsafe { entry() };
        if raw.is_null() {
            return Some(Err(format!("{ENTRY_POINT_SYMBOL} returned a null pointer")));
        }
        // SAFETY: non-null and NUL-terminated per the convention; copied before unload
        let text = unsafe { CStr::from_ptr(raw) };
        Some(
            text.to_str()
                .map(str::to_owned)
                .map_err(|e| format!("{ENTRY_POINT_SYMBOL} returned invalid UTF-8: {e}")),
        )
    }
}
