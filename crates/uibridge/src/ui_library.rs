use std::fmt;
use std::path::{Path, PathBuf};

use libloading::Library;
use thiserror::Error;
use uibridge_sdk::{UiCatalog, UiDescriptor, UiEntryFn, UI_ENTRY_SYMBOL};

#[derive(Debug, Error)]
pub enum UiLibraryError {
    #[error("ui binary not found at {0}")]
    MissingBinary(PathBuf),
    #[error("failed to load ui library: {0}")]
    Load(#[from] libloading::Error),
    #[error("ui binary {0} returned a null catalog")]
    NullCatalog(PathBuf),
    #[error("ui binary {path} exports no ui {uri}")]
    UnknownUi { path: PathBuf, uri: String },
}

/// A loaded plugin UI binary.
///
/// Keeps the dynamic library alive for as long as any UI instantiated from
/// its catalog may run; an instance therefore holds its `UiLibrary` until it
/// is itself dropped.
pub struct UiLibrary {
    path: PathBuf,
    // `catalog` points into `_library`, which stays loaded until this
    // struct drops.
    catalog: &'static UiCatalog,
    _library: Library,
}

impl UiLibrary {
    pub fn open(path: &Path) -> Result<Self, UiLibraryError> {
        if !path.exists() {
            return Err(UiLibraryError::MissingBinary(path.to_path_buf()));
        }
        let library = unsafe { Library::new(path) }?;
        let entry = unsafe { library.get::<UiEntryFn>(UI_ENTRY_SYMBOL) }?;
        let catalog = unsafe { entry() };
        if catalog.is_null() {
            return Err(UiLibraryError::NullCatalog(path.to_path_buf()));
        }
        // The catalog is static data inside the library, which this struct
        // keeps loaded; the 'static lifetime is upheld by ownership.
        let catalog = unsafe { &*catalog };
        Ok(Self {
            path: path.to_path_buf(),
            catalog,
            _library: library,
        })
    }

    /// Select a UI from the catalog by URI.
    pub fn descriptor(&self, ui_uri: &str) -> Result<UiDescriptor, UiLibraryError> {
        self.catalog
            .descriptors
            .iter()
            .find(|descriptor| descriptor.ui_uri == ui_uri)
            .copied()
            .ok_or_else(|| UiLibraryError::UnknownUi {
                path: self.path.clone(),
                uri: ui_uri.to_string(),
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for UiLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiLibrary")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_reported() {
        let err = UiLibrary::open(Path::new("/nonexistent/ui.so")).unwrap_err();
        assert!(matches!(err, UiLibraryError::MissingBinary(_)));
    }

    #[test]
    fn unloadable_binary_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_library.so");
        std::fs::write(&path, b"this is not a shared object").unwrap();
        let err = UiLibrary::open(&path).unwrap_err();
        assert!(matches!(err, UiLibraryError::Load(_)));
    }
}
