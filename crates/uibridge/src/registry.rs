use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;
use log::{debug, warn};
use parking_lot::Mutex;
use thiserror::Error;
use uibridge_sdk::{
    ModuleCatalog, ModuleEntryFn, PluginUi, UiDescriptor, WrapContext, WrapEntry, WrapError,
    MODULE_ENTRY_SYMBOL,
};

use crate::matrix::SupportMatrix;

/// Environment variable naming an alternate adaptation-module directory, so
/// an application can bundle its own module set.
pub const MODULE_DIR_ENV: &str = "UIBRIDGE_MODULE_DIR";

/// Compile-time default module directory, overridable at build time.
const DEFAULT_MODULE_DIR: &str = match option_env!("UIBRIDGE_DEFAULT_MODULE_DIR") {
    Some(dir) => dir,
    None => "/usr/local/lib/uibridge",
};

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("no adaptation path from {ui} to {host}")]
    Unsupported { host: String, ui: String },
    #[error("failed to load adaptation module: {0}")]
    Load(#[from] libloading::Error),
    #[error("module {0} returned a null catalog")]
    NullCatalog(PathBuf),
    #[error("module {path} serves no ({host}, {ui}) pairing")]
    MissingPair {
        path: PathBuf,
        host: String,
        ui: String,
    },
}

#[derive(Debug)]
enum ModuleBacking {
    /// Registered in-process; nothing to keep alive.
    Static,
    /// The wrap function points into this library.
    Dynamic(#[allow(dead_code)] Library),
}

/// An initialized adaptation module, pinned to one pairing.
#[derive(Debug)]
pub struct LoadedModule {
    entry: WrapEntry,
    _backing: ModuleBacking,
}

impl LoadedModule {
    pub fn quality(&self) -> u32 {
        self.entry.quality
    }

    pub fn wrap(
        &self,
        context: &WrapContext<'_>,
        ui: Box<dyn PluginUi>,
    ) -> Result<Box<dyn PluginUi>, WrapError> {
        (self.entry.wrap)(context, ui)
    }
}

/// Which module would serve a pairing, before any loading happens.
enum Candidate<'a> {
    Static(&'a WrapEntry),
    Dynamic(&'a crate::matrix::WrapTableEntry),
}

impl Candidate<'_> {
    fn quality(&self) -> u32 {
        match self {
            Candidate::Static(entry) => entry.quality,
            Candidate::Dynamic(entry) => entry.quality,
        }
    }
}

/// Discovers adaptation modules, answers support queries, and loads modules
/// on demand.
///
/// Dynamic modules come from a single directory: the [`MODULE_DIR_ENV`]
/// environment variable if set, otherwise the compiled-in default. Hosts
/// that bundle adapters into their own binary register them with
/// [`register_module`](Self::register_module) instead, and hosts with
/// built-in editors can register plugin UIs with
/// [`register_ui`](Self::register_ui); statically registered entries take
/// priority over equally ranked dynamic ones, in registration order.
///
/// Loaded modules are cached by pairing for the registry's lifetime;
/// repeated requests reuse the cached module. The cache is mutated without
/// external locking only on the (expected single) GUI thread.
pub struct ModuleRegistry {
    matrix: SupportMatrix,
    static_modules: Vec<&'static ModuleCatalog>,
    static_uis: Vec<UiDescriptor>,
    loaded: Mutex<HashMap<(String, String), Arc<LoadedModule>>>,
}

impl ModuleRegistry {
    /// Registry over the configured module directory.
    pub fn new() -> Self {
        let dir = env::var_os(MODULE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODULE_DIR));
        Self::with_module_dir(dir)
    }

    pub fn with_module_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            matrix: SupportMatrix::new(dir.into()),
            static_modules: Vec::new(),
            static_uis: Vec::new(),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn matrix(&self) -> &SupportMatrix {
        &self.matrix
    }

    /// Register an in-process adaptation module.
    pub fn register_module(&mut self, catalog: &'static ModuleCatalog) {
        self.static_modules.push(catalog);
    }

    /// Register an in-process plugin UI, resolved before any UI binary is
    /// opened.
    pub fn register_ui(&mut self, descriptor: UiDescriptor) {
        self.static_uis.push(descriptor);
    }

    pub(crate) fn static_ui(&self, ui_uri: &str) -> Option<UiDescriptor> {
        self.static_uis
            .iter()
            .find(|descriptor| descriptor.ui_uri == ui_uri)
            .copied()
    }

    /// Quality rank for a pairing: 1 for identical toolkits, 0 when neither
    /// a registered nor an installed module serves it. Stable across calls
    /// within a process lifetime.
    pub fn supported(&self, host_toolkit: &str, ui_toolkit: &str) -> u32 {
        if host_toolkit == ui_toolkit {
            return 1;
        }
        self.best(host_toolkit, ui_toolkit)
            .map(|candidate| candidate.quality())
            .unwrap_or(0)
    }

    fn best(&self, host_toolkit: &str, ui_toolkit: &str) -> Option<Candidate<'_>> {
        let mut best: Option<Candidate<'_>> = None;
        let static_entries = self
            .static_modules
            .iter()
            .flat_map(|catalog| catalog.entries.iter())
            .filter(|entry| {
                entry.host_toolkit_uri == host_toolkit && entry.ui_toolkit_uri == ui_toolkit
            })
            .map(Candidate::Static);
        let dynamic = self
            .matrix
            .best(host_toolkit, ui_toolkit)
            .map(Candidate::Dynamic);
        // Strictly-better replacement keeps the earliest candidate on ties,
        // so priority is: registration order, then wrap-table order.
        for candidate in static_entries.chain(dynamic) {
            if best
                .as_ref()
                .map(|b| candidate.quality() < b.quality())
                .unwrap_or(true)
            {
                best = Some(candidate);
            }
        }
        best
    }

    /// Load (or fetch from cache) the adaptation module serving a pairing.
    ///
    /// All failure modes are errors, never panics: a host probing support
    /// is expected behavior. Identical toolkits never reach the loader; the
    /// instance path embeds them natively.
    pub fn load_or_get(
        &self,
        host_toolkit: &str,
        ui_toolkit: &str,
    ) -> Result<Arc<LoadedModule>, ModuleError> {
        let key = (host_toolkit.to_string(), ui_toolkit.to_string());
        if let Some(module) = self.loaded.lock().get(&key) {
            return Ok(Arc::clone(module));
        }

        let candidate =
            self.best(host_toolkit, ui_toolkit)
                .ok_or_else(|| ModuleError::Unsupported {
                    host: host_toolkit.to_string(),
                    ui: ui_toolkit.to_string(),
                })?;
        let module = match candidate {
            Candidate::Static(entry) => Arc::new(LoadedModule {
                entry: *entry,
                _backing: ModuleBacking::Static,
            }),
            Candidate::Dynamic(table_entry) => {
                let path = self.matrix.module_path(table_entry);
                Arc::new(self.load_dynamic(&path, host_toolkit, ui_toolkit)?)
            }
        };

        self.loaded.lock().insert(key, Arc::clone(&module));
        Ok(module)
    }

    /// Number of modules loaded so far; native embeddings never contribute.
    pub fn loaded_count(&self) -> usize {
        self.loaded.lock().len()
    }

    fn load_dynamic(
        &self,
        path: &Path,
        host_toolkit: &str,
        ui_toolkit: &str,
    ) -> Result<LoadedModule, ModuleError> {
        debug!("loading adaptation module {}", path.display());
        let library = unsafe { Library::new(path) }.map_err(|err| {
            warn!("adaptation module {} failed to load: {err}", path.display());
            err
        })?;
        let entry_fn = unsafe { library.get::<ModuleEntryFn>(MODULE_ENTRY_SYMBOL) }?;
        let catalog = unsafe { entry_fn() };
        if catalog.is_null() {
            return Err(ModuleError::NullCatalog(path.to_path_buf()));
        }
        // Static data inside the library, which the returned module keeps
        // loaded.
        let catalog = unsafe { &*catalog };

        // Trust the module's own catalog over the wrap table: pick its best
        // entry for the pairing.
        let entry = catalog
            .entries
            .iter()
            .filter(|entry| {
                entry.host_toolkit_uri == host_toolkit && entry.ui_toolkit_uri == ui_toolkit
            })
            .min_by_key(|entry| entry.quality)
            .copied()
            .ok_or_else(|| ModuleError::MissingPair {
                path: path.to_path_buf(),
                host: host_toolkit.to_string(),
                ui: ui_toolkit.to_string(),
            })?;

        Ok(LoadedModule {
            entry,
            _backing: ModuleBacking::Dynamic(library),
        })
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use uibridge_sdk::toolkit;

    use crate::matrix::module_file_name;

    use super::*;

    const ALPHA: &str = "urn:example:toolkit:alpha";
    const BETA: &str = "urn:example:toolkit:beta";

    fn passthrough(
        _context: &WrapContext<'_>,
        ui: Box<dyn PluginUi>,
    ) -> Result<Box<dyn PluginUi>, WrapError> {
        Ok(ui)
    }

    fn failing(
        _context: &WrapContext<'_>,
        _ui: Box<dyn PluginUi>,
    ) -> Result<Box<dyn PluginUi>, WrapError> {
        Err(WrapError::Rejected("always".into()))
    }

    static BETA_IN_ALPHA: ModuleCatalog = ModuleCatalog {
        entries: &[WrapEntry {
            host_toolkit_uri: ALPHA,
            ui_toolkit_uri: BETA,
            quality: 2,
            wrap: passthrough,
        }],
    };

    static BETA_IN_ALPHA_WORSE: ModuleCatalog = ModuleCatalog {
        entries: &[WrapEntry {
            host_toolkit_uri: ALPHA,
            ui_toolkit_uri: BETA,
            quality: 4,
            wrap: failing,
        }],
    };

    fn registry() -> ModuleRegistry {
        ModuleRegistry::with_module_dir(tempdir().unwrap().keep())
    }

    #[test]
    fn unknown_pairing_is_rank_zero_and_fails_to_load() {
        let registry = registry();
        assert_eq!(registry.supported(ALPHA, BETA), 0);
        let err = registry.load_or_get(ALPHA, BETA).unwrap_err();
        assert!(matches!(err, ModuleError::Unsupported { .. }));
        assert_eq!(registry.loaded_count(), 0);
    }

    #[test]
    fn registered_module_enables_its_pairing() {
        let mut registry = registry();
        registry.register_module(&BETA_IN_ALPHA);
        assert_eq!(registry.supported(ALPHA, BETA), 2);
        // Only the declared direction.
        assert_eq!(registry.supported(BETA, ALPHA), 0);
        let module = registry.load_or_get(ALPHA, BETA).unwrap();
        assert_eq!(module.quality(), 2);
    }

    #[test]
    fn best_rank_wins_regardless_of_registration_order() {
        let mut registry = registry();
        registry.register_module(&BETA_IN_ALPHA_WORSE);
        registry.register_module(&BETA_IN_ALPHA);
        assert_eq!(registry.supported(ALPHA, BETA), 2);
        let module = registry.load_or_get(ALPHA, BETA).unwrap();
        assert_eq!(module.quality(), 2);
    }

    #[test]
    fn loaded_modules_are_cached_per_pairing() {
        let mut registry = registry();
        registry.register_module(&BETA_IN_ALPHA);
        let first = registry.load_or_get(ALPHA, BETA).unwrap();
        let second = registry.load_or_get(ALPHA, BETA).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.loaded_count(), 1);
    }

    #[test]
    fn supported_is_idempotent_across_interleaved_queries() {
        let mut registry = registry();
        registry.register_module(&BETA_IN_ALPHA);
        let first = registry.supported(ALPHA, BETA);
        registry.supported(BETA, ALPHA);
        registry.supported(ALPHA, ALPHA);
        assert_eq!(registry.supported(ALPHA, BETA), first);
    }

    #[test]
    fn corrupt_dynamic_module_is_an_error_not_a_panic() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join(module_file_name("uibridge_x11_in_gtk3"))).unwrap();
        let registry = ModuleRegistry::with_module_dir(dir.path());
        // The empty file makes the pairing look installed...
        assert_eq!(registry.supported(toolkit::GTK3, toolkit::X11), 2);
        // ...but loading it surfaces a typed error.
        let err = registry.load_or_get(toolkit::GTK3, toolkit::X11).unwrap_err();
        assert!(matches!(err, ModuleError::Load(_)));
        assert_eq!(registry.loaded_count(), 0);
    }
}
