use std::ffi::c_void;
use std::fmt;
use std::path::Path;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

use thiserror::Error;
use uibridge_sdk::{
    Controller, Feature, PluginUi, PortEventSink, UiInit, UiInstantiateError, WidgetHandle,
    WrapContext, WrapError,
};

use crate::host::{HostEndpoint, UiHost};
use crate::registry::{LoadedModule, ModuleError, ModuleRegistry};
use crate::ui_library::{UiLibrary, UiLibraryError};

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("no adaptation path from {ui} to {host}")]
    Unsupported { host: String, ui: String },
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error(transparent)]
    UiLibrary(#[from] UiLibraryError),
    #[error(transparent)]
    UiRejected(#[from] UiInstantiateError),
    #[error("toolkit adaptation failed: {0}")]
    Wrap(#[from] WrapError),
}

/// Everything identifying one UI instantiation. Borrowed for the duration
/// of [`UiInstance::spawn`] only; the feature list in particular is owned by
/// the caller and never retained.
#[derive(Clone, Copy)]
pub struct InstanceConfig<'a> {
    /// Toolkit of the container widget the host will embed into.
    pub container_toolkit: &'a str,
    pub plugin_uri: &'a str,
    pub ui_uri: &'a str,
    /// Toolkit the plugin's UI is actually built with.
    pub ui_toolkit: &'a str,
    pub bundle_path: &'a Path,
    pub binary_path: &'a Path,
    pub features: &'a [Feature],
}

/// A live plugin UI bridged into the host's toolkit.
///
/// Ownership is the state machine: a value of this type is a Live instance,
/// dropping it frees the adaptation state. The host must detach the widget
/// from any parent container before dropping the instance; widget
/// reachability is deliberately not tracked here.
pub struct UiInstance {
    // Dropped in declaration order: the UI (and any wrapper) first, then
    // the module and library whose code it runs.
    ui: Box<dyn PluginUi>,
    module: Option<Arc<LoadedModule>>,
    library: Option<UiLibrary>,
    // Keeps the descriptor alive for as long as the UI may call back.
    _host: Arc<UiHost>,
    container_toolkit: String,
    plugin_uri: String,
    ui_uri: String,
}

impl UiInstance {
    /// Instantiate a plugin UI and adapt it to the container toolkit.
    ///
    /// Resolves the raw UI (a registered in-process UI, else the UI binary
    /// at `config.binary_path`), instantiates it against this host's port
    /// callbacks, and, for differing toolkits, loads the adaptation module
    /// for the pairing and wraps the UI. Failure is atomic: on any error
    /// everything constructed so far is torn down and nothing is returned.
    pub fn spawn(
        host: &Arc<UiHost>,
        controller: Controller,
        registry: &ModuleRegistry,
        config: &InstanceConfig<'_>,
    ) -> Result<Self, InstanceError> {
        if registry.supported(config.container_toolkit, config.ui_toolkit) == 0 {
            return Err(InstanceError::Unsupported {
                host: config.container_toolkit.to_string(),
                ui: config.ui_toolkit.to_string(),
            });
        }

        let sink: Rc<dyn PortEventSink> = Rc::new(HostEndpoint::new(Arc::clone(host), controller));
        let init = UiInit {
            plugin_uri: config.plugin_uri,
            ui_uri: config.ui_uri,
            bundle_path: config.bundle_path,
            binary_path: config.binary_path,
        };

        let (raw, library) = match registry.static_ui(config.ui_uri) {
            Some(descriptor) => {
                let ui = (descriptor.instantiate)(&init, Rc::clone(&sink), config.features)?;
                (ui, None)
            }
            None => {
                let library = UiLibrary::open(config.binary_path)?;
                let descriptor = library.descriptor(config.ui_uri)?;
                let ui = (descriptor.instantiate)(&init, Rc::clone(&sink), config.features)?;
                (ui, Some(library))
            }
        };

        let (ui, module) = if config.container_toolkit == config.ui_toolkit {
            // Native embedding: the raw widget passes through untouched.
            (raw, None)
        } else {
            let module = registry.load_or_get(config.container_toolkit, config.ui_toolkit)?;
            let context = WrapContext {
                container_toolkit: config.container_toolkit,
                init: &init,
                sink: Rc::clone(&sink),
                features: config.features,
            };
            let wrapped = module.wrap(&context, raw)?;
            (wrapped, Some(module))
        };

        Ok(Self {
            ui,
            module,
            library,
            _host: Arc::clone(host),
            container_toolkit: config.container_toolkit.to_string(),
            plugin_uri: config.plugin_uri.to_string(),
            ui_uri: config.ui_uri.to_string(),
        })
    }

    /// The widget to embed, in the container toolkit requested at spawn.
    /// May be a wrapper created purely for adaptation rather than the
    /// plugin's own widget.
    pub fn widget(&self) -> WidgetHandle {
        self.ui.widget()
    }

    /// Deliver a host-to-plugin port value change. The buffer is forwarded
    /// verbatim and only borrowed for the call; its interpretation is
    /// between host and UI, keyed by `protocol`.
    pub fn port_event(&mut self, port: u32, protocol: u32, buffer: &[u8]) {
        self.ui.port_event(port, protocol, buffer);
    }

    /// Extension data published by the UI under `uri`, or `None` when the
    /// extension is unsupported.
    pub fn extension_data(&self, uri: &str) -> Option<NonNull<c_void>> {
        self.ui.extension_data(uri)
    }

    /// Quality rank of the adaptation in use: 1 when the UI is embedded
    /// natively.
    pub fn quality(&self) -> u32 {
        self.module
            .as_ref()
            .map(|module| module.quality())
            .unwrap_or(1)
    }

    pub fn container_toolkit(&self) -> &str {
        &self.container_toolkit
    }

    pub fn plugin_uri(&self) -> &str {
        &self.plugin_uri
    }

    pub fn ui_uri(&self) -> &str {
        &self.ui_uri
    }

    pub fn ui_library(&self) -> Option<&UiLibrary> {
        self.library.as_ref()
    }
}

impl fmt::Debug for UiInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiInstance")
            .field("plugin_uri", &self.plugin_uri)
            .field("ui_uri", &self.ui_uri)
            .field("container_toolkit", &self.container_toolkit)
            .field("quality", &self.quality())
            .finish()
    }
}
