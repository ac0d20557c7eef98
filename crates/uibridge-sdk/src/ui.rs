use std::ffi::c_void;
use std::path::Path;
use std::ptr::NonNull;
use std::rc::Rc;

use thiserror::Error;

use crate::feature::Feature;
use crate::port::PortEventSink;
use crate::widget::WidgetHandle;

/// Symbol a plugin UI binary exports to describe the UIs it contains.
pub const UI_ENTRY_SYMBOL: &[u8] = b"uibridge_ui_entry";

/// Signature of [`UI_ENTRY_SYMBOL`]. Returns a pointer to a static catalog,
/// or null if the binary has nothing to offer.
pub type UiEntryFn = unsafe extern "C" fn() -> *const UiCatalog;

/// The set of UIs exported by one binary.
pub struct UiCatalog {
    pub descriptors: &'static [UiDescriptor],
}

/// Identifying context handed to a UI at instantiation.
#[derive(Clone, Copy, Debug)]
pub struct UiInit<'a> {
    pub plugin_uri: &'a str,
    pub ui_uri: &'a str,
    pub bundle_path: &'a Path,
    pub binary_path: &'a Path,
}

#[derive(Debug, Error)]
pub enum UiInstantiateError {
    #[error("ui refused to initialize: {0}")]
    Rejected(String),
    #[error("ui requires host feature {0}")]
    MissingFeature(String),
}

/// Constructor for one UI. Must be atomic: on error, nothing the UI built
/// so far may survive.
pub type UiInstantiateFn = fn(
    &UiInit<'_>,
    Rc<dyn PortEventSink>,
    &[Feature],
) -> Result<Box<dyn PluginUi>, UiInstantiateError>;

/// Describes one instantiable UI within a [`UiCatalog`].
#[derive(Clone, Copy)]
pub struct UiDescriptor {
    /// URI identifying this specific UI.
    pub ui_uri: &'static str,
    /// Toolkit the UI's widget belongs to.
    pub toolkit_uri: &'static str,
    pub instantiate: UiInstantiateFn,
}

/// A live plugin UI, raw or wrapped.
///
/// The single capability surface the core drives: a widget in some toolkit,
/// host-to-plugin port-event delivery, and an extension-data escape hatch.
/// Adaptation modules implement this too, wrapping an inner `PluginUi` and
/// presenting a widget in the host's toolkit instead.
pub trait PluginUi {
    /// The widget, in the toolkit this UI (or its wrapper) targets. Must
    /// return the same handle for the lifetime of the UI.
    fn widget(&self) -> WidgetHandle;

    /// Host-to-plugin value-change notification. `buffer` is only valid for
    /// the duration of the call; implementations must not retain it.
    fn port_event(&mut self, port: u32, protocol: u32, buffer: &[u8]);

    /// Extension data identified by URI, or `None` when the extension is
    /// not supported. A capability query, safe to call with any URI.
    fn extension_data(&self, uri: &str) -> Option<NonNull<c_void>> {
        let _ = uri;
        None
    }
}
