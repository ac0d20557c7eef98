use std::rc::Rc;

use thiserror::Error;

use crate::feature::Feature;
use crate::port::PortEventSink;
use crate::ui::{PluginUi, UiInit};

/// Symbol an adaptation module exports to describe the pairings it serves.
pub const MODULE_ENTRY_SYMBOL: &[u8] = b"uibridge_module_entry";

/// Signature of [`MODULE_ENTRY_SYMBOL`]. Returns a pointer to a static
/// catalog, or null if the module cannot initialize.
pub type ModuleEntryFn = unsafe extern "C" fn() -> *const ModuleCatalog;

/// The pairings one adaptation module serves.
pub struct ModuleCatalog {
    pub entries: &'static [WrapEntry],
}

#[derive(Debug, Error)]
pub enum WrapError {
    #[error("adaptation rejected the ui: {0}")]
    Rejected(String),
    #[error("adaptation requires host feature {0}")]
    MissingFeature(String),
}

/// Context for a wrap call.
pub struct WrapContext<'a> {
    /// Toolkit the produced widget must belong to.
    pub container_toolkit: &'a str,
    pub init: &'a UiInit<'a>,
    pub sink: Rc<dyn PortEventSink>,
    pub features: &'a [Feature],
}

/// Adapt a raw UI into the container toolkit. On success the returned UI's
/// widget is in the container toolkit; the raw UI is owned by the wrapper.
/// On error the raw UI is torn down with everything else.
pub type WrapFn = fn(&WrapContext<'_>, Box<dyn PluginUi>) -> Result<Box<dyn PluginUi>, WrapError>;

/// One (host toolkit, UI toolkit) pairing an adaptation module can serve.
#[derive(Clone, Copy, Debug)]
pub struct WrapEntry {
    pub host_toolkit_uri: &'static str,
    pub ui_toolkit_uri: &'static str,
    /// Adaptation quality: 1 is direct native embedding, larger values are
    /// progressively more indirect or less stable. Never 0.
    pub quality: u32,
    pub wrap: WrapFn,
}
