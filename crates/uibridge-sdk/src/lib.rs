//! Contracts shared between the uibridge core, adaptation modules, and
//! plugin UIs.
//!
//! This crate carries no logic beyond trivial accessors: it is the interface
//! shape every participant compiles against. The core (`uibridge`) resolves
//! and drives these contracts; adaptation modules and plugin UI binaries
//! implement them and export the entry points declared in [`module`] and
//! [`ui`].
//!
//! Dynamic modules use the plain Rust ABI and must be built with the same
//! toolchain as the host, the same arrangement the host application uses for
//! its own bundled plugin set.

mod feature;
mod module;
mod port;
mod ui;
mod widget;

pub mod toolkit;

pub use feature::{find_feature, Feature};
pub use module::{
    ModuleCatalog, ModuleEntryFn, WrapContext, WrapEntry, WrapError, WrapFn, MODULE_ENTRY_SYMBOL,
};
pub use port::{
    Controller, PortEventSink, PortIndexFn, PortSubscribeFn, PortUnsubscribeFn, PortWriteFn,
    TouchFn,
};
pub use ui::{
    PluginUi, UiCatalog, UiDescriptor, UiEntryFn, UiInit, UiInstantiateError, UiInstantiateFn,
    UI_ENTRY_SYMBOL,
};
pub use widget::WidgetHandle;
