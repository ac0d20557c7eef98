//! Toolkit-bridging engine for hosting plugin UIs.
//!
//! A host application built with one GUI toolkit can embed a plugin UI built
//! with another: this crate resolves an adaptation path between the two
//! toolkits, loads the adaptation module that serves it, and exposes the
//! result as a widget in the host's toolkit with port events relayed in both
//! directions.
//!
//! The pieces, in the order a host touches them:
//!
//! - [`UiHost`] records the host's port callbacks once, and is shared by
//!   every instance created from it.
//! - [`ModuleRegistry`] discovers adaptation modules, answers support/quality
//!   queries, and loads modules on demand (once per pairing per process).
//! - [`UiInstance`] is the live bridge: it owns the (possibly wrapped)
//!   plugin UI, hands out its widget, and forwards host-to-plugin port
//!   events. Plugin-to-host traffic flows straight through the host's stored
//!   callbacks; nothing here queues or buffers.
//!
//! The whole engine assumes the single-threaded GUI event loop model native
//! toolkits use. Nothing blocks except module loading, which is synchronous
//! filesystem work at first use of a pairing.

mod host;
mod instance;
mod matrix;
mod registry;
mod ui_library;

pub use host::{HostEndpoint, UiHost};
pub use instance::{InstanceConfig, InstanceError, UiInstance};
pub use matrix::SupportMatrix;
pub use registry::{LoadedModule, ModuleError, ModuleRegistry, MODULE_DIR_ENV};
pub use ui_library::{UiLibrary, UiLibraryError};

/// Re-export the shared contracts for hosts that depend on this crate alone.
pub use uibridge_sdk as sdk;
