use std::sync::Arc;

use once_cell::sync::OnceCell;
use uibridge_sdk::{
    Controller, Feature, PortEventSink, PortIndexFn, PortSubscribeFn, PortUnsubscribeFn,
    PortWriteFn, TouchFn,
};

/// Host descriptor: the port-communication callbacks a plugin UI may use to
/// reach its host.
///
/// Created once per embedding host and shared (via `Arc`) by every instance
/// built from it, which is also what enforces the lifetime contract: an
/// instance keeps its descriptor alive, so the descriptor cannot go away
/// underneath a live UI.
///
/// The four primary callbacks are fixed at construction. Callbacks may be
/// invoked re-entrantly; a plugin UI is allowed to write a port value
/// synchronously during its own construction.
pub struct UiHost {
    write: PortWriteFn,
    index: PortIndexFn,
    subscribe: PortSubscribeFn,
    unsubscribe: PortUnsubscribeFn,
    touch: OnceCell<TouchFn>,
}

impl UiHost {
    pub fn new(
        write: PortWriteFn,
        index: PortIndexFn,
        subscribe: PortSubscribeFn,
        unsubscribe: PortUnsubscribeFn,
    ) -> Self {
        Self {
            write,
            index,
            subscribe,
            unsubscribe,
            touch: OnceCell::new(),
        }
    }

    /// Install the optional touch callback.
    ///
    /// May be set at most once; returns false if a touch callback was
    /// already installed. Instances created before the call observe the new
    /// callback too, since touch dispatch reads the descriptor at call time.
    /// UIs that never report touch simply never invoke it.
    pub fn set_touch(&self, touch: TouchFn) -> bool {
        self.touch.set(touch).is_ok()
    }

    pub fn has_touch(&self) -> bool {
        self.touch.get().is_some()
    }
}

/// Binds a [`UiHost`] to one instance's controller, forming the sink handed
/// to that instance's UI. Pure pass-through: every call runs the host's
/// callback on the calling thread and returns.
pub struct HostEndpoint {
    host: Arc<UiHost>,
    controller: Controller,
}

impl HostEndpoint {
    pub fn new(host: Arc<UiHost>, controller: Controller) -> Self {
        Self { host, controller }
    }
}

impl PortEventSink for HostEndpoint {
    fn write(&self, port: u32, protocol: u32, buffer: &[u8]) {
        (self.host.write)(&self.controller, port, protocol, buffer);
    }

    fn port_index(&self, symbol: &str) -> Option<u32> {
        (self.host.index)(&self.controller, symbol)
    }

    fn subscribe(&self, port: u32, protocol: u32, features: &[Feature]) -> bool {
        (self.host.subscribe)(&self.controller, port, protocol, features)
    }

    fn unsubscribe(&self, port: u32, protocol: u32, features: &[Feature]) -> bool {
        (self.host.unsubscribe)(&self.controller, port, protocol, features)
    }

    fn touch(&self, port: u32, grabbed: bool) {
        if let Some(touch) = self.host.touch.get() {
            touch(&self.controller, port, grabbed);
        }
    }
}
