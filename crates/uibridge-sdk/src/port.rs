use std::any::Any;
use std::sync::Arc;

use crate::feature::Feature;

/// Opaque host-side controller object.
///
/// Passed by the embedding host at instantiation and threaded back through
/// every port callback. Typically a handle to whatever object the host uses
/// to communicate with the plugin itself; `Any` so the host can downcast it
/// on the way back.
pub type Controller = Arc<dyn Any>;

/// Send a value to a plugin port. Arguments after the controller are the
/// port index, the port protocol tag, and the opaque value buffer, which is
/// only valid for the duration of the call.
pub type PortWriteFn = Box<dyn Fn(&Controller, u32, u32, &[u8])>;

/// Resolve a port index from its symbol.
pub type PortIndexFn = Box<dyn Fn(&Controller, &str) -> Option<u32>>;

/// Subscribe to notifications for a port under a given protocol. Returns
/// false if the host refuses the subscription.
pub type PortSubscribeFn = Box<dyn Fn(&Controller, u32, u32, &[Feature]) -> bool>;

/// Drop a subscription previously made through [`PortSubscribeFn`].
pub type PortUnsubscribeFn = Box<dyn Fn(&Controller, u32, u32, &[Feature]) -> bool>;

/// Notification that a control has been grabbed (`true`) or released
/// (`false`) by direct user manipulation, distinct from a value change.
pub type TouchFn = Box<dyn Fn(&Controller, u32, bool)>;

/// The narrow synchronous channel a plugin UI uses to talk back to its host.
///
/// Handed to every UI at instantiation. Calls execute on the thread that
/// owns the relevant toolkit's event loop, and may be made re-entrantly (a
/// UI is allowed to `write` during its own construction); implementations
/// must tolerate that. None of these methods queue or buffer: they run the
/// host's callback and return.
pub trait PortEventSink {
    fn write(&self, port: u32, protocol: u32, buffer: &[u8]);

    fn port_index(&self, symbol: &str) -> Option<u32>;

    fn subscribe(&self, port: u32, protocol: u32, features: &[Feature]) -> bool;

    fn unsubscribe(&self, port: u32, protocol: u32, features: &[Feature]) -> bool;

    /// No-op if the host never installed a touch callback.
    fn touch(&self, port: u32, grabbed: bool);
}
