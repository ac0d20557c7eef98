//! Well-known toolkit URIs.
//!
//! The core treats toolkit URIs as opaque keys; these constants exist so
//! hosts, modules, and the built-in wrap table agree on spelling for the
//! common toolkits. Any other URI works the same way.

pub const GTK3: &str = "http://lv2plug.in/ns/extensions/ui#Gtk3UI";
pub const QT5: &str = "http://lv2plug.in/ns/extensions/ui#Qt5UI";
pub const X11: &str = "http://lv2plug.in/ns/extensions/ui#X11UI";
pub const WINDOWS: &str = "http://lv2plug.in/ns/extensions/ui#WindowsUI";
pub const COCOA: &str = "http://lv2plug.in/ns/extensions/ui#CocoaUI";
