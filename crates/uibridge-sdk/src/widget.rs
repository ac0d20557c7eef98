use std::ffi::c_void;
use std::ptr::NonNull;

/// Opaque handle to a toolkit widget.
///
/// The concrete type behind the pointer matches the container toolkit URI of
/// the instantiation that produced it (a `GtkWidget*`, an X11 window id
/// wrapper, and so on). The handle is valid only while the UI that produced
/// it is alive; the embedding host must detach it from any parent container
/// before dropping the owning instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetHandle {
    ptr: NonNull<c_void>,
}

impl WidgetHandle {
    /// Wrap a raw toolkit pointer, rejecting null.
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    pub fn from_non_null(ptr: NonNull<c_void>) -> Self {
        Self { ptr }
    }

    /// The raw pointer, to be cast to the container toolkit's widget type.
    pub fn as_ptr(self) -> *mut c_void {
        self.ptr.as_ptr()
    }
}
