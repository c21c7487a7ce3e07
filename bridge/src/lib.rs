//! Typed call bridge into a managed runtime.
//!
//! Native code talks to the Android framework by resolving classes, methods
//! and fields by name and then invoking them through the runtime's call
//! interface. This crate narrows that surface to the [`HostBridge`] trait so
//! the rest of seekkit can be written (and tested) without a live runtime.
//!
//! Handles handed out by a bridge are plain tokens. They can only be created
//! inside this crate and are only meaningful to the bridge that issued them.

#![warn(missing_docs)]

use std::ffi::CString;

mod error;
mod handle;
mod string;
mod value;

/// JNI-backed bridge for Android.
#[cfg(target_os = "android")]
pub mod android;

/// Scripted in-memory bridge used by tests.
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::BridgeError;
pub use handle::{ClassHandle, FieldHandle, MethodHandle, ObjectHandle, StaticMethodHandle};
pub use string::copy_managed_string;
pub use value::{Arg, Value};

/// Result alias used throughout the bridge.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Name-based access to a managed object model.
///
/// Signatures use JNI descriptor syntax, e.g. `(Ljava/lang/String;)Ljava/lang/Object;`.
/// An implementation must leave the runtime without a pending exception when
/// it returns an error.
pub trait HostBridge {
    /// Look up a class by its slash-separated binary name.
    ///
    /// # Errors
    /// [`BridgeError::ClassNotFound`] if the runtime has no such class.
    fn find_class(&mut self, name: &str) -> BridgeResult<ClassHandle>;

    /// Class of a live object.
    ///
    /// # Errors
    /// Fails if `object` is not a handle issued by this bridge.
    fn object_class(&mut self, object: ObjectHandle) -> BridgeResult<ClassHandle>;

    /// Resolve an instance method.
    ///
    /// # Errors
    /// [`BridgeError::MethodNotFound`] if no such method exists.
    fn find_method(
        &mut self,
        class: ClassHandle,
        name: &str,
        signature: &str,
    ) -> BridgeResult<MethodHandle>;

    /// Resolve a static method.
    ///
    /// # Errors
    /// [`BridgeError::MethodNotFound`] if no such method exists.
    fn find_static_method(
        &mut self,
        class: ClassHandle,
        name: &str,
        signature: &str,
    ) -> BridgeResult<StaticMethodHandle>;

    /// Resolve a static field.
    ///
    /// # Errors
    /// [`BridgeError::FieldNotFound`] if no such field exists.
    fn find_static_field(
        &mut self,
        class: ClassHandle,
        name: &str,
        signature: &str,
    ) -> BridgeResult<FieldHandle>;

    /// Read a static field previously resolved on `class`.
    ///
    /// # Errors
    /// Fails on invalid handles or if the runtime raises.
    fn get_static_field(&mut self, class: ClassHandle, field: FieldHandle) -> BridgeResult<Value>;

    /// Invoke an instance method on `target`.
    ///
    /// # Errors
    /// [`BridgeError::Exception`] if the call throws.
    fn call_method(
        &mut self,
        target: ObjectHandle,
        method: MethodHandle,
        args: &[Arg],
    ) -> BridgeResult<Value>;

    /// Invoke a static method of `class`.
    ///
    /// # Errors
    /// [`BridgeError::Exception`] if the call throws.
    fn call_static_method(
        &mut self,
        class: ClassHandle,
        method: StaticMethodHandle,
        args: &[Arg],
    ) -> BridgeResult<Value>;

    /// Create a managed string.
    ///
    /// # Errors
    /// Fails if the runtime cannot allocate.
    fn new_string(&mut self, text: &str) -> BridgeResult<ObjectHandle>;

    /// Create a managed `String[]` holding `items` in order.
    ///
    /// # Errors
    /// Fails if the runtime cannot allocate.
    fn new_string_array(&mut self, items: &[&str]) -> BridgeResult<ObjectHandle>;

    /// Copy the contents of a managed string into owned memory.
    ///
    /// The managed string stays valid; only the temporary view used for the
    /// copy is released.
    ///
    /// # Errors
    /// Fails if `string` is not a string.
    fn read_string(&mut self, string: ObjectHandle) -> BridgeResult<String>;

    /// Copy the runtime's modified UTF-8 view of a managed string.
    ///
    /// U+0000 is encoded as `C0 80` in that view, so the copy never holds an
    /// interior NUL and is a byte-for-byte image of what the runtime exposes.
    ///
    /// # Errors
    /// Fails if `string` is not a string.
    fn read_utf_chars(&mut self, string: ObjectHandle) -> BridgeResult<CString>;
}

/// Look up a class, logging a diagnostic on a miss.
///
/// The bridge has already cleared any pending runtime exception when this
/// returns an error.
///
/// # Errors
/// Propagates the bridge's lookup failure.
pub fn resolve_class<B: HostBridge + ?Sized>(bridge: &mut B, name: &str) -> BridgeResult<ClassHandle> {
    bridge.find_class(name).inspect_err(|err| {
        log::error!("cannot find {name}: {err}");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBridge;

    #[test]
    fn resolve_class_returns_handle_for_known_class() {
        let mut bridge = MockBridge::new();
        bridge.define_class("java/util/List");

        let first = resolve_class(&mut bridge, "java/util/List").unwrap();
        let second = resolve_class(&mut bridge, "java/util/List").unwrap();

        // Every lookup is a fresh resolution.
        assert_ne!(first, second);
        assert_eq!(bridge.class_name(first), Some("java/util/List"));
    }

    #[test]
    fn resolve_class_reports_miss() {
        let mut bridge = MockBridge::new();

        let err = resolve_class(&mut bridge, "android/location/LocationManager").unwrap_err();

        assert!(matches!(
            err,
            BridgeError::ClassNotFound { ref name } if name == "android/location/LocationManager"
        ));
    }
}
