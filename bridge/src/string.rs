use std::ffi::CString;

use crate::{BridgeResult, HostBridge, ObjectHandle};

/// Copy a managed string into an independently owned C string.
///
/// The copy holds the runtime's modified UTF-8 bytes, so every string the
/// runtime can hold survives, including ones with U+0000 in them.
/// `_context` is accepted so the signature mirrors the native entry point; it
/// is not consulted. The managed string is left untouched.
///
/// # Errors
/// Fails if `string` is not a managed string.
pub fn copy_managed_string<B: HostBridge + ?Sized>(
    bridge: &mut B,
    _context: Option<ObjectHandle>,
    string: ObjectHandle,
) -> BridgeResult<CString> {
    bridge.read_utf_chars(string)
}
