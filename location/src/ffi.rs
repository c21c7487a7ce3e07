//! C entry points.
//!
//! Strings returned from this module are allocated by Rust and owned by the
//! caller, who must hand each one back to [`seekkit_string_free`] exactly
//! once. Failures are logged and reported as a null pointer.

use std::ffi::{c_char, CString};

/// Move `text` to the caller, or log `error` and return null.
#[cfg(any(test, target_os = "android"))]
fn export(result: Result<String, crate::LocationError>) -> *mut c_char {
    use std::ptr;

    let text = match result {
        Ok(text) => text,
        Err(err) => {
            log::error!("location query failed: {err}");
            return ptr::null_mut();
        }
    };

    match CString::new(text) {
        Ok(text) => text.into_raw(),
        Err(err) => {
            log::error!("location text contains NUL: {err}");
            ptr::null_mut()
        }
    }
}

/// Release a string returned by a `seekkit_*` function. Null is ignored.
///
/// # Safety
/// `text` must be null or a pointer obtained from this library that has not
/// been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn seekkit_string_free(text: *mut c_char) {
    if text.is_null() {
        return;
    }
    // SAFETY: the caller guarantees `text` came from `CString::into_raw`.
    drop(unsafe { CString::from_raw(text) });
}

#[cfg(target_os = "android")]
pub use android::{seekkit_extract_utf8, seekkit_query_last_known_location};

#[cfg(target_os = "android")]
mod android {
    use std::ffi::c_char;
    use std::ptr;

    use jni::objects::JObject;
    use jni::sys::{jobject, jstring};
    use seekkit_bridge::android::JniBridge;
    use seekkit_bridge::copy_managed_string;

    use super::export;
    use crate::query_last_known_location_json;

    /// Request permissions and return the last known location as JSON.
    ///
    /// `java_vm` is accepted for the caller's convenience and not used.
    ///
    /// # Safety
    /// `jni_env` must be the `JNIEnv*` of the calling, attached thread and
    /// `ctx` a live local or global reference to an `Activity`.
    #[unsafe(no_mangle)]
    pub unsafe extern "C" fn seekkit_query_last_known_location(
        _java_vm: usize,
        jni_env: usize,
        ctx: usize,
    ) -> *mut c_char {
        // SAFETY: forwarded from the caller.
        let mut bridge = match unsafe { JniBridge::from_raw(jni_env as *mut jni::sys::JNIEnv) } {
            Ok(bridge) => bridge,
            Err(err) => {
                log::error!("invalid JNI environment: {err}");
                return ptr::null_mut();
            }
        };
        // SAFETY: `ctx` is a live reference owned by the caller; `JObject`
        // does not delete it on drop.
        let activity = bridge.adopt(unsafe { JObject::from_raw(ctx as jobject) });

        export(query_last_known_location_json(&mut bridge, activity))
    }

    /// Copy a Java string into memory owned by the caller.
    ///
    /// `ctx` is accepted for symmetry with the other entry points and not used.
    ///
    /// # Safety
    /// `jni_env` must be the `JNIEnv*` of the calling thread and `string` a
    /// live reference to a `java.lang.String`.
    #[unsafe(no_mangle)]
    pub unsafe extern "C" fn seekkit_extract_utf8(
        jni_env: usize,
        _ctx: usize,
        string: jstring,
    ) -> *mut c_char {
        // SAFETY: forwarded from the caller.
        let mut bridge = match unsafe { JniBridge::from_raw(jni_env as *mut jni::sys::JNIEnv) } {
            Ok(bridge) => bridge,
            Err(err) => {
                log::error!("invalid JNI environment: {err}");
                return ptr::null_mut();
            }
        };
        // SAFETY: `string` is a live reference owned by the caller.
        let string = bridge.adopt(unsafe { JObject::from_raw(string) });

        match copy_managed_string(&mut bridge, None, string) {
            Ok(copy) => copy.into_raw(),
            Err(err) => {
                log::error!("failed to copy Java string: {err}");
                ptr::null_mut()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocationError;
    use std::ffi::CStr;
    use std::ptr;

    #[test]
    fn exported_text_is_released_by_free() {
        let raw = export(Ok(r#"{"lat": 1.000000, "lon": 2.000000}"#.to_owned()));
        assert!(!raw.is_null());

        // SAFETY: `raw` was just produced by `export`.
        let text = unsafe { CStr::from_ptr(raw) }.to_str().unwrap().to_owned();
        assert_eq!(text, r#"{"lat": 1.000000, "lon": 2.000000}"#);

        // SAFETY: released exactly once.
        unsafe { seekkit_string_free(raw) };
    }

    #[test]
    fn errors_export_as_null() {
        let raw = export(Err(LocationError::NoLastKnownLocation {
            provider: "fused".into(),
        }));
        assert!(raw.is_null());
    }

    #[test]
    fn interior_nul_exports_as_null() {
        assert!(export(Ok("a\0b".to_owned())).is_null());
    }

    #[test]
    fn freeing_null_is_a_no_op() {
        // SAFETY: null is explicitly allowed.
        unsafe { seekkit_string_free(ptr::null_mut()) };
    }
}
