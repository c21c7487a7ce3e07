//! Android JNI test harness for seekkit crates.
//!
//! This crate is only compiled for Android targets.
//! To build: cargo ndk -t arm64-v8a build -p seekkit-test-android
//!
//! Add new crate tests by:
//! 1. Adding dependency in Cargo.toml
//! 2. Adding JNI function here
//! 3. Adding matching native declaration in MainActivity.kt

#![cfg(target_os = "android")]
#![allow(non_snake_case)]

use std::ffi::CStr;

use jni::objects::{JClass, JObject, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use seekkit_bridge::android::JniBridge;
use seekkit_location::ffi::{
    seekkit_extract_utf8, seekkit_query_last_known_location, seekkit_string_free,
};

fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("seekkit"),
    );
}

fn to_java(env: &mut JNIEnv, text: &str) -> jstring {
    match env.new_string(text) {
        Ok(string) => string.into_raw(),
        Err(err) => {
            log::error!("new_string failed: {err}");
            std::ptr::null_mut()
        }
    }
}

// ============================================================================
// Location Crate Tests
// ============================================================================

/// Request permissions and read the last known location through the typed API.
/// Returns the JSON text, or null on failure (details go to logcat).
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_seekkit_test_MainActivity_testLastKnownLocation<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    activity: JObject<'local>,
) -> jstring {
    init_logging();

    // SAFETY: both copies stay on this thread and inside this native frame.
    let mut bridge = JniBridge::new(unsafe { env.unsafe_clone() });
    let activity = bridge.adopt(activity);
    match seekkit_location::query_last_known_location_json(&mut bridge, activity) {
        Ok(json) => to_java(&mut env, &json),
        Err(err) => {
            log::error!("testLastKnownLocation failed: {err}");
            std::ptr::null_mut()
        }
    }
}

/// Same query through the C entry point, releasing the string afterwards.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_seekkit_test_MainActivity_testLastKnownLocationRaw<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    activity: JObject<'local>,
) -> jstring {
    init_logging();

    // SAFETY: `env` and `activity` are valid for this native frame.
    let raw = unsafe {
        seekkit_query_last_known_location(0, env.get_raw() as usize, activity.as_raw() as usize)
    };
    if raw.is_null() {
        return std::ptr::null_mut();
    }

    // SAFETY: non-null results are NUL-terminated strings owned by us.
    let json = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
    // SAFETY: `raw` came from seekkit and is freed exactly once.
    unsafe { seekkit_string_free(raw) };
    to_java(&mut env, &json)
}

// ============================================================================
// Bridge Crate Tests
// ============================================================================

/// Copy a Java string through the C entry point and hand the copy back.
///
/// The copy holds modified UTF-8, which `NewStringUTF` reads back unchanged,
/// so a string with embedded U+0000 returns equal to the input.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_seekkit_test_MainActivity_testExtractUtf8<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    string: JString<'local>,
) -> jstring {
    init_logging();

    let raw_env = env.get_raw();
    // SAFETY: `env` and `string` are valid for this native frame.
    let raw = unsafe { seekkit_extract_utf8(raw_env as usize, 0, string.as_raw()) };
    if raw.is_null() {
        log::error!("testExtractUtf8 failed");
        return std::ptr::null_mut();
    }

    // SAFETY: `raw_env` is this thread's env and `raw` a NUL-terminated
    // modified UTF-8 string.
    let copy = match unsafe { (**raw_env).NewStringUTF } {
        Some(new_string_utf) => unsafe { new_string_utf(raw_env, raw) },
        None => std::ptr::null_mut(),
    };
    // SAFETY: `raw` came from seekkit and is freed exactly once.
    unsafe { seekkit_string_free(raw) };
    copy
}
