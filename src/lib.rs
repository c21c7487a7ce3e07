//! # Seekkit
//!
//! Android location plumbing for native clients that are embedded in a
//! managed app and need the device position without writing any Java.
//!
//! Seekkit is split by concern; enable only what you need.
//!
//! - `permission`: runtime permission requests through an activity.
//! - `location`: last known location, as a typed value or as JSON text,
//!   plus the C entry points native callers link against.
//!
//! The call bridge (`bridge`) is always available.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! seekkit = { version = "0.1", features = ["location"] }
//! ```
//!
//! ```rust,ignore
//! use seekkit::bridge::android::JniBridge;
//! use seekkit::location::query_last_known_location;
//!
//! fn locate(env: jni::JNIEnv<'_>, activity: jni::objects::JObject<'_>) {
//!     let mut bridge = JniBridge::new(env);
//!     let activity = bridge.adopt(activity);
//!     if let Ok(fix) = query_last_known_location(&mut bridge, activity) {
//!         println!("Latitude: {}, Longitude: {}", fix.latitude, fix.longitude);
//!     }
//! }
//! ```

pub use seekkit_bridge as bridge;

#[cfg(feature = "location")]
pub use seekkit_location as location;

#[cfg(feature = "permission")]
pub use seekkit_permission as permission;
