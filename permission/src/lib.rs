//! Android runtime permission requests.
//!
//! Location access needs the fine and coarse location permissions granted at
//! runtime. This crate asks the activity for them through a [`HostBridge`];
//! the request is fire-and-forget and the user's answer is never awaited.

#![warn(missing_docs)]

use seekkit_bridge::{Arg, BridgeError, HostBridge, ObjectHandle};

/// Permissions requested before reading the location.
pub const LOCATION_PERMISSIONS: [&str; 3] = [
    "android.permission.INTERNET",
    "android.permission.ACCESS_FINE_LOCATION",
    "android.permission.ACCESS_COARSE_LOCATION",
];

/// Request code passed to `Activity.requestPermissions`.
pub const REQUEST_CODE: i32 = 1;

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: i32 = 0;
/// `PackageManager.PERMISSION_DENIED`.
const PERMISSION_DENIED: i32 = -1;

/// Status of a single permission as reported by the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    /// Permission has been granted by the user.
    Granted,
    /// Permission has been denied (or not yet granted).
    Denied,
    /// The platform answered with a code we do not know.
    NotDetermined,
}

impl PermissionStatus {
    const fn from_code(code: i32) -> Self {
        match code {
            PERMISSION_GRANTED => Self::Granted,
            PERMISSION_DENIED => Self::Denied,
            _ => Self::NotDetermined,
        }
    }
}

/// Errors that can occur when requesting permissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The call into the runtime failed.
    #[error("permission request failed: {0}")]
    Bridge(#[from] BridgeError),
}

/// Ask `activity` for [`LOCATION_PERMISSIONS`] with [`REQUEST_CODE`].
///
/// Returns as soon as the request has been issued; the platform shows its
/// dialog asynchronously and the outcome is not observed.
///
/// # Errors
/// Returns a [`PermissionError`] if building the request or resolving
/// `requestPermissions` on the activity's class fails.
pub fn request_runtime_permissions<B: HostBridge + ?Sized>(
    bridge: &mut B,
    activity: ObjectHandle,
) -> Result<(), PermissionError> {
    let activity_class = bridge.object_class(activity)?;
    let permissions = bridge.new_string_array(&LOCATION_PERMISSIONS)?;
    let request = bridge.find_method(
        activity_class,
        "requestPermissions",
        "([Ljava/lang/String;I)V",
    )?;

    bridge.call_method(
        activity,
        request,
        &[Arg::Object(permissions), Arg::Int(REQUEST_CODE)],
    )?;
    log::debug!("requested {} runtime permissions", LOCATION_PERMISSIONS.len());
    Ok(())
}

/// Check whether `context` currently holds `permission`.
///
/// # Errors
/// Returns a [`PermissionError`] if `checkSelfPermission` cannot be called.
pub fn check_self_permission<B: HostBridge + ?Sized>(
    bridge: &mut B,
    context: ObjectHandle,
    permission: &str,
) -> Result<PermissionStatus, PermissionError> {
    let context_class = bridge.object_class(context)?;
    let check = bridge.find_method(
        context_class,
        "checkSelfPermission",
        "(Ljava/lang/String;)I",
    )?;
    let name = bridge.new_string(permission)?;
    let code = bridge
        .call_method(context, check, &[Arg::Object(name)])?
        .int()?;
    Ok(PermissionStatus::from_code(code))
}
