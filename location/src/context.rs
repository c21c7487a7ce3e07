use seekkit_bridge::{resolve_class, HostBridge, ObjectHandle};

use crate::LocationError;

const ACTIVITY_THREAD: &str = "android/app/ActivityThread";

/// Find the running `Application` through `ActivityThread`.
///
/// Nothing is cached; each call repeats the lookup.
///
/// # Errors
/// Fails if `ActivityThread` cannot be resolved or either accessor returns null.
pub fn resolve_application_context<B: HostBridge + ?Sized>(
    bridge: &mut B,
) -> Result<ObjectHandle, LocationError> {
    let activity_thread = resolve_class(bridge, ACTIVITY_THREAD)?;

    let current = bridge.find_static_method(
        activity_thread,
        "currentActivityThread",
        "()Landroid/app/ActivityThread;",
    )?;
    let thread = bridge
        .call_static_method(activity_thread, current, &[])?
        .object("ActivityThread.currentActivityThread")?;

    let get_application = bridge.find_method(
        activity_thread,
        "getApplication",
        "()Landroid/app/Application;",
    )?;
    let application = bridge
        .call_method(thread, get_application, &[])?
        .object("ActivityThread.getApplication")?;

    Ok(application)
}
