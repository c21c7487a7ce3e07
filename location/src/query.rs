use seekkit_bridge::{HostBridge, ObjectHandle};
use seekkit_permission::request_runtime_permissions;

use crate::{resolve_application_context, Location, LocationError, SystemLocationManager};

/// Provider queried for the last fix. The platform blends every source into it.
pub const FUSED_PROVIDER: &str = "fused";

/// Providers a device must list before the location is read.
pub const REQUIRED_PROVIDERS: usize = 3;

/// Request permissions on `activity`, then read the last `fused` fix.
///
/// Every step runs in order and the first failure ends the query. The
/// permission request does not wait for the user, so right after a first
/// grant this usually reports [`LocationError::NoLastKnownLocation`].
///
/// # Errors
/// Returns the first [`LocationError`] hit along the way.
pub fn query_last_known_location<B: HostBridge + ?Sized>(
    bridge: &mut B,
    activity: ObjectHandle,
) -> Result<Location, LocationError> {
    request_runtime_permissions(bridge, activity)?;

    let context = resolve_application_context(bridge)?;
    let manager = SystemLocationManager::obtain(bridge, context)?;
    let enabled = manager.is_location_enabled(bridge)?;
    log::debug!("location enabled: {enabled}");

    let providers = manager.leading_providers(bridge, REQUIRED_PROVIDERS)?;
    log::debug!("location providers: {}", providers.join(", "));

    let location = manager.last_known_location(bridge, FUSED_PROVIDER)?;
    log::info!(
        "last known location: {}, {}",
        location.latitude,
        location.longitude
    );
    Ok(location)
}

/// [`query_last_known_location`] rendered as `{"lat": <f>, "lon": <f>}`.
///
/// # Errors
/// As [`query_last_known_location`], plus [`LocationError::InvalidCoordinate`]
/// for non-finite coordinates.
pub fn query_last_known_location_json<B: HostBridge + ?Sized>(
    bridge: &mut B,
    activity: ObjectHandle,
) -> Result<String, LocationError> {
    query_last_known_location(bridge, activity)?.to_json()
}
