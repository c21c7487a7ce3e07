//! A scripted Android framework for tests.

use seekkit_bridge::mock::MockBridge;
use seekkit_bridge::{HostBridge, ObjectHandle, Value};

pub const ACTIVITY: &str = "android/app/NativeActivity";
const ACTIVITY_THREAD: &str = "android/app/ActivityThread";
const APPLICATION: &str = "android/app/Application";
const LOCATION_MANAGER: &str = "android/location/LocationManager";
const LOCATION: &str = "android/location/Location";
const LIST: &str = "java/util/List";

pub struct AndroidFixture {
    pub providers: Vec<&'static str>,
    pub location: Option<(f64, f64)>,
    pub enabled: bool,
    pub service_available: bool,
}

impl Default for AndroidFixture {
    fn default() -> Self {
        Self {
            providers: vec!["gps", "network", "fused"],
            location: Some((37.7749, -122.4194)),
            enabled: true,
            service_available: true,
        }
    }
}

impl AndroidFixture {
    /// The scripted runtime and the activity handle to pass in.
    pub fn build(self) -> (MockBridge, ObjectHandle) {
        let mut bridge = MockBridge::new();

        let activity = bridge.new_object(ACTIVITY);
        let thread = bridge.new_object(ACTIVITY_THREAD);
        let application = bridge.new_object(APPLICATION);
        let manager = self
            .service_available
            .then(|| bridge.new_object(LOCATION_MANAGER));
        let service = bridge.new_string("location").unwrap();
        let names = self
            .providers
            .iter()
            .map(|name| bridge.new_string(name).unwrap())
            .collect();
        let providers = bridge.new_list(names);
        let fix = self.location.map(|_| bridge.new_object(LOCATION));
        let (latitude, longitude) = self.location.unwrap_or_default();
        let enabled = self.enabled;

        bridge
            .on_method(ACTIVITY, "requestPermissions", |_| Value::Void)
            .on_method(ACTIVITY_THREAD, "currentActivityThread", move |_| {
                Value::Object(Some(thread))
            })
            .on_method(ACTIVITY_THREAD, "getApplication", move |_| {
                Value::Object(Some(application))
            })
            .static_field(
                APPLICATION,
                "LOCATION_SERVICE",
                Value::Object(Some(service)),
            )
            .on_method(APPLICATION, "getSystemService", move |call| {
                match call.string_arg(0) {
                    Some("location") => Value::Object(manager),
                    _ => Value::Object(None),
                }
            })
            .on_method(LOCATION_MANAGER, "isLocationEnabled", move |_| {
                Value::Bool(enabled)
            })
            .on_method(LOCATION_MANAGER, "getAllProviders", move |_| {
                Value::Object(Some(providers))
            })
            .on_method(LOCATION_MANAGER, "getLastKnownLocation", move |_| {
                Value::Object(fix)
            })
            .on_method(LIST, "size", |call| {
                Value::Int(i32::try_from(call.target_list().len()).unwrap())
            })
            .on_method(LIST, "get", |call| {
                let index = usize::try_from(call.int_arg(0).unwrap()).unwrap();
                Value::Object(call.target_list().get(index).copied())
            })
            .on_method(LOCATION, "getLatitude", move |_| Value::Double(latitude))
            .on_method(LOCATION, "getLongitude", move |_| Value::Double(longitude));

        (bridge, activity)
    }
}
