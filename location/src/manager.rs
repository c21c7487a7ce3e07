use seekkit_bridge::{resolve_class, Arg, ClassHandle, HostBridge, ObjectHandle};

use crate::{Location, LocationError};

const APPLICATION: &str = "android/app/Application";
const LOCATION_MANAGER: &str = "android/location/LocationManager";
const LOCATION: &str = "android/location/Location";
const LIST: &str = "java/util/List";

/// The system `LocationManager` of one application context.
///
/// Holds handles issued by the bridge it was obtained from, so it must not
/// outlive or be used with a different bridge.
#[derive(Debug, Clone, Copy)]
pub struct SystemLocationManager {
    object: ObjectHandle,
    class: ClassHandle,
}

impl SystemLocationManager {
    /// Look up `Context.LOCATION_SERVICE` and fetch that system service.
    ///
    /// # Errors
    /// Fails on any resolution miss or if the service is null.
    pub fn obtain<B: HostBridge + ?Sized>(
        bridge: &mut B,
        context: ObjectHandle,
    ) -> Result<Self, LocationError> {
        let application = resolve_class(bridge, APPLICATION)?;
        let get_system_service = bridge.find_method(
            application,
            "getSystemService",
            "(Ljava/lang/String;)Ljava/lang/Object;",
        )?;
        let service_field =
            bridge.find_static_field(application, "LOCATION_SERVICE", "Ljava/lang/String;")?;
        let service_name = bridge
            .get_static_field(application, service_field)?
            .object("Context.LOCATION_SERVICE")?;

        let object = bridge
            .call_method(context, get_system_service, &[Arg::Object(service_name)])?
            .object("Context.getSystemService")?;
        let class = resolve_class(bridge, LOCATION_MANAGER)?;

        Ok(Self { object, class })
    }

    /// `LocationManager.isLocationEnabled()`.
    ///
    /// # Errors
    /// Fails if the method cannot be resolved or called.
    pub fn is_location_enabled<B: HostBridge + ?Sized>(
        &self,
        bridge: &mut B,
    ) -> Result<bool, LocationError> {
        let method = bridge.find_method(self.class, "isLocationEnabled", "()Z")?;
        Ok(bridge.call_method(self.object, method, &[])?.bool()?)
    }

    /// Names of the first `count` entries of `getAllProviders()`.
    ///
    /// # Errors
    /// [`LocationError::TooFewProviders`] if the device lists fewer than
    /// `count` providers; no element is read in that case.
    pub fn leading_providers<B: HostBridge + ?Sized>(
        &self,
        bridge: &mut B,
        count: usize,
    ) -> Result<Vec<String>, LocationError> {
        let all_providers =
            bridge.find_method(self.class, "getAllProviders", "()Ljava/util/List;")?;
        let providers = bridge
            .call_method(self.object, all_providers, &[])?
            .object("LocationManager.getAllProviders")?;

        let list = resolve_class(bridge, LIST)?;
        let size = bridge.find_method(list, "size", "()I")?;
        let get = bridge.find_method(list, "get", "(I)Ljava/lang/Object;")?;

        let found = bridge.call_method(providers, size, &[])?.int()?;
        let found = usize::try_from(found).unwrap_or(0);
        if found < count {
            return Err(LocationError::TooFewProviders {
                expected: count,
                found,
            });
        }

        (0..count)
            .map(|index| -> Result<String, LocationError> {
                let index = i32::try_from(index).unwrap_or(i32::MAX);
                let name = bridge
                    .call_method(providers, get, &[Arg::Int(index)])?
                    .object("List.get")?;
                Ok(bridge.read_string(name)?)
            })
            .collect()
    }

    /// Last fix reported by `provider`.
    ///
    /// # Errors
    /// [`LocationError::NoLastKnownLocation`] if the provider has no fix.
    pub fn last_known_location<B: HostBridge + ?Sized>(
        &self,
        bridge: &mut B,
        provider: &str,
    ) -> Result<Location, LocationError> {
        let method = bridge.find_method(
            self.class,
            "getLastKnownLocation",
            "(Ljava/lang/String;)Landroid/location/Location;",
        )?;
        let provider_name = bridge.new_string(provider)?;
        let Some(fix) = bridge
            .call_method(self.object, method, &[Arg::Object(provider_name)])?
            .nullable_object()?
        else {
            return Err(LocationError::NoLastKnownLocation {
                provider: provider.to_owned(),
            });
        };

        let location = resolve_class(bridge, LOCATION)?;
        let get_latitude = bridge.find_method(location, "getLatitude", "()D")?;
        let get_longitude = bridge.find_method(location, "getLongitude", "()D")?;
        let latitude = bridge.call_method(fix, get_latitude, &[])?.double()?;
        let longitude = bridge.call_method(fix, get_longitude, &[])?.double()?;

        Ok(Location::new(latitude, longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::AndroidFixture;
    use crate::resolve_application_context;
    use seekkit_bridge::mock::{MockBridge, RecordedArg};
    use seekkit_bridge::BridgeError;

    fn obtain(bridge: &mut MockBridge) -> SystemLocationManager {
        let context = resolve_application_context(bridge).unwrap();
        SystemLocationManager::obtain(bridge, context).unwrap()
    }

    #[test]
    fn service_is_looked_up_by_location_service_constant() {
        let (mut bridge, _) = AndroidFixture::default().build();

        obtain(&mut bridge);

        let lookups: Vec<_> = bridge.calls_to("getSystemService").collect();
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0].args, vec![RecordedArg::Str("location".into())]);
    }

    #[test]
    fn null_service_is_an_error() {
        let (mut bridge, _) = AndroidFixture {
            service_available: false,
            ..AndroidFixture::default()
        }
        .build();
        let context = resolve_application_context(&mut bridge).unwrap();

        let err = SystemLocationManager::obtain(&mut bridge, context).unwrap_err();

        assert_eq!(
            err,
            LocationError::Bridge(BridgeError::NullObject {
                what: "Context.getSystemService".into()
            })
        );
    }

    #[test]
    fn enabled_state_is_reported() {
        for enabled in [true, false] {
            let (mut bridge, _) = AndroidFixture {
                enabled,
                ..AndroidFixture::default()
            }
            .build();
            let manager = obtain(&mut bridge);

            assert_eq!(manager.is_location_enabled(&mut bridge), Ok(enabled));
        }
    }

    #[test]
    fn leading_providers_reads_in_order() {
        let (mut bridge, _) = AndroidFixture {
            providers: vec!["passive", "gps", "network", "fused"],
            ..AndroidFixture::default()
        }
        .build();
        let manager = obtain(&mut bridge);

        let providers = manager.leading_providers(&mut bridge, 3).unwrap();

        assert_eq!(providers, ["passive", "gps", "network"]);
    }

    #[test]
    fn short_provider_list_is_not_indexed() {
        let (mut bridge, _) = AndroidFixture {
            providers: vec!["gps", "network"],
            ..AndroidFixture::default()
        }
        .build();
        let manager = obtain(&mut bridge);

        let err = manager.leading_providers(&mut bridge, 3).unwrap_err();

        assert_eq!(
            err,
            LocationError::TooFewProviders {
                expected: 3,
                found: 2
            }
        );
        assert_eq!(bridge.calls_to("get").count(), 0);
    }

    #[test]
    fn last_known_location_reads_both_coordinates() {
        let (mut bridge, _) = AndroidFixture {
            location: Some((48.8566, 2.3522)),
            ..AndroidFixture::default()
        }
        .build();
        let manager = obtain(&mut bridge);

        let location = manager.last_known_location(&mut bridge, "gps").unwrap();

        assert_eq!(location, Location::new(48.8566, 2.3522));
        let queries: Vec<_> = bridge.calls_to("getLastKnownLocation").collect();
        assert_eq!(queries[0].args, vec![RecordedArg::Str("gps".into())]);
    }

    #[test]
    fn missing_fix_is_reported_without_reading_coordinates() {
        let (mut bridge, _) = AndroidFixture {
            location: None,
            ..AndroidFixture::default()
        }
        .build();
        let manager = obtain(&mut bridge);

        let err = manager.last_known_location(&mut bridge, "fused").unwrap_err();

        assert_eq!(
            err,
            LocationError::NoLastKnownLocation {
                provider: "fused".into()
            }
        );
        assert_eq!(bridge.calls_to("getLatitude").count(), 0);
    }
}
