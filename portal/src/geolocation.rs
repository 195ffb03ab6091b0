use std::{future::Future, time::Duration};

use careconnect::Coordinates;

use crate::config::LocationSetting;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported on this device")]
    Unsupported,
    #[error("User denied Geolocation")]
    PermissionDenied,
    #[error("Position unavailable: {0}")]
    Unavailable(String),
    #[error("Timeout expired")]
    Timeout,
}

async fn lookup(setting: LocationSetting) -> Result<Coordinates, GeolocationError> {
    match setting {
        LocationSetting::Fixed(position) if position.lat.is_finite() && position.lon.is_finite() => Ok(position),
        LocationSetting::Fixed(position) => Err(GeolocationError::Unavailable(format!("{position:?}"))),
        LocationSetting::Denied => Err(GeolocationError::PermissionDenied),
        LocationSetting::Unsupported => Err(GeolocationError::Unsupported),
    }
}

/// Races a single position lookup against `timeout`. There is no retry.
pub async fn locate_within<F>(lookup: F, timeout: Duration) -> Result<Coordinates, GeolocationError>
where
    F: Future<Output = Result<Coordinates, GeolocationError>>,
{
    match tokio::time::timeout(timeout, lookup).await {
        Ok(result) => result,
        Err(_) => Err(GeolocationError::Timeout),
    }
}

pub async fn current_position(setting: &LocationSetting, timeout: Duration) -> Result<Coordinates, GeolocationError> {
    locate_within(lookup(setting.clone()), timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_fixed_position() {
        let here = Coordinates::new(34.0522, -118.2437);
        assert_eq!(current_position(&LocationSetting::Fixed(here), TIMEOUT).await, Ok(here));
    }

    #[tokio::test]
    async fn test_failures() {
        assert_eq!(current_position(&LocationSetting::Denied, TIMEOUT).await, Err(GeolocationError::PermissionDenied));
        assert_eq!(current_position(&LocationSetting::Unsupported, TIMEOUT).await, Err(GeolocationError::Unsupported));
        let nowhere = LocationSetting::Fixed(Coordinates::new(f64::NAN, 0.0));
        assert!(matches!(current_position(&nowhere, TIMEOUT).await, Err(GeolocationError::Unavailable(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_that_never_resolves_times_out() {
        let never = std::future::pending::<Result<Coordinates, GeolocationError>>();
        assert_eq!(locate_within(never, TIMEOUT).await, Err(GeolocationError::Timeout));
    }
}
