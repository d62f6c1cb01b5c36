//! Geographic coordinate pairs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in [-90, 90].
    pub latitude: f64,

    /// Longitude in [-180, 180].
    pub longitude: f64,
}

impl Coordinates {
    /// Build a validated coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let coords = Coordinates::new(12.34, 56.78).unwrap();
        assert_eq!(coords.latitude, 12.34);
        assert_eq!(coords.longitude, 56.78);
    }

    #[test]
    fn test_boundary_values_accepted() {
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_latitude_out_of_range() {
        let err = Coordinates::new(90.5, 0.0).unwrap_err();
        assert!(err.to_string().contains("latitude"));
        assert!(Coordinates::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn test_longitude_out_of_range() {
        let err = Coordinates::new(0.0, 180.1).unwrap_err();
        assert!(err.to_string().contains("longitude"));
        assert!(Coordinates::new(0.0, -200.0).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::NAN).is_err());
    }
}
