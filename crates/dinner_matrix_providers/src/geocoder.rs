use std::future::Future;

use fxhash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("No location found for address \"{0}\"")]
    NotFound(String),

    #[error("Geocoding provider error: {0}")]
    Provider(String),
}

/// Resolves a free-text address to a point (`x` = longitude, `y` = latitude).
pub trait Geocoder {
    fn resolve(
        &self,
        address: &str,
        country_code: &str,
        focus: Option<geo_types::Point>,
    ) -> impl Future<Output = Result<geo_types::Point, GeocodeError>> + Send;
}

/// Refuses every address, for inputs that only carry coordinates.
pub struct NoGeocoder;

impl Geocoder for NoGeocoder {
    async fn resolve(
        &self,
        address: &str,
        _country_code: &str,
        _focus: Option<geo_types::Point>,
    ) -> Result<geo_types::Point, GeocodeError> {
        Err(GeocodeError::Provider(format!(
            "No geocoder configured to resolve \"{address}\", set ORS_API_KEY"
        )))
    }
}

/// Answers from a fixed address book, for offline runs and tests.
#[derive(Default)]
pub struct FixedGeocoder {
    points: FxHashMap<String, geo_types::Point>,
}

impl FixedGeocoder {
    pub fn insert(&mut self, address: impl Into<String>, lon: f64, lat: f64) -> &mut Self {
        self.points
            .insert(address.into(), geo_types::Point::new(lon, lat));
        self
    }
}

impl Geocoder for FixedGeocoder {
    async fn resolve(
        &self,
        address: &str,
        _country_code: &str,
        _focus: Option<geo_types::Point>,
    ) -> Result<geo_types::Point, GeocodeError> {
        self.points
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))
    }
}
