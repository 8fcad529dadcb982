use std::{fmt::Display, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    geocoder::{GeocodeError, Geocoder},
    travel_matrices::TravelMatrices,
};

/// `[lon, lat]`, the order OpenRouteService expects
pub type OrsPoint = [f64; 2];

pub const OPENROUTESERVICE_API_URL: &str = "https://api.openrouteservice.org";
pub const OPENROUTESERVICE_API_KEY_ENV_VAR: &str = "ORS_API_KEY";

#[derive(
    Deserialize, Serialize, JsonSchema, Copy, Clone, Debug, Default, Hash, PartialEq, Eq,
)]
#[serde(rename_all = "kebab-case")]
pub enum OpenRouteServiceProfile {
    #[default]
    FootWalking,
    CyclingRegular,
    DrivingCar,
}

impl Display for OpenRouteServiceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OpenRouteServiceProfile::FootWalking => "foot-walking",
                OpenRouteServiceProfile::CyclingRegular => "cycling-regular",
                OpenRouteServiceProfile::DrivingCar => "driving-car",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum OpenRouteServiceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {0} attempts")]
    RateLimited(u32),

    #[error("No route between location {from} and location {to}")]
    Unroutable { from: usize, to: usize },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
struct MatrixRequestBody {
    locations: Vec<OrsPoint>,
    metrics: Vec<&'static str>,
}

#[derive(Deserialize)]
struct MatrixResponse {
    /// Travel times in seconds, `null` when no route exists
    durations: Vec<Vec<Option<f64>>>,

    /// Distances in meters
    distances: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Deserialize)]
struct GeocodeFeature {
    geometry: GeocodeGeometry,
}

#[derive(Deserialize)]
struct GeocodeGeometry {
    coordinates: OrsPoint,
}

pub struct OpenRouteServiceParams {
    pub api_key: String,
    pub base_url: String,
    pub max_attempts: u32,
    pub retry_interval: Duration,
}

impl OpenRouteServiceParams {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: OPENROUTESERVICE_API_URL.to_string(),
            max_attempts: 5,
            retry_interval: Duration::from_millis(1500),
        }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(OPENROUTESERVICE_API_KEY_ENV_VAR)
            .ok()
            .filter(|key| !key.is_empty())
            .map(Self::new)
    }
}

pub struct OpenRouteServiceClient {
    params: OpenRouteServiceParams,
    client: reqwest::Client,
}

impl OpenRouteServiceClient {
    pub fn new(params: OpenRouteServiceParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_matrix<P>(
        &self,
        points: &[P],
        profile: OpenRouteServiceProfile,
    ) -> Result<TravelMatrices, OpenRouteServiceError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let locations: Vec<OrsPoint> = points
            .iter()
            .map(|p| {
                let point: geo_types::Point = p.into();
                [point.x(), point.y()]
            })
            .collect();

        let body = MatrixRequestBody {
            locations,
            metrics: vec!["duration", "distance"],
        };

        let url = format!("{}/v2/matrix/{}", self.params.base_url, profile);
        let response = self
            .send_with_retry(|| {
                self.client
                    .post(&url)
                    .header("Authorization", &self.params.api_key)
                    .json(&body)
            })
            .await?;

        let matrix: MatrixResponse = serde_json::from_str(&response)?;

        let times = flatten_matrix(matrix.durations)?;
        let distances = matrix.distances.map(flatten_matrix).transpose()?;

        Ok(TravelMatrices { times, distances })
    }

    pub async fn geocode(
        &self,
        address: &str,
        country_code: &str,
        focus: Option<geo_types::Point>,
    ) -> Result<Option<geo_types::Point>, OpenRouteServiceError> {
        let mut query: Vec<(&str, String)> = vec![
            ("api_key", self.params.api_key.clone()),
            ("text", address.to_string()),
            ("boundary.country", country_code.to_string()),
            ("size", "1".to_string()),
        ];

        if let Some(focus) = focus {
            query.push(("focus.point.lon", focus.x().to_string()));
            query.push(("focus.point.lat", focus.y().to_string()));
        }

        let url = format!("{}/geocode/search", self.params.base_url);
        let response = self
            .send_with_retry(|| self.client.get(&url).query(&query))
            .await?;

        let result: GeocodeResponse = serde_json::from_str(&response)?;

        Ok(result.features.first().map(|feature| {
            let [lon, lat] = feature.geometry.coordinates;
            geo_types::Point::new(lon, lat)
        }))
    }

    /// The free tier answers bursts with 429, so those are retried after a pause.
    async fn send_with_retry<F>(&self, request: F) -> Result<String, OpenRouteServiceError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        for attempt in 1..=self.params.max_attempts {
            let response = request().send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                warn!(
                    "OpenRouteService: rate limited, attempt {}/{}",
                    attempt, self.params.max_attempts
                );
                tokio::time::sleep(self.params.retry_interval).await;
                continue;
            }

            let text = response.text().await?;

            if !status.is_success() {
                return Err(OpenRouteServiceError::Api {
                    status: status.as_u16(),
                    message: error_message(&text),
                });
            }

            debug!("OpenRouteService: {} bytes received", text.len());
            return Ok(text);
        }

        Err(OpenRouteServiceError::RateLimited(self.params.max_attempts))
    }
}

impl Geocoder for OpenRouteServiceClient {
    async fn resolve(
        &self,
        address: &str,
        country_code: &str,
        focus: Option<geo_types::Point>,
    ) -> Result<geo_types::Point, GeocodeError> {
        match self.geocode(address, country_code, focus).await {
            Ok(Some(point)) => Ok(point),
            Ok(None) => Err(GeocodeError::NotFound(address.to_string())),
            Err(err) => Err(GeocodeError::Provider(err.to_string())),
        }
    }
}

fn flatten_matrix(rows: Vec<Vec<Option<f64>>>) -> Result<Vec<f64>, OpenRouteServiceError> {
    let mut flat = Vec::with_capacity(rows.len() * rows.len());
    for (from, row) in rows.into_iter().enumerate() {
        for (to, value) in row.into_iter().enumerate() {
            match value {
                Some(value) => flat.push(value),
                None => return Err(OpenRouteServiceError::Unroutable { from, to }),
            }
        }
    }
    Ok(flat)
}

/// ORS reports errors either as `{"error": "..."}` or
/// `{"error": {"code": .., "message": ".."}}`.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    match value.get("error") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(error) => error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_display_matches_serde() {
        let json = serde_json::to_string(&OpenRouteServiceProfile::CyclingRegular).unwrap();

        assert_eq!(json, "\"cycling-regular\"");
        assert_eq!(
            OpenRouteServiceProfile::CyclingRegular.to_string(),
            "cycling-regular"
        );
        assert_eq!(OpenRouteServiceProfile::default().to_string(), "foot-walking");
    }

    #[test]
    fn test_flatten_matrix() {
        let flat =
            flatten_matrix(vec![vec![Some(0.0), Some(5.0)], vec![Some(6.0), Some(0.0)]]).unwrap();

        assert_eq!(flat, vec![0.0, 5.0, 6.0, 0.0]);
    }

    #[test]
    fn test_flatten_matrix_unroutable() {
        let result = flatten_matrix(vec![vec![Some(0.0), None], vec![Some(6.0), Some(0.0)]]);

        assert!(matches!(
            result,
            Err(OpenRouteServiceError::Unroutable { from: 0, to: 1 })
        ));
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error": "Access to this API has been disallowed"}"#),
            "Access to this API has been disallowed"
        );
        assert_eq!(
            error_message(r#"{"error": {"code": 2010, "message": "Could not find point"}}"#),
            "Could not find point"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_geocode_response_parsing() {
        let body = r#"{"features":[{"geometry":{"type":"Point","coordinates":[8.5324,52.0211]}}]}"#;
        let response: GeocodeResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.features[0].geometry.coordinates, [8.5324, 52.0211]);

        let empty: GeocodeResponse = serde_json::from_str(r#"{"features":[]}"#).unwrap();
        assert!(empty.features.is_empty());
    }
}
