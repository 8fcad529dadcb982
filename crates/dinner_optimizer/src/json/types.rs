use dinner_matrix_providers::{
    cache::MatricesCache, geocoder::Geocoder, travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::problem::{
    dinner_instance::{DinnerInstance, DinnerInstanceBuilder},
    location::Location,
    travel_time_matrix::TravelTimeMatrix,
};

#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "DinnerInstance")]
pub struct JsonDinnerInstance {
    /// ISO 3166-1 alpha-2 code, restricts geocoding to this country
    pub country_code: String,
    /// Geocoded once as the focus point and prefixed to every address
    pub city: Option<String>,
    /// Start, hosted rounds, end, e.g. `["home", "starter", "main", "dessert", "party"]`
    pub events: Vec<String>,
    pub groups: Vec<JsonGroup>,
    pub after_party: Option<JsonLocation>,
    pub travel_matrix_provider: Option<TravelMatrixProvider>,
    /// Merge locations closer than this many degrees
    pub location_tolerance: Option<f64>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Group")]
pub struct JsonGroup {
    pub name: String,
    pub location: JsonLocation,
    /// Index into `events` of the round this group hosts
    pub host_event: usize,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
#[serde(untagged, rename = "Location")]
pub enum JsonLocation {
    Address { address: String },
    /// `[longitude, latitude]`
    Coordinates { coordinates: [f64; 2] },
}

impl JsonDinnerInstance {
    #[instrument(skip_all, level = "debug")]
    pub async fn build_instance(
        self,
        geocoder: &impl Geocoder,
        client: &TravelMatrixClient<impl MatricesCache>,
    ) -> Result<DinnerInstance, anyhow::Error> {
        let focus = match &self.city {
            Some(city) => Some(geocoder.resolve(city, &self.country_code, None).await?),
            None => None,
        };

        let resolver = LocationResolver {
            geocoder,
            country_code: &self.country_code,
            city: self.city.as_deref(),
            focus,
        };

        let locations = futures::future::try_join_all(
            self.groups
                .iter()
                .map(|group| resolver.resolve(&group.location)),
        )
        .await?;

        let mut builder = match self.location_tolerance {
            Some(tolerance) => DinnerInstanceBuilder::with_location_tolerance(tolerance),
            None => DinnerInstanceBuilder::new(),
        };

        builder.set_events(self.events);

        for (group, location) in self.groups.into_iter().zip(locations) {
            builder.add_group(group.name, location, group.host_event);
        }

        if let Some(after_party) = &self.after_party {
            builder.set_after_party(resolver.resolve(after_party).await?);
        }

        debug!(locations = builder.locations().len(), "Resolved locations");

        let matrices = client
            .fetch_matrix(
                builder.locations(),
                self.travel_matrix_provider.unwrap_or_default(),
            )
            .await?;

        builder.set_travel_times(TravelTimeMatrix::from_travel_matrices(matrices)?);

        Ok(builder.build()?)
    }
}

struct LocationResolver<'a, G> {
    geocoder: &'a G,
    country_code: &'a str,
    city: Option<&'a str>,
    focus: Option<geo::Point>,
}

impl<G> LocationResolver<'_, G>
where
    G: Geocoder,
{
    async fn resolve(&self, location: &JsonLocation) -> Result<Location, anyhow::Error> {
        match location {
            JsonLocation::Coordinates { coordinates } => {
                Ok(Location::from_lat_lon(coordinates[1], coordinates[0]))
            }
            JsonLocation::Address { address } => {
                let address = match self.city {
                    Some(city) => format!("{city}, {address}"),
                    None => address.clone(),
                };

                let point = self
                    .geocoder
                    .resolve(&address, self.country_code, self.focus)
                    .await?;

                Ok(Location::from(point))
            }
        }
    }
}
