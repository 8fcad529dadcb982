use std::{fs::File, io::BufReader, path::Path};

use dinner_matrix_providers::{
    cache::FileCache, geocoder::NoGeocoder, travel_matrix_client::TravelMatrixClient,
};
use dinner_optimizer::{json::types::JsonDinnerInstance, problem::dinner_instance::DinnerInstance};
use tracing::info;

/// Reads a JSON instance, geocodes its addresses and fetches its travel times.
/// Geocoding needs OpenRouteService, inputs with only coordinates do not.
pub async fn load_instance(path: &Path) -> anyhow::Result<DinnerInstance> {
    info!("Loading {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    let input: JsonDinnerInstance = serde_json::from_reader(reader)?;

    let client = TravelMatrixClient::<FileCache>::default();

    let instance = match client.openrouteservice() {
        Some(openrouteservice) => input.build_instance(openrouteservice, &client).await?,
        None => input.build_instance(&NoGeocoder, &client).await?,
    };

    Ok(instance)
}
