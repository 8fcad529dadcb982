use tracing::{debug, info};

use crate::{
    as_the_crow_flies::as_the_crow_flies_matrices,
    cache::{FileCache, MatricesCache},
    openrouteservice::{OpenRouteServiceClient, OpenRouteServiceParams},
    travel_matrices::TravelMatrices,
    travel_matrix_provider::TravelMatrixProvider,
};

pub struct TravelMatrixClient<C> {
    openrouteservice_client: Option<OpenRouteServiceClient>,
    cache: C,
}

impl Default for TravelMatrixClient<FileCache> {
    fn default() -> Self {
        Self::new(FileCache::from_env())
    }
}

impl<C> TravelMatrixClient<C>
where
    C: MatricesCache,
{
    /// Picks up the OpenRouteService key from the environment when present.
    pub fn new(cache: C) -> Self {
        Self {
            openrouteservice_client: OpenRouteServiceParams::from_env()
                .map(OpenRouteServiceClient::new),
            cache,
        }
    }

    pub fn with_openrouteservice(mut self, client: OpenRouteServiceClient) -> Self {
        self.openrouteservice_client = Some(client);
        self
    }

    pub fn openrouteservice(&self) -> Option<&OpenRouteServiceClient> {
        self.openrouteservice_client.as_ref()
    }

    pub async fn fetch_matrix<P>(
        &self,
        points: &[P],
        provider: TravelMatrixProvider,
    ) -> anyhow::Result<TravelMatrices>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        match &provider {
            TravelMatrixProvider::OpenRouteService { profile } => {
                if let Some(matrices) = self.cache.get_cached(&provider, points)? {
                    debug!("Travel matrices cache hit for {} points", points.len());
                    return Ok(matrices);
                }

                let client = self.openrouteservice_client.as_ref().ok_or_else(|| {
                    anyhow::anyhow!("OpenRouteService is not configured, set ORS_API_KEY")
                })?;

                info!(
                    "Fetching {}x{} {} matrix from OpenRouteService",
                    points.len(),
                    points.len(),
                    profile
                );
                let matrices = client.fetch_matrix(points, *profile).await?;
                self.cache.cache(&provider, points, &matrices)?;

                Ok(matrices)
            }
            TravelMatrixProvider::AsTheCrowFlies { speed_kmh } => {
                Ok(as_the_crow_flies_matrices(points, *speed_kmh))
            }
            TravelMatrixProvider::Custom { matrices } => Ok(matrices.clone()),
        }
    }
}
