use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{openrouteservice::OpenRouteServiceProfile, travel_matrices::TravelMatrices};

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
pub enum TravelMatrixProvider {
    /// https://openrouteservice.org/dev/#/api-docs/v2/matrix
    OpenRouteService {
        #[serde(default)]
        profile: OpenRouteServiceProfile,
    },
    AsTheCrowFlies {
        speed_kmh: f64,
    },
    Custom {
        matrices: TravelMatrices,
    },
}

impl Default for TravelMatrixProvider {
    fn default() -> Self {
        TravelMatrixProvider::OpenRouteService {
            profile: OpenRouteServiceProfile::default(),
        }
    }
}

impl std::hash::Hash for TravelMatrixProvider {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            TravelMatrixProvider::OpenRouteService { profile } => {
                state.write_u8(0);
                profile.hash(state);
            }
            TravelMatrixProvider::AsTheCrowFlies { speed_kmh } => {
                state.write_u8(1);
                state.write_u64(speed_kmh.to_bits());
            }
            TravelMatrixProvider::Custom { matrices } => {
                state.write_u8(2);
                matrices.hash(state);
            }
        }
    }
}
