use jiff::SignedDuration;

use crate::model::objective::PenaltyWeights;

#[derive(Clone, Debug, Default)]
pub struct SolverParams {
    pub penalties: PenaltyWeights,
    /// Backend name, see [`super::backend::SolverBackend`]. Unknown or
    /// unavailable names fall back to the best available backend.
    pub preferred_backend: Option<String>,
    /// Forwarded to backends that support it.
    pub time_limit: Option<SignedDuration>,
}
