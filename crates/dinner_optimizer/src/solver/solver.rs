use good_lp::{ResolutionError, SolutionStatus};
use jiff::{SignedDuration, Timestamp};
use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    model::dinner_model::DinnerModel,
    problem::{dinner_instance::DinnerInstance, error::ConfigurationError},
};

use super::{
    backend::SolverBackend,
    extractor::{DinnerSchedule, SolutionExtractor},
    solver_params::SolverParams,
};

#[derive(Copy, Clone, Debug, Serialize, JsonSchema, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    /// The backend stopped on its time or gap limit with a schedule that is
    /// not proven optimal
    Feasible,
    Infeasible,
    Unbounded,
    /// The backend stopped without a solution, e.g. on its time limit
    NotSolved,
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Solver backend {backend} failed: {message}")]
    Backend {
        backend: SolverBackend,
        message: String,
    },
}

#[derive(Serialize, Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub backend: SolverBackend,
    pub duration: SignedDuration,
    /// Message of a backend that stopped without a solution
    pub message: Option<String>,
    /// Present when the status is [`SolveStatus::Optimal`] or [`SolveStatus::Feasible`]
    pub schedule: Option<DinnerSchedule>,
}

impl From<SolutionStatus> for SolveStatus {
    fn from(status: SolutionStatus) -> Self {
        match status {
            SolutionStatus::Optimal => SolveStatus::Optimal,
            SolutionStatus::TimeLimit | SolutionStatus::GapLimit => SolveStatus::Feasible,
        }
    }
}

pub struct DinnerSolver<'a> {
    instance: &'a DinnerInstance,
    params: SolverParams,
}

impl<'a> DinnerSolver<'a> {
    pub fn new(instance: &'a DinnerInstance, params: SolverParams) -> Self {
        DinnerSolver { instance, params }
    }

    /// Builds a fresh model, runs it through the selected backend and decodes
    /// the result. Infeasible and unbounded models are reported in the status.
    #[instrument(skip_all, level = "debug")]
    pub fn solve(&self) -> Result<SolveOutcome, SolveError> {
        let model = DinnerModel::build(self.instance, self.params.penalties)?;
        let backend = SolverBackend::select(self.params.preferred_backend.as_deref());

        info!(
            backend = backend.name(),
            variables = model.variables().len(),
            constraints = model.constraints().len(),
            "Solving"
        );

        let start = Timestamp::now();
        let result = backend.run(&model, self.params.time_limit);
        let duration = Timestamp::now().duration_since(start);

        let (status, message, schedule) = match result {
            Ok(solution) => {
                if !matches!(solution.status, SolutionStatus::Optimal) {
                    warn!(
                        backend = backend.name(),
                        status = ?solution.status,
                        "Backend stopped on a limit, the schedule may not be optimal"
                    );
                }
                let schedule =
                    SolutionExtractor::new(self.instance, &model).extract(&solution.values);
                (solution.status.into(), None, Some(schedule))
            }
            Err(ResolutionError::Infeasible) => (SolveStatus::Infeasible, None, None),
            Err(ResolutionError::Unbounded) => (SolveStatus::Unbounded, None, None),
            Err(ResolutionError::Other(message)) => {
                (SolveStatus::NotSolved, Some(message.to_owned()), None)
            }
            Err(ResolutionError::Str(message)) => {
                return Err(SolveError::Backend { backend, message });
            }
        };

        match &schedule {
            Some(schedule) => info!(
                backend = backend.name(),
                objective = schedule.objective,
                elapsed = %duration,
                "Solved"
            ),
            None => warn!(
                backend = backend.name(),
                ?status,
                message = message.as_deref().unwrap_or_default(),
                elapsed = %duration,
                "No schedule found"
            ),
        }

        Ok(SolveOutcome {
            status,
            backend,
            duration,
            message,
            schedule,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::{model::objective::PenaltyWeights, test_utils};

    use super::*;

    fn params(penalties: PenaltyWeights) -> SolverParams {
        SolverParams {
            penalties,
            preferred_backend: Some("microlp".to_owned()),
            time_limit: None,
        }
    }

    #[test]
    fn test_invalid_penalty_is_a_configuration_error() {
        let instance = test_utils::uniform_instance(
            &["home", "starter", "main", "party"],
            &[1, 1, 2, 2],
            600.0,
        );
        let penalties = PenaltyWeights {
            too_few: f64::NAN,
            ..Default::default()
        };

        let result = DinnerSolver::new(&instance, params(penalties)).solve();

        assert!(matches!(
            result,
            Err(SolveError::Configuration(
                ConfigurationError::InvalidPenalty { name: "too_few", .. }
            ))
        ));
    }

    #[rstest]
    #[case(SolutionStatus::Optimal, SolveStatus::Optimal)]
    #[case(SolutionStatus::TimeLimit, SolveStatus::Feasible)]
    #[case(SolutionStatus::GapLimit, SolveStatus::Feasible)]
    fn test_backend_status_mapping(#[case] status: SolutionStatus, #[case] expected: SolveStatus) {
        assert_eq!(SolveStatus::from(status), expected);
    }

    #[test]
    fn test_microlp_honours_time_limit() {
        let instance = test_utils::uniform_instance(
            &["home", "starter", "main", "party"],
            &[1, 1, 2, 2],
            600.0,
        );
        let params = SolverParams {
            time_limit: Some(SignedDuration::from_secs(60)),
            ..params(PenaltyWeights::default())
        };

        let outcome = DinnerSolver::new(&instance, params).solve().unwrap();

        assert_eq!(outcome.backend, SolverBackend::Microlp);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert!(outcome.schedule.is_some());
    }
}
