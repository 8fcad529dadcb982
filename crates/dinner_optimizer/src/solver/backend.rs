use std::str::FromStr;

use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus,
    SolverModel, Variable, WithTimeLimit, variable,
};
use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::{
    dinner_model::DinnerModel,
    linear::{ConstraintSense, LinearConstraint, LinearExpression},
    variables::VariableKind,
};

/// MILP backends this crate can link through `good_lp`. Everything except
/// [`SolverBackend::Microlp`] sits behind a cargo feature of the same name.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    Cplex,
    Highs,
    CoinCbc,
    Scip,
    Microlp,
}

/// Preferred order when the requested backend is unknown or not compiled in.
/// Ends with the pure Rust backend, which is always present.
pub const FALLBACK_ORDER: [SolverBackend; 5] = [
    SolverBackend::Cplex,
    SolverBackend::Highs,
    SolverBackend::CoinCbc,
    SolverBackend::Scip,
    SolverBackend::Microlp,
];

/// Variable values of a finished run. `status` tells whether the backend
/// proved optimality or stopped early on one of its limits.
#[derive(Debug)]
pub struct BackendSolution {
    pub status: SolutionStatus,
    pub values: Vec<f64>,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown solver backend \"{0}\"")]
pub struct UnknownBackendError(String);

impl SolverBackend {
    pub fn name(&self) -> &'static str {
        match self {
            SolverBackend::Cplex => "cplex",
            SolverBackend::Highs => "highs",
            SolverBackend::CoinCbc => "coin_cbc",
            SolverBackend::Scip => "scip",
            SolverBackend::Microlp => "microlp",
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            SolverBackend::Cplex => cfg!(feature = "cplex"),
            SolverBackend::Highs => cfg!(feature = "highs"),
            SolverBackend::CoinCbc => cfg!(feature = "coin_cbc"),
            SolverBackend::Scip => cfg!(feature = "scip"),
            SolverBackend::Microlp => true,
        }
    }

    /// First available backend in [`FALLBACK_ORDER`].
    pub fn best_available() -> SolverBackend {
        FALLBACK_ORDER
            .into_iter()
            .find(SolverBackend::is_available)
            .unwrap_or(SolverBackend::Microlp)
    }

    /// The requested backend when it parses and is compiled in, otherwise the
    /// best available one.
    pub fn select(requested: Option<&str>) -> SolverBackend {
        let Some(requested) = requested else {
            return Self::best_available();
        };

        match requested.parse::<SolverBackend>() {
            Ok(backend) if backend.is_available() => backend,
            Ok(backend) => {
                let fallback = Self::best_available();
                warn!(
                    requested = backend.name(),
                    fallback = fallback.name(),
                    "Solver backend is not compiled in, falling back"
                );
                fallback
            }
            Err(error) => {
                let fallback = Self::best_available();
                warn!(fallback = fallback.name(), "{error}, falling back");
                fallback
            }
        }
    }

    /// Solves `model` and returns the value of every variable, indexed by
    /// variable index, along with how the backend terminated.
    #[allow(unreachable_patterns)]
    pub fn run(
        &self,
        model: &DinnerModel,
        time_limit: Option<SignedDuration>,
    ) -> Result<BackendSolution, ResolutionError> {
        let (problem_variables, variables) = declare_variables(model);
        let objective = to_expression(model.objective(), &variables);
        let constraints = model
            .constraints()
            .iter()
            .map(|constraint| to_constraint(constraint, &variables))
            .collect::<Vec<_>>();

        let unsolved = problem_variables.minimise(objective);
        let time_limit = time_limit.map(|limit| limit.as_secs_f64());

        match self {
            #[cfg(feature = "cplex")]
            SolverBackend::Cplex => solve_model(
                unsolved.using(good_lp::solvers::cplex::cplex),
                constraints,
                &variables,
                time_limit,
            ),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => {
                let mut problem = unsolved.using(good_lp::solvers::highs::highs);
                problem.set_verbose(false);
                solve_model(problem, constraints, &variables, time_limit)
            }
            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => {
                let mut problem = unsolved.using(good_lp::solvers::coin_cbc::coin_cbc);
                problem.set_parameter("log", "0");
                solve_model(problem, constraints, &variables, time_limit)
            }
            #[cfg(feature = "scip")]
            SolverBackend::Scip => solve_model(
                unsolved.using(good_lp::solvers::scip::scip),
                constraints,
                &variables,
                time_limit,
            ),
            SolverBackend::Microlp => solve_model(
                unsolved.using(good_lp::solvers::microlp::microlp),
                constraints,
                &variables,
                time_limit,
            ),
            backend => Err(ResolutionError::Str(format!(
                "Solver backend {backend} is not compiled in"
            ))),
        }
    }
}

impl std::fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SolverBackend {
    type Err = UnknownBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cplex" => Ok(SolverBackend::Cplex),
            "highs" => Ok(SolverBackend::Highs),
            "coin_cbc" | "cbc" | "coincbc" => Ok(SolverBackend::CoinCbc),
            "scip" => Ok(SolverBackend::Scip),
            "microlp" => Ok(SolverBackend::Microlp),
            _ => Err(UnknownBackendError(s.to_owned())),
        }
    }
}

fn declare_variables(model: &DinnerModel) -> (ProblemVariables, Vec<Variable>) {
    let mut problem_variables = ProblemVariables::new();

    let variables = model
        .variables()
        .definitions()
        .iter()
        .map(|definition| {
            let declared = match definition.kind() {
                VariableKind::Binary => variable().binary(),
                VariableKind::Integer => variable().integer().min(0.0),
                VariableKind::Continuous => variable().min(0.0),
            };
            problem_variables.add(declared.name(definition.name()))
        })
        .collect();

    (problem_variables, variables)
}

fn to_expression(expression: &LinearExpression, variables: &[Variable]) -> Expression {
    let mut converted = Expression::with_capacity(expression.len());
    for &(variable, coefficient) in expression.terms() {
        converted.add_mul(coefficient, variables[variable.get()]);
    }
    converted
}

fn to_constraint(constraint: &LinearConstraint, variables: &[Variable]) -> Constraint {
    let lhs = to_expression(constraint.lhs(), variables);

    match constraint.sense() {
        ConstraintSense::Eq => lhs.eq(constraint.rhs()),
        ConstraintSense::Leq => lhs.leq(constraint.rhs()),
        ConstraintSense::Geq => lhs.geq(constraint.rhs()),
    }
}

fn solve_model<M>(
    problem: M,
    constraints: Vec<Constraint>,
    variables: &[Variable],
    time_limit: Option<f64>,
) -> Result<BackendSolution, ResolutionError>
where
    M: SolverModel<Error = ResolutionError> + WithTimeLimit,
{
    let mut problem = match time_limit {
        Some(seconds) => problem.with_time_limit(seconds),
        None => problem,
    };

    for constraint in constraints {
        problem.add_constraint(constraint);
    }

    let solution = problem.solve()?;

    Ok(BackendSolution {
        status: solution.status(),
        values: variables
            .iter()
            .map(|&variable| solution.value(variable))
            .collect(),
    })
}
