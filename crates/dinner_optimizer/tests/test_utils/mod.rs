#![allow(dead_code)]

use dinner_optimizer::{
    model::objective::PenaltyWeights,
    problem::{
        dinner_instance::{DinnerInstance, DinnerInstanceBuilder},
        location::Location,
        travel_time_matrix::TravelTimeMatrix,
    },
    solver::{
        solver::{DinnerSolver, SolveOutcome},
        solver_params::SolverParams,
    },
};

pub const EPSILON: f64 = 1e-6;

pub fn location(i: usize) -> Location {
    Location::from_lat_lon(52.0 + i as f64 * 0.003, 8.5 + (i % 3) as f64 * 0.004)
}

pub fn builder(events: &[&str], host_rounds: &[usize]) -> DinnerInstanceBuilder {
    let mut builder = DinnerInstanceBuilder::new();
    builder.set_events(events.iter().copied());
    for (i, &round) in host_rounds.iter().enumerate() {
        builder.add_group(format!("G{i}"), location(i), round);
    }
    builder
}

/// Same travel time between every pair of distinct group locations.
pub fn uniform_instance(events: &[&str], host_rounds: &[usize], time: f64) -> DinnerInstance {
    let mut builder = builder(events, host_rounds);
    let num_locations = builder.locations().len();
    builder.set_travel_times(TravelTimeMatrix::from_constant(num_locations, time));
    builder.build().unwrap()
}

pub fn penalties(too_few: f64, too_many: f64, repeat_meeting: f64) -> PenaltyWeights {
    PenaltyWeights {
        too_few,
        too_many,
        repeat_meeting,
    }
}

pub fn solve(instance: &DinnerInstance, penalties: PenaltyWeights) -> SolveOutcome {
    let params = SolverParams {
        penalties,
        preferred_backend: Some("microlp".to_owned()),
        time_limit: None,
    };

    DinnerSolver::new(instance, params).solve().unwrap()
}
