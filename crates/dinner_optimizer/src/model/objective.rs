use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::problem::{
    error::ConfigurationError,
    group::{GroupIdx, GroupPair},
};

use super::{linear::LinearExpression, variables::DinnerVariables};

/// Ten minutes of travel per penalty unit.
pub const DEFAULT_PENALTY: f64 = 600.0;

/// Weights of the soft rules, in seconds of travel time.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PenaltyWeights {
    /// Per host with one guest less than the target table size
    pub too_few: f64,
    /// Per host with one guest more than the target table size
    pub too_many: f64,
    /// Per encounter of two groups beyond their first
    pub repeat_meeting: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            too_few: DEFAULT_PENALTY,
            too_many: DEFAULT_PENALTY,
            repeat_meeting: DEFAULT_PENALTY,
        }
    }
}

impl PenaltyWeights {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("too_few", self.too_few),
            ("too_many", self.too_many),
            ("repeat_meeting", self.repeat_meeting),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidPenalty { name, value });
            }
        }

        Ok(())
    }
}

/// `sum(t) + too_few * sum(z1) + too_many * sum(z2) + repeat_meeting * sum(z3)`
///
/// Zero weights still produce their terms, the variables stay in the model.
pub fn assemble_objective(
    variables: &DinnerVariables,
    penalties: &PenaltyWeights,
) -> LinearExpression {
    let num_groups = variables.num_groups();
    let mut objective = LinearExpression::with_capacity(
        variables.num_legs() + 2 * num_groups + variables.num_pairs(),
    );

    for leg in variables.legs() {
        objective.add_term(leg, 1.0);
    }

    for host in (0..num_groups).map(GroupIdx::new) {
        objective
            .add_term(variables.z1(host), penalties.too_few)
            .add_term(variables.z2(host), penalties.too_many);
    }

    for pair in GroupPair::all(num_groups) {
        objective.add_term(variables.z3(pair), penalties.repeat_meeting);
    }

    objective
}
