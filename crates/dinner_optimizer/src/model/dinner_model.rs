use tracing::{debug, instrument};

use crate::problem::{dinner_instance::DinnerInstance, error::ConfigurationError};

use super::{
    constraints::ConstraintGenerator,
    linear::{LinearConstraint, LinearExpression},
    objective::{PenaltyWeights, assemble_objective},
    variables::DinnerVariables,
};

/// The complete mixed-integer program for one instance, independent of the
/// backend that will solve it.
#[derive(Debug, Clone)]
pub struct DinnerModel {
    variables: DinnerVariables,
    constraints: Vec<LinearConstraint>,
    objective: LinearExpression,
    penalties: PenaltyWeights,
}

impl DinnerModel {
    #[instrument(
        skip_all,
        level = "debug",
        fields(groups = instance.num_groups(), events = instance.events().len())
    )]
    pub fn build(
        instance: &DinnerInstance,
        penalties: PenaltyWeights,
    ) -> Result<Self, ConfigurationError> {
        penalties.validate()?;

        let variables = DinnerVariables::declare(instance);
        let constraints = ConstraintGenerator::new(instance, &variables).generate();
        let objective = assemble_objective(&variables, &penalties);

        debug!(
            variables = variables.len(),
            constraints = constraints.len(),
            "Built model"
        );

        Ok(Self {
            variables,
            constraints,
            objective,
            penalties,
        })
    }

    pub fn variables(&self) -> &DinnerVariables {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpression {
        &self.objective
    }

    pub fn penalties(&self) -> &PenaltyWeights {
        &self.penalties
    }

    /// Constraints not met by `values` (indexed by variable index).
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|constraint| !constraint.is_satisfied(values, tolerance))
            .collect()
    }
}
