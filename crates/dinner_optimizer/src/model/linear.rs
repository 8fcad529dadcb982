use serde::Serialize;

use super::{constraints::ConstraintFamily, variables::VariableIdx};

/// Sum of `coefficient * variable` terms, without a constant part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpression {
    terms: Vec<(VariableIdx, f64)>,
}

impl LinearExpression {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    pub fn add_term(&mut self, variable: VariableIdx, coefficient: f64) -> &mut Self {
        self.terms.push((variable, coefficient));
        self
    }

    pub fn term(mut self, variable: VariableIdx, coefficient: f64) -> Self {
        self.terms.push((variable, coefficient));
        self
    }

    pub fn terms(&self) -> &[(VariableIdx, f64)] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Combined coefficient of `variable`, zero when it does not appear.
    pub fn coefficient(&self, variable: VariableIdx) -> f64 {
        self.terms
            .iter()
            .filter(|(term, _)| *term == variable)
            .map(|(_, coefficient)| coefficient)
            .sum()
    }

    /// `values` is indexed by variable index.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(variable, coefficient)| coefficient * values[variable.get()])
            .sum()
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintSense {
    Eq,
    Leq,
    Geq,
}

impl std::fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintSense::Eq => write!(f, "="),
            ConstraintSense::Leq => write!(f, "<="),
            ConstraintSense::Geq => write!(f, ">="),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    family: ConstraintFamily,
    lhs: LinearExpression,
    sense: ConstraintSense,
    rhs: f64,
}

impl LinearConstraint {
    pub fn new(
        family: ConstraintFamily,
        lhs: LinearExpression,
        sense: ConstraintSense,
        rhs: f64,
    ) -> Self {
        Self {
            family,
            lhs,
            sense,
            rhs,
        }
    }

    pub fn family(&self) -> ConstraintFamily {
        self.family
    }

    pub fn lhs(&self) -> &LinearExpression {
        &self.lhs
    }

    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs.evaluate(values);

        match self.sense {
            ConstraintSense::Eq => (lhs - self.rhs).abs() <= tolerance,
            ConstraintSense::Leq => lhs <= self.rhs + tolerance,
            ConstraintSense::Geq => lhs >= self.rhs - tolerance,
        }
    }
}
