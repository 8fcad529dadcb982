use crate::{
    define_index_newtype,
    problem::{
        dinner_instance::DinnerInstance,
        group::{GroupIdx, GroupPair},
    },
};

define_index_newtype!(VariableIdx, VariableDefinition);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Binary,
    /// Integer, bounded below by zero
    Integer,
    /// Continuous, bounded below by zero
    Continuous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    name: String,
    kind: VariableKind,
}

impl VariableDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }
}

/// All decision variables of one model, laid out as consecutive blocks:
///
/// | block | count           | meaning                                   |
/// |-------|-----------------|-------------------------------------------|
/// | `x`   | `N * N`         | group `g` eats at the table of host `h`   |
/// | `t`   | `E - 1`         | longest travel time of leg `e`            |
/// | `y`   | `P * N`         | pair `p` meets at host `h`                |
/// | `z1`  | `N`             | host `h` has one guest too few            |
/// | `z2`  | `N`             | host `h` has one guest too many           |
/// | `z3`  | `P`             | extra encounters of pair `p`              |
///
/// with `N` groups, `E` events and `P = N (N - 1) / 2` pairs.
#[derive(Debug, Clone)]
pub struct DinnerVariables {
    definitions: Vec<VariableDefinition>,
    num_groups: usize,
    num_pairs: usize,
    num_legs: usize,
    t_offset: usize,
    y_offset: usize,
    z1_offset: usize,
    z2_offset: usize,
    z3_offset: usize,
}

impl DinnerVariables {
    pub fn declare(instance: &DinnerInstance) -> Self {
        let num_groups = instance.num_groups();
        let num_pairs = instance.num_pairs();
        let num_legs = instance.events().num_legs();

        let t_offset = num_groups * num_groups;
        let y_offset = t_offset + num_legs;
        let z1_offset = y_offset + num_pairs * num_groups;
        let z2_offset = z1_offset + num_groups;
        let z3_offset = z2_offset + num_groups;

        let mut definitions = Vec::with_capacity(z3_offset + num_pairs);

        for g in 0..num_groups {
            for h in 0..num_groups {
                definitions.push(binary(format!("x[{g},{h}]")));
            }
        }

        for e in 0..num_legs {
            definitions.push(VariableDefinition {
                name: format!("t[{e}]"),
                kind: VariableKind::Continuous,
            });
        }

        for pair in GroupPair::all(num_groups) {
            for h in 0..num_groups {
                definitions.push(binary(format!("y[{pair},{h}]")));
            }
        }

        for h in 0..num_groups {
            definitions.push(binary(format!("z1[{h}]")));
        }

        for h in 0..num_groups {
            definitions.push(binary(format!("z2[{h}]")));
        }

        for pair in GroupPair::all(num_groups) {
            definitions.push(VariableDefinition {
                name: format!("z3[{pair}]"),
                kind: VariableKind::Integer,
            });
        }

        Self {
            definitions,
            num_groups,
            num_pairs,
            num_legs,
            t_offset,
            y_offset,
            z1_offset,
            z2_offset,
            z3_offset,
        }
    }

    pub fn definitions(&self) -> &[VariableDefinition] {
        &self.definitions
    }

    pub fn definition(&self, variable: VariableIdx) -> &VariableDefinition {
        &self.definitions[variable]
    }

    pub fn name(&self, variable: VariableIdx) -> &str {
        self.definitions[variable].name()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn num_pairs(&self) -> usize {
        self.num_pairs
    }

    pub fn num_legs(&self) -> usize {
        self.num_legs
    }

    #[inline]
    pub fn x(&self, group: GroupIdx, host: GroupIdx) -> VariableIdx {
        VariableIdx::new(group.get() * self.num_groups + host.get())
    }

    #[inline]
    pub fn t(&self, leg: usize) -> VariableIdx {
        debug_assert!(leg < self.num_legs);
        VariableIdx::new(self.t_offset + leg)
    }

    #[inline]
    pub fn y(&self, pair: GroupPair, host: GroupIdx) -> VariableIdx {
        VariableIdx::new(
            self.y_offset + pair.index(self.num_groups) * self.num_groups + host.get(),
        )
    }

    #[inline]
    pub fn z1(&self, host: GroupIdx) -> VariableIdx {
        VariableIdx::new(self.z1_offset + host.get())
    }

    #[inline]
    pub fn z2(&self, host: GroupIdx) -> VariableIdx {
        VariableIdx::new(self.z2_offset + host.get())
    }

    #[inline]
    pub fn z3(&self, pair: GroupPair) -> VariableIdx {
        VariableIdx::new(self.z3_offset + pair.index(self.num_groups))
    }

    pub fn legs(&self) -> impl Iterator<Item = VariableIdx> + use<'_> {
        (0..self.num_legs).map(|leg| self.t(leg))
    }
}

fn binary(name: String) -> VariableDefinition {
    VariableDefinition {
        name,
        kind: VariableKind::Binary,
    }
}

#[cfg(test)]
mod tests {
    use fxhash::FxHashSet;

    use crate::test_utils;

    use super::*;

    #[test]
    fn test_counts_and_names() {
        let instance = test_utils::uniform_instance(
            &["home", "starter", "main", "party"],
            &[1, 1, 2, 2],
            600.0,
        );
        let variables = DinnerVariables::declare(&instance);

        // 16 x, 3 t, 6 * 4 y, 4 z1, 4 z2, 6 z3
        assert_eq!(variables.len(), 16 + 3 + 24 + 4 + 4 + 6);

        let (g1, g3) = (GroupIdx::new(1), GroupIdx::new(3));
        let pair = GroupPair::new(g3, g1);

        assert_eq!(variables.name(variables.x(g1, g3)), "x[1,3]");
        assert_eq!(variables.name(variables.t(2)), "t[2]");
        assert_eq!(variables.name(variables.y(pair, GroupIdx::new(2))), "y[1,3,2]");
        assert_eq!(variables.name(variables.z1(g3)), "z1[3]");
        assert_eq!(variables.name(variables.z2(g1)), "z2[1]");
        assert_eq!(variables.name(variables.z3(pair)), "z3[1,3]");

        assert_eq!(variables.definition(variables.t(0)).kind(), VariableKind::Continuous);
        assert_eq!(variables.definition(variables.z3(pair)).kind(), VariableKind::Integer);
        assert_eq!(variables.definition(variables.x(g1, g1)).kind(), VariableKind::Binary);
    }

    #[test]
    fn test_names_are_unique() {
        let instance = test_utils::uniform_instance(
            &["home", "starter", "main", "dessert", "party"],
            &[1, 1, 2, 2, 3, 3],
            600.0,
        );
        let variables = DinnerVariables::declare(&instance);

        let names = variables
            .definitions()
            .iter()
            .map(|definition| definition.name())
            .collect::<FxHashSet<_>>();

        assert_eq!(names.len(), variables.len());
    }
}
