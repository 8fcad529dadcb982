use serde::Serialize;
use tracing::debug;

use crate::problem::{dinner_instance::DinnerInstance, group::GroupIdx};

use super::{
    linear::{ConstraintSense, LinearConstraint, LinearExpression},
    variables::DinnerVariables,
};

/// Every host should end up with this many groups at the table, itself included.
pub const TARGET_TABLE_SIZE: f64 = 3.0;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    /// Each group eats at exactly one host per round
    RoundAssignment,
    /// Each host eats at its own table
    SelfHosting,
    /// Attendees of a host, plus shortfall, minus surplus, equal the target size
    Capacity,
    /// `y` is forced to one when both groups of a pair eat at the same host
    MeetingDetection,
    /// Encounters of a pair beyond the first are counted by `z3`
    RepeatMeetingCap,
    /// Travel from home to the first hosted round
    FirstLeg,
    /// Travel between two consecutive hosted rounds
    IntermediateLeg,
    /// Travel from the last hosted round back home
    FinalLegHome,
    /// Travel from the last hosted round to the after-party
    FinalLegAfterParty,
}

impl ConstraintFamily {
    pub const ALL: [ConstraintFamily; 9] = [
        ConstraintFamily::RoundAssignment,
        ConstraintFamily::SelfHosting,
        ConstraintFamily::Capacity,
        ConstraintFamily::MeetingDetection,
        ConstraintFamily::RepeatMeetingCap,
        ConstraintFamily::FirstLeg,
        ConstraintFamily::IntermediateLeg,
        ConstraintFamily::FinalLegHome,
        ConstraintFamily::FinalLegAfterParty,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConstraintFamily::RoundAssignment => "round_assignment",
            ConstraintFamily::SelfHosting => "self_hosting",
            ConstraintFamily::Capacity => "capacity",
            ConstraintFamily::MeetingDetection => "meeting_detection",
            ConstraintFamily::RepeatMeetingCap => "repeat_meeting_cap",
            ConstraintFamily::FirstLeg => "first_leg",
            ConstraintFamily::IntermediateLeg => "intermediate_leg",
            ConstraintFamily::FinalLegHome => "final_leg_home",
            ConstraintFamily::FinalLegAfterParty => "final_leg_after_party",
        }
    }
}

impl std::fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub struct ConstraintGenerator<'a> {
    instance: &'a DinnerInstance,
    variables: &'a DinnerVariables,
}

impl<'a> ConstraintGenerator<'a> {
    pub fn new(instance: &'a DinnerInstance, variables: &'a DinnerVariables) -> Self {
        Self {
            instance,
            variables,
        }
    }

    pub fn generate(&self) -> Vec<LinearConstraint> {
        let mut constraints = Vec::new();

        for family in ConstraintFamily::ALL {
            let before = constraints.len();
            self.generate_family(family, &mut constraints);
            debug!(
                family = family.name(),
                count = constraints.len() - before,
                "Generated constraints"
            );
        }

        constraints
    }

    pub fn generate_family(
        &self,
        family: ConstraintFamily,
        constraints: &mut Vec<LinearConstraint>,
    ) {
        match family {
            ConstraintFamily::RoundAssignment => self.round_assignment(constraints),
            ConstraintFamily::SelfHosting => self.self_hosting(constraints),
            ConstraintFamily::Capacity => self.capacity(constraints),
            ConstraintFamily::MeetingDetection => self.meeting_detection(constraints),
            ConstraintFamily::RepeatMeetingCap => self.repeat_meeting_cap(constraints),
            ConstraintFamily::FirstLeg => self.first_leg(constraints),
            ConstraintFamily::IntermediateLeg => self.intermediate_legs(constraints),
            ConstraintFamily::FinalLegHome => {
                if self.instance.after_party().is_none() {
                    self.final_leg_home(constraints)
                }
            }
            ConstraintFamily::FinalLegAfterParty => self.final_leg_after_party(constraints),
        }
    }

    fn groups(&self) -> impl Iterator<Item = GroupIdx> + use<> {
        (0..self.instance.num_groups()).map(GroupIdx::new)
    }

    fn round_assignment(&self, constraints: &mut Vec<LinearConstraint>) {
        let vars = self.variables;

        for round in self.instance.events().hosted_rounds() {
            let hosts = self.instance.hosts_of_round(round);

            for group in self.groups() {
                let mut lhs = LinearExpression::with_capacity(hosts.len());
                for &host in hosts {
                    lhs.add_term(vars.x(group, host), 1.0);
                }

                constraints.push(LinearConstraint::new(
                    ConstraintFamily::RoundAssignment,
                    lhs,
                    ConstraintSense::Eq,
                    1.0,
                ));
            }
        }
    }

    fn self_hosting(&self, constraints: &mut Vec<LinearConstraint>) {
        for group in self.groups() {
            constraints.push(LinearConstraint::new(
                ConstraintFamily::SelfHosting,
                LinearExpression::default().term(self.variables.x(group, group), 1.0),
                ConstraintSense::Eq,
                1.0,
            ));
        }
    }

    fn capacity(&self, constraints: &mut Vec<LinearConstraint>) {
        let vars = self.variables;

        for host in self.groups() {
            let mut lhs = LinearExpression::with_capacity(vars.num_groups() + 2);
            for group in self.groups() {
                lhs.add_term(vars.x(group, host), 1.0);
            }
            lhs.add_term(vars.z1(host), 1.0).add_term(vars.z2(host), -1.0);

            constraints.push(LinearConstraint::new(
                ConstraintFamily::Capacity,
                lhs,
                ConstraintSense::Eq,
                TARGET_TABLE_SIZE,
            ));
        }
    }

    fn meeting_detection(&self, constraints: &mut Vec<LinearConstraint>) {
        let vars = self.variables;

        for pair in self.instance.pairs() {
            for host in self.groups() {
                let lhs = LinearExpression::with_capacity(3)
                    .term(vars.x(pair.first(), host), 1.0)
                    .term(vars.x(pair.second(), host), 1.0)
                    .term(vars.y(pair, host), -1.0);

                constraints.push(LinearConstraint::new(
                    ConstraintFamily::MeetingDetection,
                    lhs,
                    ConstraintSense::Leq,
                    1.0,
                ));
            }
        }
    }

    fn repeat_meeting_cap(&self, constraints: &mut Vec<LinearConstraint>) {
        let vars = self.variables;

        for pair in self.instance.pairs() {
            let mut lhs = LinearExpression::with_capacity(vars.num_groups() + 1);
            for host in self.groups() {
                lhs.add_term(vars.y(pair, host), 1.0);
            }
            lhs.add_term(vars.z3(pair), -1.0);

            constraints.push(LinearConstraint::new(
                ConstraintFamily::RepeatMeetingCap,
                lhs,
                ConstraintSense::Leq,
                1.0,
            ));
        }
    }

    /// `t[0]` bounds the trip from every group's home to the host it visits in
    /// the first round.
    fn first_leg(&self, constraints: &mut Vec<LinearConstraint>) {
        let vars = self.variables;
        let hosts = self.instance.hosts_of_round(self.instance.events().first_round());

        for group in self.groups() {
            let mut lhs = LinearExpression::with_capacity(hosts.len() + 1);
            for &host in hosts {
                lhs.add_term(
                    vars.x(group, host),
                    self.instance.travel_time_between(group, host),
                );
            }
            lhs.add_term(vars.t(0), -1.0);

            constraints.push(LinearConstraint::new(
                ConstraintFamily::FirstLeg,
                lhs,
                ConstraintSense::Leq,
                0.0,
            ));
        }
    }

    /// `t[e]` bounds the trip between `host1` in round `e` and `host2` in round
    /// `e + 1` whenever a group visits both:
    /// `tt(host1, host2) * (x[g, host1] + x[g, host2] - 1) <= t[e]`.
    fn intermediate_legs(&self, constraints: &mut Vec<LinearConstraint>) {
        let vars = self.variables;
        let events = self.instance.events();

        for round in events.first_round()..events.last_round() {
            let leg = vars.t(round);

            for &host1 in self.instance.hosts_of_round(round) {
                for &host2 in self.instance.hosts_of_round(round + 1) {
                    let time = self.instance.travel_time_between(host1, host2);

                    for group in self.groups() {
                        let lhs = LinearExpression::with_capacity(3)
                            .term(vars.x(group, host1), time)
                            .term(vars.x(group, host2), time)
                            .term(leg, -1.0);

                        constraints.push(LinearConstraint::new(
                            ConstraintFamily::IntermediateLeg,
                            lhs,
                            ConstraintSense::Leq,
                            time,
                        ));
                    }
                }
            }
        }
    }

    /// Without an after-party every group walks home from the host it visits in
    /// the last round.
    fn final_leg_home(&self, constraints: &mut Vec<LinearConstraint>) {
        let vars = self.variables;
        let events = self.instance.events();
        let hosts = self.instance.hosts_of_round(events.last_round());
        let leg = vars.t(events.num_legs() - 1);

        for group in self.groups() {
            let mut lhs = LinearExpression::with_capacity(hosts.len() + 1);
            for &host in hosts {
                lhs.add_term(
                    vars.x(group, host),
                    self.instance.travel_time_between(host, group),
                );
            }
            lhs.add_term(leg, -1.0);

            constraints.push(LinearConstraint::new(
                ConstraintFamily::FinalLegHome,
                lhs,
                ConstraintSense::Leq,
                0.0,
            ));
        }
    }

    /// Every host of the last round has at least itself at the table, so the
    /// trip from each of them to the after-party bounds the last leg.
    fn final_leg_after_party(&self, constraints: &mut Vec<LinearConstraint>) {
        let Some(after_party) = self.instance.after_party() else {
            return;
        };

        let vars = self.variables;
        let events = self.instance.events();
        let leg = vars.t(events.num_legs() - 1);

        for &host in self.instance.hosts_of_round(events.last_round()) {
            let time = self
                .instance
                .travel_time(self.instance.group(host).location_id(), after_party);

            constraints.push(LinearConstraint::new(
                ConstraintFamily::FinalLegAfterParty,
                LinearExpression::default().term(leg, 1.0),
                ConstraintSense::Geq,
                time,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use crate::{problem::group::GroupPair, test_utils};

    use super::*;

    fn count(constraints: &[LinearConstraint], family: ConstraintFamily) -> usize {
        constraints
            .iter()
            .filter(|constraint| constraint.family() == family)
            .count()
    }

    #[rstest]
    #[case::round_assignment(ConstraintFamily::RoundAssignment, 12)]
    #[case::self_hosting(ConstraintFamily::SelfHosting, 4)]
    #[case::capacity(ConstraintFamily::Capacity, 4)]
    #[case::meeting_detection(ConstraintFamily::MeetingDetection, 24)]
    #[case::repeat_meeting_cap(ConstraintFamily::RepeatMeetingCap, 6)]
    #[case::first_leg(ConstraintFamily::FirstLeg, 4)]
    #[case::intermediate_leg(ConstraintFamily::IntermediateLeg, 12)]
    #[case::final_leg_home(ConstraintFamily::FinalLegHome, 4)]
    #[case::final_leg_after_party(ConstraintFamily::FinalLegAfterParty, 0)]
    fn test_family_counts(#[case] family: ConstraintFamily, #[case] expected: usize) {
        // G0 hosts round 1, G1 round 2, G2 and G3 round 3
        let instance = test_utils::uniform_instance(
            &["home", "starter", "main", "dessert", "party"],
            &[1, 2, 3, 3],
            600.0,
        );
        let variables = DinnerVariables::declare(&instance);
        let constraints = ConstraintGenerator::new(&instance, &variables).generate();

        assert_eq!(count(&constraints, family), expected);
    }

    #[test]
    fn test_after_party_replaces_home_leg() {
        let instance = test_utils::instance_with_matrix(
            &["home", "starter", "main", "party"],
            &[1, 1, 2, 2],
            vec![
                vec![0.0, 1.0, 1.0, 1.0, 100.0],
                vec![1.0, 0.0, 1.0, 1.0, 200.0],
                vec![1.0, 1.0, 0.0, 1.0, 300.0],
                vec![1.0, 1.0, 1.0, 0.0, 400.0],
                vec![1.0, 1.0, 1.0, 1.0, 0.0],
            ],
            true,
        );
        let variables = DinnerVariables::declare(&instance);
        let constraints = ConstraintGenerator::new(&instance, &variables).generate();

        assert_eq!(count(&constraints, ConstraintFamily::FinalLegHome), 0);

        let after_party = constraints
            .iter()
            .filter(|constraint| constraint.family() == ConstraintFamily::FinalLegAfterParty)
            .collect::<Vec<_>>();

        assert_eq!(after_party.len(), 2);
        assert_eq!(after_party[0].rhs(), 300.0);
        assert_eq!(after_party[1].rhs(), 400.0);
        for constraint in after_party {
            assert_eq!(constraint.sense(), ConstraintSense::Geq);
            assert_eq!(constraint.lhs().coefficient(variables.t(2)), 1.0);
        }
    }

    #[test]
    fn test_capacity_shape() {
        let instance = test_utils::uniform_instance(&["home", "dinner", "party"], &[1, 1, 1], 60.0);
        let variables = DinnerVariables::declare(&instance);
        let mut constraints = Vec::new();
        ConstraintGenerator::new(&instance, &variables)
            .generate_family(ConstraintFamily::Capacity, &mut constraints);

        let host = GroupIdx::new(1);
        let capacity = &constraints[1];
        assert_eq!(capacity.rhs(), TARGET_TABLE_SIZE);
        assert_eq!(capacity.sense(), ConstraintSense::Eq);
        assert_eq!(capacity.lhs().coefficient(variables.z1(host)), 1.0);
        assert_eq!(capacity.lhs().coefficient(variables.z2(host)), -1.0);
        for group in 0..3 {
            assert_eq!(
                capacity.lhs().coefficient(variables.x(GroupIdx::new(group), host)),
                1.0
            );
        }
    }

    #[test]
    fn test_meeting_detection_shape() {
        let instance = test_utils::uniform_instance(&["home", "dinner", "party"], &[1, 1, 1], 60.0);
        let variables = DinnerVariables::declare(&instance);
        let mut constraints = Vec::new();
        ConstraintGenerator::new(&instance, &variables)
            .generate_family(ConstraintFamily::MeetingDetection, &mut constraints);

        // pairs (0,1), (0,2), (1,2), hosts 0..3
        let pair = GroupPair::new(GroupIdx::new(1), GroupIdx::new(2));
        let host = GroupIdx::new(0);
        let constraint = &constraints[2 * 3];

        assert_eq!(constraint.lhs().coefficient(variables.x(GroupIdx::new(1), host)), 1.0);
        assert_eq!(constraint.lhs().coefficient(variables.x(GroupIdx::new(2), host)), 1.0);
        assert_eq!(constraint.lhs().coefficient(variables.y(pair, host)), -1.0);
        assert_eq!(constraint.rhs(), 1.0);
    }

    fn asymmetric_rows() -> impl Strategy<Value = Vec<Vec<f64>>> {
        prop::collection::vec(prop::collection::vec(1u32..5000, 4), 4).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, row)| {
                    row.into_iter()
                        .enumerate()
                        .map(|(j, value)| if i == j { 0.0 } else { value as f64 })
                        .collect::<Vec<f64>>()
                })
                .collect::<Vec<_>>()
        })
    }

    proptest! {
        #[test]
        fn test_legs_read_matrix_in_travel_direction(rows in asymmetric_rows()) {
            // G0 and G1 host round 1, G2 and G3 host round 2
            let instance = test_utils::instance_with_matrix(
                &["home", "starter", "main", "party"],
                &[1, 1, 2, 2],
                rows.clone(),
                false,
            );
            let variables = DinnerVariables::declare(&instance);
            let generator = ConstraintGenerator::new(&instance, &variables);

            let mut first = Vec::new();
            generator.generate_family(ConstraintFamily::FirstLeg, &mut first);
            for (g, constraint) in first.iter().enumerate() {
                for h in 0..2 {
                    let x = variables.x(GroupIdx::new(g), GroupIdx::new(h));
                    prop_assert_eq!(constraint.lhs().coefficient(x), rows[g][h]);
                }
            }

            // ordered by host of round 1, host of round 2, then group
            let mut intermediate = Vec::new();
            generator.generate_family(ConstraintFamily::IntermediateLeg, &mut intermediate);
            prop_assert_eq!(intermediate.len(), 16);
            for (i, constraint) in intermediate.iter().enumerate() {
                let (host1, host2, g) = (i / 8, 2 + (i / 4) % 2, i % 4);
                let x = variables.x(GroupIdx::new(g), GroupIdx::new(host1));
                prop_assert_eq!(constraint.lhs().coefficient(x), rows[host1][host2]);
                prop_assert_eq!(constraint.rhs(), rows[host1][host2]);
            }

            let mut last = Vec::new();
            generator.generate_family(ConstraintFamily::FinalLegHome, &mut last);
            for (g, constraint) in last.iter().enumerate() {
                for h in 2..4 {
                    let x = variables.x(GroupIdx::new(g), GroupIdx::new(h));
                    prop_assert_eq!(constraint.lhs().coefficient(x), rows[h][g]);
                }
            }
        }
    }
}
