use serde::Serialize;

use crate::{
    model::{dinner_model::DinnerModel, objective::PenaltyWeights},
    problem::{
        dinner_instance::DinnerInstance,
        group::{GroupIdx, GroupPair},
    },
};

/// Binary variables above this value are read as true.
pub const TRUTH_THRESHOLD: f64 = 0.99;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Visit {
    pub round: usize,
    pub event: String,
    pub host: String,
    /// Trip from the previous stop, the group's own home for the first visit
    pub travel_seconds: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub group: String,
    /// One visit per hosted round, in round order
    pub visits: Vec<Visit>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LegTime {
    pub from: String,
    pub to: String,
    pub seconds: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HostSummary {
    pub host: String,
    pub round: usize,
    /// Groups at the table, the host included
    pub attendees: usize,
    pub guests: Vec<String>,
    pub too_few: bool,
    pub too_many: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RepeatedEncounter {
    pub first: String,
    pub second: String,
    pub encounters: usize,
    pub extra: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DinnerSchedule {
    pub itineraries: Vec<Itinerary>,
    pub leg_times: Vec<LegTime>,
    pub hosts: Vec<HostSummary>,
    pub repeated_encounters: Vec<RepeatedEncounter>,
    pub total_travel_time: f64,
    pub objective: f64,
    pub penalties: PenaltyWeights,
}

impl DinnerSchedule {
    pub fn itinerary(&self, group: &str) -> Option<&Itinerary> {
        self.itineraries
            .iter()
            .find(|itinerary| itinerary.group == group)
    }

    pub fn host(&self, host: &str) -> Option<&HostSummary> {
        self.hosts.iter().find(|summary| summary.host == host)
    }
}

pub struct SolutionExtractor<'a> {
    instance: &'a DinnerInstance,
    model: &'a DinnerModel,
}

fn is_true(value: f64) -> bool {
    value > TRUTH_THRESHOLD
}

fn rounded(value: f64) -> usize {
    value.round().max(0.0) as usize
}

impl<'a> SolutionExtractor<'a> {
    pub fn new(instance: &'a DinnerInstance, model: &'a DinnerModel) -> Self {
        Self { instance, model }
    }

    fn attends(&self, values: &[f64], group: GroupIdx, host: GroupIdx) -> bool {
        is_true(values[self.model.variables().x(group, host).get()])
    }

    /// `values` holds the solver's value of every variable, by variable index.
    pub fn extract(&self, values: &[f64]) -> DinnerSchedule {
        let instance = self.instance;
        let vars = self.model.variables();
        let events = instance.events();

        let itineraries = instance
            .groups_iter()
            .map(|(group_id, group)| {
                let mut hosts = instance
                    .groups_iter()
                    .filter(|&(host_id, _)| self.attends(values, group_id, host_id))
                    .map(|(_, host)| host)
                    .collect::<Vec<_>>();
                hosts.sort_by_key(|host| host.host_round());

                let mut previous = group.location_id();
                Itinerary {
                    group: group.name().to_owned(),
                    visits: hosts
                        .into_iter()
                        .map(|host| {
                            let from = std::mem::replace(&mut previous, host.location_id());
                            Visit {
                                round: host.host_round(),
                                event: events.label(host.host_round()).to_owned(),
                                host: host.name().to_owned(),
                                travel_seconds: instance.travel_time(from, host.location_id()),
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        let leg_times = (0..events.num_legs())
            .map(|leg| LegTime {
                from: events.label(leg).to_owned(),
                to: events.label(leg + 1).to_owned(),
                seconds: values[vars.t(leg).get()],
            })
            .collect::<Vec<_>>();

        let hosts = instance
            .groups_iter()
            .map(|(host_id, host)| {
                let guests = instance
                    .groups_iter()
                    .filter(|&(group_id, _)| {
                        group_id != host_id && self.attends(values, group_id, host_id)
                    })
                    .map(|(_, group)| group.name().to_owned())
                    .collect::<Vec<_>>();

                HostSummary {
                    host: host.name().to_owned(),
                    round: host.host_round(),
                    attendees: guests.len() + usize::from(self.attends(values, host_id, host_id)),
                    guests,
                    too_few: is_true(values[vars.z1(host_id).get()]),
                    too_many: is_true(values[vars.z2(host_id).get()]),
                }
            })
            .collect();

        let repeated_encounters = instance
            .pairs()
            .filter_map(|pair| self.repeated_encounter(values, pair))
            .collect();

        DinnerSchedule {
            itineraries,
            total_travel_time: leg_times.iter().map(|leg| leg.seconds).sum(),
            leg_times,
            hosts,
            repeated_encounters,
            objective: self.model.objective().evaluate(values),
            penalties: *self.model.penalties(),
        }
    }

    fn repeated_encounter(&self, values: &[f64], pair: GroupPair) -> Option<RepeatedEncounter> {
        let encounters = (0..self.instance.num_groups())
            .map(GroupIdx::new)
            .filter(|&host| {
                self.attends(values, pair.first(), host)
                    && self.attends(values, pair.second(), host)
            })
            .count();

        if encounters <= 1 {
            return None;
        }

        Some(RepeatedEncounter {
            first: self.instance.group(pair.first()).name().to_owned(),
            second: self.instance.group(pair.second()).name().to_owned(),
            encounters,
            extra: rounded(values[self.model.variables().z3(pair).get()]),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{model::objective::PenaltyWeights, test_utils};

    use super::*;

    #[test]
    fn test_extract_hand_made_assignment() {
        let instance = test_utils::uniform_instance(
            &["home", "starter", "main", "party"],
            &[1, 1, 2, 2],
            600.0,
        );
        let model = DinnerModel::build(&instance, PenaltyWeights::default()).unwrap();
        let vars = model.variables();
        let g = GroupIdx::new;

        let mut values = vec![0.0; vars.len()];
        // G0 and G1 meet twice, at G0 and at G2
        for (group, starter, main) in [(0, 0, 2), (1, 0, 2), (2, 1, 2), (3, 1, 3)] {
            values[vars.x(g(group), g(starter)).get()] = 1.0;
            values[vars.x(g(group), g(main)).get()] = 0.999_999;
        }
        values[vars.z3(GroupPair::new(g(0), g(1))).get()] = 1.0;
        values[vars.t(1).get()] = 600.0;

        let schedule = SolutionExtractor::new(&instance, &model).extract(&values);

        let itinerary = schedule.itinerary("G3").unwrap();
        assert_eq!(
            itinerary
                .visits
                .iter()
                .map(|visit| (visit.round, visit.host.as_str()))
                .collect::<Vec<_>>(),
            vec![(1, "G1"), (2, "G3")]
        );
        assert_eq!(itinerary.visits[0].event, "starter");

        assert_eq!(schedule.host("G2").unwrap().attendees, 3);
        assert_eq!(schedule.host("G2").unwrap().guests, vec!["G0", "G1"]);
        assert_eq!(schedule.host("G3").unwrap().attendees, 1);

        assert_eq!(
            schedule.repeated_encounters,
            vec![RepeatedEncounter {
                first: "G0".to_owned(),
                second: "G1".to_owned(),
                encounters: 2,
                extra: 1,
            }]
        );

        assert_eq!(schedule.leg_times.len(), 3);
        assert_eq!(schedule.leg_times[1].from, "starter");
        assert_eq!(schedule.leg_times[1].to, "main");
        assert_eq!(schedule.total_travel_time, 600.0);
        assert_eq!(schedule.objective, 600.0 + 600.0);
    }

    #[test]
    fn test_visits_carry_the_trip_from_the_previous_stop() {
        let rows = vec![
            vec![0.0, 10.0, 20.0, 30.0],
            vec![11.0, 0.0, 40.0, 50.0],
            vec![21.0, 41.0, 0.0, 60.0],
            vec![31.0, 51.0, 61.0, 0.0],
        ];
        let instance = test_utils::instance_with_matrix(
            &["home", "starter", "main", "party"],
            &[1, 1, 2, 2],
            rows,
            false,
        );
        let model = DinnerModel::build(&instance, PenaltyWeights::default()).unwrap();
        let vars = model.variables();
        let g = GroupIdx::new;

        let mut values = vec![0.0; vars.len()];
        for (group, starter, main) in [(0, 0, 2), (1, 1, 3), (2, 0, 2), (3, 1, 3)] {
            values[vars.x(g(group), g(starter)).get()] = 1.0;
            values[vars.x(g(group), g(main)).get()] = 1.0;
        }

        let schedule = SolutionExtractor::new(&instance, &model).extract(&values);

        let trips = |group: &str| {
            schedule
                .itinerary(group)
                .unwrap()
                .visits
                .iter()
                .map(|visit| visit.travel_seconds)
                .collect::<Vec<_>>()
        };
        assert_eq!(trips("G0"), vec![0.0, 20.0]);
        assert_eq!(trips("G2"), vec![21.0, 20.0]);
        assert_eq!(trips("G3"), vec![51.0, 50.0]);
    }

    #[test]
    fn test_values_below_threshold_are_false() {
        let instance = test_utils::uniform_instance(&["home", "dinner", "party"], &[1, 1, 1], 60.0);
        let model = DinnerModel::build(&instance, PenaltyWeights::default()).unwrap();
        let vars = model.variables();

        let mut values = vec![0.0; vars.len()];
        values[vars.x(GroupIdx::new(0), GroupIdx::new(0)).get()] = 0.98;

        let schedule = SolutionExtractor::new(&instance, &model).extract(&values);

        assert!(schedule.itinerary("G0").unwrap().visits.is_empty());
    }
}
