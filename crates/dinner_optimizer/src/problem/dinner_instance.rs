use fxhash::FxHashSet;
use serde::Serialize;

use super::{
    error::ConfigurationError,
    event_sequence::EventSequence,
    group::{Group, GroupIdx, GroupPair},
    location::{Location, LocationIdx},
    location_registry::LocationRegistry,
    travel_time_matrix::{Seconds, TravelTimeMatrix},
};

/// A validated progressive dinner: events, groups, their locations and the
/// travel times between every pair of those locations.
#[derive(Debug, Clone)]
pub struct DinnerInstance {
    events: EventSequence,
    groups: Vec<Group>,
    registry: LocationRegistry,
    after_party: Option<LocationIdx>,
    travel_times: TravelTimeMatrix,
    /// Hosts per event index, empty for the first and last event
    hosts_by_round: Vec<Vec<GroupIdx>>,
}

impl DinnerInstance {
    pub fn events(&self) -> &EventSequence {
        &self.events
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn groups_iter(&self) -> impl Iterator<Item = (GroupIdx, &Group)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(index, group)| (GroupIdx::new(index), group))
    }

    pub fn group(&self, group_id: GroupIdx) -> &Group {
        &self.groups[group_id]
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn num_pairs(&self) -> usize {
        GroupPair::count(self.groups.len())
    }

    pub fn pairs(&self) -> impl Iterator<Item = GroupPair> + use<> {
        GroupPair::all(self.groups.len())
    }

    pub fn hosts_of_round(&self, round: usize) -> &[GroupIdx] {
        &self.hosts_by_round[round]
    }

    pub fn locations(&self) -> &[Location] {
        self.registry.locations()
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        self.registry.location(location_id)
    }

    pub fn after_party(&self) -> Option<LocationIdx> {
        self.after_party
    }

    pub fn travel_times(&self) -> &TravelTimeMatrix {
        &self.travel_times
    }

    /// Travel time from the location of `from` to the location of `to`.
    pub fn travel_time_between(&self, from: GroupIdx, to: GroupIdx) -> Seconds {
        self.travel_times.travel_time(
            self.groups[from].location_id(),
            self.groups[to].location_id(),
        )
    }

    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> Seconds {
        self.travel_times.travel_time(from, to)
    }
}

#[derive(Debug, Default)]
pub struct DinnerInstanceBuilder {
    events: Option<Vec<String>>,
    groups: Vec<PendingGroup>,
    registry: LocationRegistry,
    after_party: Option<LocationIdx>,
    travel_times: Option<TravelTimeMatrix>,
}

#[derive(Debug)]
struct PendingGroup {
    name: String,
    location: Location,
    location_id: LocationIdx,
    host_round: usize,
}

impl DinnerInstanceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges locations closer than `tolerance_degrees` instead of requiring
    /// exact coordinates.
    pub fn with_location_tolerance(tolerance_degrees: f64) -> Self {
        Self {
            registry: LocationRegistry::with_tolerance(tolerance_degrees),
            ..Self::default()
        }
    }

    pub fn set_events<I, S>(&mut self, events: I) -> &mut DinnerInstanceBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = Some(events.into_iter().map(Into::into).collect());
        self
    }

    pub fn add_group(
        &mut self,
        name: impl Into<String>,
        location: Location,
        host_round: usize,
    ) -> &mut DinnerInstanceBuilder {
        let location_id = self.registry.register(location);
        self.groups.push(PendingGroup {
            name: name.into(),
            location,
            location_id,
            host_round,
        });
        self
    }

    pub fn set_after_party(&mut self, location: Location) -> &mut DinnerInstanceBuilder {
        self.after_party = Some(self.registry.register(location));
        self
    }

    /// Distinct locations registered so far, in `LocationIdx` order. The travel
    /// times must cover exactly these.
    pub fn locations(&self) -> &[Location] {
        self.registry.locations()
    }

    pub fn set_travel_times(
        &mut self,
        travel_times: TravelTimeMatrix,
    ) -> &mut DinnerInstanceBuilder {
        self.travel_times = Some(travel_times);
        self
    }

    pub fn build(self) -> Result<DinnerInstance, ConfigurationError> {
        let events = EventSequence::new(self.events.unwrap_or_default())?;

        let mut names = FxHashSet::default();
        for group in &self.groups {
            if !names.insert(group.name.as_str()) {
                return Err(ConfigurationError::DuplicateGroupName(group.name.clone()));
            }

            if !group.location.is_finite() {
                return Err(ConfigurationError::NonFiniteLocation {
                    name: group.name.clone(),
                });
            }

            if !events.is_hosted_round(group.host_round) {
                return Err(ConfigurationError::HostRoundOutOfRange {
                    name: group.name.clone(),
                    round: group.host_round,
                    last_round: events.last_round(),
                });
            }
        }

        let mut hosts_by_round = vec![Vec::new(); events.len()];
        for (index, group) in self.groups.iter().enumerate() {
            hosts_by_round[group.host_round].push(GroupIdx::new(index));
        }

        if let Some(round) = events
            .hosted_rounds()
            .find(|&round| hosts_by_round[round].is_empty())
        {
            return Err(ConfigurationError::MissingHost {
                round,
                label: events.label(round).to_owned(),
            });
        }

        let travel_times = self
            .travel_times
            .ok_or(ConfigurationError::MissingTravelTimes)?;

        if travel_times.num_locations() != self.registry.len() {
            return Err(ConfigurationError::MatrixSizeMismatch {
                expected: self.registry.len(),
                found: travel_times.num_locations(),
            });
        }

        let groups = self
            .groups
            .into_iter()
            .map(|group| Group::new(group.name, group.location_id, group.host_round))
            .collect();

        Ok(DinnerInstance {
            events,
            groups,
            registry: self.registry,
            after_party: self.after_party,
            travel_times,
            hosts_by_round,
        })
    }
}

/// Per-round host names, handy for logging and reports.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RoundHosts {
    pub round: usize,
    pub label: String,
    pub hosts: Vec<String>,
}

impl DinnerInstance {
    pub fn round_hosts(&self) -> Vec<RoundHosts> {
        self.events
            .hosted_rounds()
            .map(|round| RoundHosts {
                round,
                label: self.events.label(round).to_owned(),
                hosts: self.hosts_by_round[round]
                    .iter()
                    .map(|&host| self.groups[host].name().to_owned())
                    .collect(),
            })
            .collect()
    }
}
