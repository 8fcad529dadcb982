use crate::problem::{
    dinner_instance::{DinnerInstance, DinnerInstanceBuilder},
    location::Location,
    travel_time_matrix::TravelTimeMatrix,
};

/// Distinct locations on a small grid around Bielefeld.
pub fn create_location_grid(count: usize) -> Vec<Location> {
    (0..count)
        .map(|i| Location::from_lat_lon(52.0 + (i / 4) as f64 * 0.01, 8.5 + (i % 4) as f64 * 0.01))
        .collect()
}

/// One group per entry of `host_rounds`, named `G0`, `G1`, ..., each at its
/// own location, with the same travel time between every pair of locations.
pub fn uniform_instance(events: &[&str], host_rounds: &[usize], time: f64) -> DinnerInstance {
    let mut builder = group_builder(events, host_rounds, false);
    let num_locations = builder.locations().len();
    builder.set_travel_times(TravelTimeMatrix::from_constant(num_locations, time));
    builder.build().unwrap()
}

/// Like [`uniform_instance`] with explicit travel times. Location `i` belongs
/// to group `i`; with `after_party` the last row is the after-party location.
pub fn instance_with_matrix(
    events: &[&str],
    host_rounds: &[usize],
    rows: Vec<Vec<f64>>,
    after_party: bool,
) -> DinnerInstance {
    let mut builder = group_builder(events, host_rounds, after_party);
    builder.set_travel_times(TravelTimeMatrix::new(rows).unwrap());
    builder.build().unwrap()
}

fn group_builder(
    events: &[&str],
    host_rounds: &[usize],
    after_party: bool,
) -> DinnerInstanceBuilder {
    let locations = create_location_grid(host_rounds.len() + 1);

    let mut builder = DinnerInstanceBuilder::new();
    builder.set_events(events.iter().copied());
    for (i, &round) in host_rounds.iter().enumerate() {
        builder.add_group(format!("G{i}"), locations[i], round);
    }

    if after_party {
        builder.set_after_party(locations[host_rounds.len()]);
    }

    builder
}
