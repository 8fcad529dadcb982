use std::path::PathBuf;

use clap::Args;

use crate::input::load_instance;

#[derive(Args)]
pub struct MatrixArgs {
    /// The instance whose locations to fetch travel times for
    #[arg(short = 'i', long)]
    input: PathBuf,
}

/// Geocodes the instance and warms the matrix cache.
pub async fn run(args: MatrixArgs) -> anyhow::Result<()> {
    let instance = load_instance(&args.input).await?;
    let travel_times = instance.travel_times();

    println!(
        "{} locations, symmetric: {}",
        travel_times.num_locations(),
        travel_times.is_symmetric()
    );

    if let Some(max) = travel_times.max_pair() {
        println!(
            "Longest trip: {} -> {} ({:#})",
            instance.location(max.from),
            instance.location(max.to),
            travel_times.travel_duration(max.from, max.to)
        );
    }

    for round in instance.round_hosts() {
        println!("Round {} ({}): {}", round.round, round.label, round.hosts.join(", "));
    }

    Ok(())
}
