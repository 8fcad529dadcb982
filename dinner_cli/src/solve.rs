use std::{fs::File, io::BufWriter, path::PathBuf, time::Duration};

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use dinner_optimizer::{
    model::objective::{DEFAULT_PENALTY, PenaltyWeights},
    problem::dinner_instance::DinnerInstance,
    solver::{
        csv_export::write_schedule_csv,
        extractor::DinnerSchedule,
        solver::{DinnerSolver, SolveOutcome},
        solver_params::SolverParams,
    },
};
use indicatif::ProgressBar;
use jiff::SignedDuration;
use tracing::info;

use crate::{input::load_instance, parsers};

#[derive(Args)]
pub struct SolveArgs {
    /// The instance to solve
    #[arg(short, long)]
    input: PathBuf,

    /// Solver backend (cplex, highs, coin_cbc, scip, microlp)
    #[arg(short, long)]
    solver: Option<String>,

    /// Penalty in seconds per host with a guest too few
    #[arg(long, value_parser = parsers::parse_penalty, default_value_t = DEFAULT_PENALTY)]
    penalty_too_few: f64,

    /// Penalty in seconds per host with a guest too many
    #[arg(long, value_parser = parsers::parse_penalty, default_value_t = DEFAULT_PENALTY)]
    penalty_too_many: f64,

    /// Penalty in seconds per repeated encounter of two groups
    #[arg(long, value_parser = parsers::parse_penalty, default_value_t = DEFAULT_PENALTY)]
    penalty_repeat: f64,

    /// Time limit for the solver backend (e.g., "30s", "5m", "PT1H30M")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    time_limit: Option<SignedDuration>,

    /// Write the outcome as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the host of every group per round as CSV to this file
    #[arg(long)]
    csv: Option<PathBuf>,
}

pub async fn run(args: SolveArgs) -> anyhow::Result<()> {
    let instance = load_instance(&args.input).await?;

    let params = SolverParams {
        penalties: PenaltyWeights {
            too_few: args.penalty_too_few,
            too_many: args.penalty_too_many,
            repeat_meeting: args.penalty_repeat,
        },
        preferred_backend: args.solver,
        time_limit: args.time_limit,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Solving {} groups", instance.num_groups()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let (instance, outcome) = tokio::task::spawn_blocking(move || {
        let outcome = DinnerSolver::new(&instance, params).solve();
        (instance, outcome)
    })
    .await?;

    spinner.finish_and_clear();
    let outcome = outcome?;

    print_outcome(&instance, &outcome);

    if let (Some(csv), Some(schedule)) = (args.csv, &outcome.schedule) {
        let writer = BufWriter::new(File::create(&csv)?);
        write_schedule_csv(instance.events(), schedule, writer)?;
        info!("Wrote {}", csv.display());
    }

    if let Some(output) = args.output {
        let writer = BufWriter::new(File::create(&output)?);
        serde_json::to_writer_pretty(writer, &outcome)?;
        info!("Wrote {}", output.display());
    }

    Ok(())
}

fn print_outcome(instance: &DinnerInstance, outcome: &SolveOutcome) {
    println!(
        "Status: {:?} ({}, {:#})",
        outcome.status, outcome.backend, outcome.duration
    );

    if let Some(message) = &outcome.message {
        println!("{message}");
    }

    if let Some(schedule) = &outcome.schedule {
        println!("{}", itinerary_table(instance, schedule));
        println!("{}", hosts_table(schedule));
        println!("{}", legs_table(schedule));
        println!("Objective: {:.1}", schedule.objective);
    }
}

fn itinerary_table(instance: &DinnerInstance, schedule: &DinnerSchedule) -> Table {
    let events = instance.events();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(
        std::iter::once("Group").chain(events.hosted_rounds().map(|round| events.label(round))),
    );

    for itinerary in &schedule.itineraries {
        table.add_row(
            std::iter::once(itinerary.group.clone()).chain(itinerary.visits.iter().map(|visit| {
                let trip = SignedDuration::from_secs(visit.travel_seconds.round() as i64);
                format!("{} ({trip:#})", visit.host)
            })),
        );
    }

    table
}

fn hosts_table(schedule: &DinnerSchedule) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Host", "Round", "Attendees", "Guests"]);

    for host in &schedule.hosts {
        table.add_row(vec![
            host.host.clone(),
            host.round.to_string(),
            host.attendees.to_string(),
            host.guests.join(", "),
        ]);
    }

    table
}

fn legs_table(schedule: &DinnerSchedule) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["From", "To", "Longest trip"]);

    for leg in &schedule.leg_times {
        let duration = SignedDuration::from_secs(leg.seconds.round() as i64);
        table.add_row(vec![
            leg.from.clone(),
            leg.to.clone(),
            format!("{duration:#}"),
        ]);
    }

    table
}
