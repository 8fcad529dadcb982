use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use dinner_optimizer::{
    json::schema::generate_json_schema,
    solver::backend::{FALLBACK_ORDER, SolverBackend},
};
use mimalloc::MiMalloc;

use crate::{matrix::MatrixArgs, solve::SolveArgs};

mod input;
mod matrix;
mod parsers;
mod solve;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign groups to hosts and print the schedule
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Geocode an instance and cache its travel times
    Matrix {
        #[command(flatten)]
        args: MatrixArgs,
    },
    /// Print the JSON schema of the input
    Schema,
    /// List solver backends in fallback order
    Backends,
}

fn print_backends() {
    let selected = SolverBackend::best_available();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Backend", "Available", "Default"]);

    for backend in FALLBACK_ORDER {
        table.add_row(vec![
            backend.name(),
            if backend.is_available() { "yes" } else { "no" },
            if backend == selected { "*" } else { "" },
        ]);
    }

    println!("{table}");
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Solve { args }) => solve::run(args).await?,
        Some(Commands::Matrix { args }) => matrix::run(args).await?,
        Some(Commands::Schema) => println!("{}", generate_json_schema()?),
        Some(Commands::Backends) => print_backends(),
        None => {}
    }

    Ok(())
}
