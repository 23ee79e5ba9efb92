pub mod batch;
pub mod cli;
pub mod codec;
pub mod dates;
pub mod dedupe;
pub mod errors;
pub mod plan;
pub mod process;
pub mod schema;
pub mod table;
pub mod transform;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};
use crate::schema::CandidateFormat;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("candidate_refine", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Process(args) => process::execute(&args),
        Commands::Preview(args) => process::preview(&args),
        Commands::Formats => {
            show_format(CandidateFormat::Experience);
            show_format(CandidateFormat::Fresher);
            Ok(())
        }
    }
}

fn show_format(format: CandidateFormat) {
    let title = match format {
        CandidateFormat::Experience => "experience",
        CandidateFormat::Fresher => "fresher",
    };
    println!("Column mapping for the {title} format:");
    let headers = vec!["Input Column".to_string(), "Output Column".to_string()];
    let rows: Vec<Vec<String>> = format
        .layout()
        .mapping
        .iter()
        .map(|(input, output)| vec![(*input).to_string(), (*output).to_string()])
        .collect();
    table::print_table(&headers, &rows);
    println!();

    // The fresher layout emits columns in a forced order, not mapping order.
    if let Some(order) = format.layout().output_order {
        println!("Output column order for the {title} format:");
        let headers = vec!["Position".to_string(), "Output Column".to_string()];
        let rows: Vec<Vec<String>> = order
            .iter()
            .enumerate()
            .map(|(idx, name)| vec![(idx + 1).to_string(), (*name).to_string()])
            .collect();
        table::print_table(&headers, &rows);
        println!();
    }
}
