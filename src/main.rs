//! `crew-per-diem` command line.
//!
//! Analyses flight-duty reports, prints the rotations table and the headline
//! indemnity, and optionally writes the table, the aircraft statistics and
//! the full result as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crew_per_diem::config::ConfigLoader;
use crew_per_diem::engine::MissionAnalyzer;
use crew_per_diem::export::{
    RotationRecord, format_amount, write_rotations_file, write_statistics_files,
};
use crew_per_diem::extraction::AutoPageSource;
use crew_per_diem::models::AnalysisResult;

/// Computes per-diem indemnities from flight-duty (EP5) reports.
#[derive(Debug, Parser)]
#[command(name = "crew-per-diem", version, about)]
struct Args {
    /// Configuration directory holding engine.yaml and the reference files.
    #[arg(long, default_value = "./config")]
    config: PathBuf,

    /// Write the rotations table to this CSV file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write aircraft type and registration statistics into this directory.
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Print the full analysis result as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Duty reports to analyse (.pdf, or .txt with form-feed page breaks).
    #[arg(required = true)]
    documents: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match ConfigLoader::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut analyzer = MissionAnalyzer::new(&config, AutoPageSource);
    let result = analyzer.analyse_files(&args.documents);

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => error!(error = %e, "Failed to serialise the result"),
        }
    } else {
        print_report(&result);
    }

    if let Some(path) = &args.output {
        if let Err(e) = write_rotations_file(path, &result) {
            error!(error = %e, path = %path.display(), "Failed to write the rotations table");
        }
    }

    if let Some(dir) = &args.stats {
        if let Err(e) = write_statistics_files(dir, &result) {
            error!(error = %e, dir = %dir.display(), "Failed to write aircraft statistics");
        }
    }

    ExitCode::SUCCESS
}

fn print_report(result: &AnalysisResult) {
    for warning in &result.warnings {
        println!("warning [{}] {}", warning.code, warning);
    }

    if !result.has_results() {
        println!("No rotation found.");
        return;
    }

    println!(
        "{:<16} {:>4} {:>4}  {:<32} {:<28} {:>10} {:>4} {:>12}",
        "Month", "Dep", "Ret", "Itinerary", "Principal Stopover", "Rate", "Days", "Total"
    );
    for line in &result.rotations {
        let record = RotationRecord::from(line);
        println!(
            "{:<16} {:>4} {:>4}  {:<32} {:<28} {:>10} {:>4} {:>12}",
            record.month,
            record.departure_day,
            record.return_day,
            record.itinerary,
            record.principal_stopover,
            record.daily_rate,
            record.days,
            record.total_indemnity
        );
    }

    match result.predominant_year {
        Some(year) => println!(
            "\nTotal indemnity for {}: {} EUR",
            year,
            format_amount(result.total_indemnity)
        ),
        None => println!("\nTotal indemnity: {} EUR", format_amount(result.total_indemnity)),
    }

    if let Some(most_used) = result.aircraft_types.first() {
        println!(
            "Most flown aircraft type: {} ({} segments)",
            most_used.key, most_used.segments
        );
    }
}
