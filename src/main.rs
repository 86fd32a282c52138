mod attitude;
mod ephemeris;
mod overlay;
mod web;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::ephemeris::TleProvider;
use crate::web::Config;

#[derive(Parser)]
#[command(name = "satcam")]
#[command(about = "Satellite camera-pointing and ground-track overlay server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file and its TLE
    Check { config: String },
    /// Run the attitude engine and web server
    Serve { config: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => check(&config),
        Commands::Serve { config } => serve(&config).await,
    }
}

fn check(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let provider = match TleProvider::from_file(&config.satellite.tle_file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error loading TLE: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let name = config
        .satellite
        .name
        .as_deref()
        .or_else(|| provider.satellite_name())
        .unwrap_or("unnamed satellite");
    println!(
        "Config is valid: {} (NORAD {}), {} target(s), tick every {}",
        name,
        provider.norad_id(),
        config.targets.len(),
        humantime::format_duration(config.engine.tick_period)
    );
    for target in &config.targets {
        println!(
            "  {}: {:.4}, {:.4}",
            target.id, target.latitude_deg, target.longitude_deg
        );
    }
    ExitCode::SUCCESS
}

async fn serve(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
