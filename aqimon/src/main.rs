//! Secure AQI Monitor Entry Point

use aqimon::bootstrap;
use aqimon::cli::serve::ServeArgs;
use aqimon::cli::{Cli, Commands};
use aqimon::config::MonitorConfig;
use aqimon::sampler::SimulatedSensor;
use aqimon::{logging, server};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("failed to initialize logging: {}", e);
    }

    match cli.command {
        Some(Commands::Decrypt(args)) => {
            if let Err(e) = aqimon::cli::decrypt::execute(&args).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve(args)) => {
            run_server(args).await;
        }
        None => {
            // No subcommand - default to serve
            match ServeArgs::from_env() {
                Ok(args) => run_server(args).await,
                Err(e) => e.exit(),
            }
        }
    }
}

async fn run_server(args: ServeArgs) {
    let config = MonitorConfig::from_env();

    let ctx = match bootstrap::initialize(&config, Arc::new(SimulatedSensor)).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to initialize monitor: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = ctx.state.shutdown.clone();
    let sampler = ctx.sampler.start(shutdown.clone());

    let result = server::run(ctx.state, &args.bind_addr()).await;

    shutdown.request_shutdown();
    if let Err(e) = sampler.await {
        warn!("Sampling loop terminated abnormally: {}", e);
    }

    match result {
        Ok(()) => info!("Secure AQI Monitor stopped"),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
