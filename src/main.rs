//! Main entry point for the application.
//!
//! This module initializes logging, loads environment variables and
//! credentials, and either runs the crew once for a request given on the
//! command line (or prompted for) or serves the HTTP API.

mod agents;
mod api;
mod app;
mod cli;
mod config;
mod constants;
mod core;
mod errors;
mod llm;
mod tools;
mod utils;

use app::App;
use clap::Parser;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Main entry point that initializes and runs the application.
///
/// # Initialization steps:
/// 1. Parse CLI arguments
/// 2. Initialize logging system
/// 3. Load environment variables and credentials
/// 4. Bootstrap the crew and its tools
/// 5. Serve the API or run a single request
#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    utils::init_logging(&cli.logging_level, cli.log_file);

    if let Err(e) = dotenvy::dotenv() {
        warn!("Failed to load .env file: {}", e);
    }

    let credentials = match config::Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            eprintln!("{} {}", "✗".red(), e);
            return ExitCode::FAILURE;
        }
    };

    let app = match App::bootstrap(&cli.app_config(), &credentials).await {
        Ok(app) => app,
        Err(e) => {
            error!("Startup failed: {}", e);
            eprintln!("{} Startup failed: {}", "✗".red(), e);
            return ExitCode::FAILURE;
        }
    };

    if cli.api_enabled {
        info!("Starting API server on port {}", cli.api_port);
        return match api::server::launch_server(Arc::new(app), cli.api_port).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Failed to start server: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let request = match cli.request {
        Some(request) => request,
        None => match prompt_request() {
            Ok(request) => request,
            Err(e) => {
                error!("Failed to read request: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    run_once(&app, &request).await
}

fn prompt_request() -> Result<String, dialoguer::Error> {
    println!("{}", "\n🤖 OpenRTB bid request generator".bold().cyan());
    println!(
        "{}",
        "Describe the ad opportunity you want a bid request for.".yellow()
    );
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("📝 Your request")
        .interact_text()
}

/// Drives one pipeline step by step, rendering progress, then prints the artifact
async fn run_once(app: &App, request: &str) -> ExitCode {
    let mut pipeline = match app.pipeline_for(request) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("{}", utils::render_error(&e));
            return ExitCode::FAILURE;
        }
    };
    info!("Run {} started", pipeline.run_id());

    let spinner = utils::new_spinner();
    while !pipeline.completed() {
        utils::announce_next(&spinner, &pipeline);
        match pipeline.step().await {
            Ok(Some(event)) => spinner.println(utils::render_event(&event)),
            Ok(None) => break,
            Err(e) => {
                spinner.finish_and_clear();
                eprintln!("{}", utils::render_error(&e));
                if let Some(skipped) = utils::render_skipped(&pipeline) {
                    eprintln!("{}", skipped);
                }
                return ExitCode::FAILURE;
            }
        }
    }
    spinner.finish_and_clear();

    match pipeline.artifact() {
        Ok(artifact) => {
            println!("{}", artifact.to_pretty_string());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", utils::render_error(&e));
            if let Some(output) = pipeline
                .tasks()
                .last()
                .and_then(|t| pipeline.output(&t.id))
            {
                eprintln!("{}\n{}", "Final agent output:".dimmed(), output.raw_text);
            }
            ExitCode::FAILURE
        }
    }
}
