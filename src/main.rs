use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use netspeed::cli::{Cli, OutputMode};
use netspeed::engine::client::build_client;
use netspeed::engine::runner::run_speed_test;
use netspeed::engine::types::QuietObserver;
use netspeed::output::console::ConsoleObserver;
use netspeed::output::{csv, json, report, simple};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "netspeed",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = cli.to_settings();
    let client = build_client(cli.local_addr()?, cli.request_timeout())
        .context("failed to build HTTP client")?;

    let mode = cli.output_mode();
    let result = match mode {
        OutputMode::Console => {
            run_speed_test(&client, &settings, &mut ConsoleObserver::new()).await?
        }
        _ => run_speed_test(&client, &settings, &mut QuietObserver).await?,
    };

    match mode {
        OutputMode::Console => report::print_report(&result),
        OutputMode::Simple => simple::print_simple(&result),
        OutputMode::Json => json::print_json(&result)?,
        OutputMode::JsonPretty => json::print_json_pretty(&result)?,
        OutputMode::Csv => csv::print_csv(&result)?,
    }

    Ok(())
}

/// Log to stderr so machine-readable output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
