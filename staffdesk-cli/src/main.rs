//! `staffdesk` command line entry point
//!
//! Drives the same entity-page controller the web pages use against a live backend.
//! Logs go to stderr; record output goes to stdout as JSON lines.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use staffdesk_transport::HttpTransport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::config::CliConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing to stderr (stdout carries the records)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = CliConfig::load(&cli.config)?;
    let server = config.transport_config(cli.base_url.as_deref(), cli.token.as_deref())?;
    tracing::info!("Using backend {}", server.base_url);

    let ctx = Context {
        transport: Arc::new(HttpTransport::new(&server)?),
        config: config.controller,
    };

    match &cli.command {
        Command::List(args) => commands::list(&ctx, args).await,
        Command::Delete(args) => commands::delete(&ctx, args).await,
    }
}
