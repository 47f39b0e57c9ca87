use anyhow::Result;
use clap::Parser;
use serde::Serialize;

mod cli;
mod commands;
mod config;
mod provider;
mod repository;

use cli::{Cli, Command};
use commands::App;
use config::AgentConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse arguments; usage errors exit with 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help / --version
            err.print()?;
            return Ok(());
        }
        Err(err) => {
            if let Err(io) = err.print() {
                eprintln!("{:?}: {}", err.kind(), io);
            }
            std::process::exit(1);
        }
    };

    // 2. Load .env, init tracing (stderr, stdout carries the result)
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("screening_agent=info,analysis_orchestrator=info")
    });
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    if json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    // 3. Configuration
    let config = AgentConfig::from_env()?;
    tracing::info!(
        metrics = %config.metrics_path.display(),
        profile = %config.profile_path.display(),
        cache_ttl_seconds = config.cache_ttl_seconds,
        "configuration loaded"
    );

    // 4. Run the command
    let app = App::bootstrap(config).await?;
    match cli.command {
        Command::Rank { limit } => print_json(&app.rank(limit).await?, cli.pretty),
        Command::Explain { symbol } => print_json(&app.explain(&symbol).await?, cli.pretty),
        Command::Portfolio { file } => print_json(&app.portfolio(&file).await?, cli.pretty),
        Command::Plan => print_json(&app.plan().await?, cli.pretty),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", rendered);
    Ok(())
}
