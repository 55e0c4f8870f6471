//! AOP Query - Main entry point

use aop_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use aop_query::{commands, Cli, Commands};
use clap::Parser;
use serde::Serialize;
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Verbose mode logs debug events; otherwise only warnings reach stderr
    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .log_file_prefix("aop-query")
        .filter_directives("hyper=warn,reqwest=warn")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // The CLI works without logging, so setup errors are ignored
    let _guard = init_logging(&log_config).ok().flatten();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn execute_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Build(args) => print_json(&commands::build::run(args).await?),
        Commands::Convert {
            input,
            tables_dir,
            table_format,
            output,
        } => print_json(&commands::convert::run(
            input,
            tables_dir.as_deref(),
            table_format,
            output.as_deref(),
        )?),
        Commands::Summary { input } => print_json(&commands::summary::run(input)?),
    }
}

fn print_json<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
