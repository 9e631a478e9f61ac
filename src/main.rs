//! flickr-feed - Flickr public feed search
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use flickr_feed::cli::{Cli, Commands};
use flickr_feed::core::logging;
use flickr_feed::storage::ResolvedConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let search_args = match &cli.command {
        Commands::Search(args) => Some(args),
        Commands::Config(_) => None,
    };
    let resolved = ResolvedConfig::resolve(&cli, search_args);

    // Initialize logging
    let log_level = cli
        .log_level
        .as_deref()
        .and_then(logging::LogLevel::from_arg)
        .or_else(|| logging::parse_log_level_from_env().map(logging::LogLevel::from_tracing_level))
        .unwrap_or_default();
    let log_format = if cli.json_output {
        logging::LogFormat::Json
    } else {
        logging::parse_log_format_from_env().unwrap_or_default()
    };
    let log_file = logging::parse_log_file_from_env();
    let http_debug = resolved.as_ref().map_or(cli.http_debug, |c| c.http_debug);
    logging::init(log_level, log_format, log_file, cli.verbose, http_debug);

    let (format, no_color, pretty) = resolved.as_ref().map_or(
        (cli.effective_format().unwrap_or_default(), cli.no_color, cli.pretty),
        |c| (c.format, c.no_color, c.pretty),
    );

    // Execute command
    let result = match resolved {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            let error_output = flickr_feed::render::error::render_error(&e, format, no_color, pretty);
            eprintln!("{error_output}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli, mut config: ResolvedConfig) -> flickr_feed::Result<()> {
    config.no_color = !flickr_feed::util::env::should_use_color(config.no_color);

    match cli.command {
        Commands::Search(args) => flickr_feed::cli::search::execute(&args, &config).await,
        Commands::Config(command) => flickr_feed::cli::config::execute(command, &config),
    }
}
