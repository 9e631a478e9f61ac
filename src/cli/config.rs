//! Config command implementation.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{ConfigCommand, OutputFormat};
use crate::core::client::StatusPolicy;
use crate::core::models::RobotOutput;
use crate::error::Result;
use crate::render::robot;
use crate::storage::ResolvedConfig;

/// One resolved setting and where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct SettingView {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

/// Execute a config subcommand.
pub fn execute(command: ConfigCommand, config: &ResolvedConfig) -> Result<()> {
    let output = match command {
        ConfigCommand::Path => config.config_path.display().to_string(),
        ConfigCommand::Show => render_show(config)?,
    };
    println!("{output}");
    Ok(())
}

/// Resolved settings in display order.
#[must_use]
pub fn settings(config: &ResolvedConfig) -> Vec<SettingView> {
    let sources = &config.sources;
    let strict = matches!(config.status_policy, StatusPolicy::RequireSuccess);
    vec![
        setting("api.base_url", config.base_url.clone(), sources.base_url),
        setting("api.strict_status", strict.to_string(), sources.status_policy),
        setting("debug.http_bodies", config.http_debug.to_string(), sources.http_debug),
        setting("output.format", config.format.as_str().to_string(), sources.format),
        setting("output.color", (!config.no_color).to_string(), sources.no_color),
        setting("output.pretty", config.pretty.to_string(), sources.pretty),
    ]
}

fn setting(
    key: &'static str,
    value: String,
    source: crate::storage::ConfigSource,
) -> SettingView {
    SettingView {
        key,
        value,
        source: source.to_string(),
    }
}

fn render_show(config: &ResolvedConfig) -> Result<String> {
    let settings = settings(config);

    match config.format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ConfigData<'a> {
                config_path: String,
                settings: &'a [SettingView],
            }
            let output = RobotOutput::new(
                "config",
                ConfigData {
                    config_path: config.config_path.display().to_string(),
                    settings: &settings,
                },
            );
            if config.pretty {
                robot::render_json_pretty(&output)
            } else {
                robot::render_json(&output)
            }
        }
        OutputFormat::Md => {
            let mut out = format!("## config\n- file: {}\n", config.config_path.display());
            for s in &settings {
                writeln!(out, "- {}: {} ({})", s.key, s.value, s.source)
                    .map_err(anyhow::Error::from)?;
            }
            Ok(out)
        }
        OutputFormat::Human => {
            let width = settings.iter().map(|s| s.key.len()).max().unwrap_or(0);
            let mut out = format!("Config file: {}\n", config.config_path.display());
            for s in &settings {
                writeln!(out, "  {:<width$}  {}  ({})", s.key, s.value, s.source)
                    .map_err(anyhow::Error::from)?;
            }
            Ok(out.trim_end().to_string())
        }
    }
}
