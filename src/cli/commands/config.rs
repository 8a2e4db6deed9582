//! Config command - show current configuration

use crate::cli::output::print_output;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub config_file_exists: bool,
    #[serde(flatten)]
    pub config: Config,
}

/// Execute the config command
pub async fn execute(
    _args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_file = XdgDirs::new().config_file();

    let response = ConfigResponse {
        config_file_exists: config_file.exists(),
        config_file: config_file.to_string_lossy().into_owned(),
        config: services.config.as_ref().clone(),
    };

    match format {
        OutputFormat::Human => {
            let config = &response.config;
            println!("Configuration:");
            println!(
                "  config_file: {}{}",
                response.config_file,
                if response.config_file_exists {
                    ""
                } else {
                    " (not found, using defaults)"
                }
            );
            println!("  scan:");
            println!("    recursive: {}", config.scan.recursive);
            println!("    exclude_patterns: {:?}", config.scan.exclude_patterns);
            println!("    system_dirs: {:?}", config.scan.system_dirs);
            println!("    on_cancel: {:?}", config.scan.on_cancel);
            println!("  extraction:");
            println!(
                "    max_part_size_mb: {}",
                config.extraction.max_part_size_mb
            );
            println!("  search:");
            println!("    max_query_length: {}", config.search.max_query_length);
        }
        OutputFormat::Json => print_output(&response, format),
    }

    Ok(())
}
