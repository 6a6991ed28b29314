//! Config command - show or change client settings

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use coinport_core::config::Config;

use super::get_coinport_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Point the client at another backend
    SetApiUrl {
        /// Backend base URL, e.g. https://api.example.com
        url: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let coinport_dir = get_coinport_dir();
    std::fs::create_dir_all(&coinport_dir)?;
    let mut config = Config::load(&coinport_dir)?;

    match command {
        ConfigCommands::Show { json } => {
            let settings = json!({
                "apiUrl": config.api_url,
                "environment": config.environment,
                "frontendOrigin": config.frontend_origin,
                "pollIntervalSecs": config.poll_interval.as_secs(),
                "requestTimeoutSecs": config.request_timeout.as_secs(),
                "directory": coinport_dir.display().to_string(),
            });
            if json {
                return output::json(&settings);
            }
            let mut table = output::create_table();
            if let Some(map) = settings.as_object() {
                for (key, value) in map {
                    let value = value
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| value.to_string());
                    table.add_row(vec![key.clone(), value]);
                }
            }
            println!("{}", table);
        }
        ConfigCommands::SetApiUrl { url } => {
            config.set_api_url(&url)?;
            config.save(&coinport_dir)?;
            output::success(&format!("API URL set to {}", config.api_url));
        }
    }
    Ok(())
}
