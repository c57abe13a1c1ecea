//! Settings for the service, read from an optional TOML file and
//! `KICKABOUT__*` environment variables (e.g. `KICKABOUT__SERVER__PORT=8080`).

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings.toml";

#[derive(Debug, Parser)]
#[command(name = "kickabout", disable_version_flag = true)]
struct Args {
    /// Config file path (TOML). Missing files are ignored.
    #[arg(long, env = "KICKABOUT_CONFIG")]
    config: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite:./kickabout.db?mode=rwc".to_string(),
            max_connections: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Sweeper {
    pub interval_secs: u64,
}

impl Default for Sweeper {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

#[derive(Debug, Deserialize)]
pub struct Payments {
    pub secret_key: String,
    #[serde(default = "default_stripe_base")]
    pub api_base: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_stripe_base() -> String {
    server::STRIPE_API_BASE.to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Notifications {
    pub endpoint: String,
    pub queue_size: usize,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            endpoint: server::EXPO_PUSH_ENDPOINT.to_string(),
            queue_size: 256,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
    pub sweeper: Sweeper,
    pub payments: Option<Payments>,
    pub notifications: Option<Notifications>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("KICKABOUT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
