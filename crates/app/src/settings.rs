//! Handles settings for the application.
//!
//! Settings are layered: an optional TOML file (`settings.toml` by default),
//! then `VASOOL_*` environment variables, then command line flags.
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_SETTINGS_PATH: &str = "settings";
const DEFAULT_SQLITE_PATH: &str = "vasool.db";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite(DEFAULT_SQLITE_PATH.to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub database: Database,
    /// Id of the member acting on the command line.
    pub member: Option<String>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_SETTINGS_PATH)).required(false))
            .add_source(Environment::with_prefix("VASOOL").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
