/*!
 * BattleBuddy config file
 */

use std::path::PathBuf;

use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub db_config: DbConfig,
    #[serde(default)]
    pub bot_config: BotConfig,
    pub tracing_config: Option<TracingConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AuthConfig {
    /// Authentication token for the discord bot. Falls back to `DISCORD_TOKEN`.
    pub token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct DbConfig {
    /// Path of the SQLite database
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Size of the connection pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    /// Discord command prefix
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Seconds a user has to wait between two picks
    #[serde(default = "default_cooldown")]
    pub cooldown: u64,

    /// Roster file. The roster bundled with the bot is used when unset.
    pub roster: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TracingConfig {
    /// Jaeger agent endpoint, as `host:port`
    pub jaeger: Option<String>,
}

fn default_database_url() -> String {
    "battlebuddy.db".to_owned()
}

fn default_max_connections() -> u32 {
    4
}

fn default_command_prefix() -> String {
    "!".to_owned()
}

fn default_cooldown() -> u64 {
    5
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig { database_url: default_database_url(), max_connections: default_max_connections() }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig { command_prefix: default_command_prefix(), cooldown: default_cooldown(), roster: None }
    }
}

impl Config {
    /// Token from the config file, or from the environment.
    pub fn token(&self) -> Option<String> {
        self.auth
            .token
            .clone()
            .or_else(|| std::env::var("DISCORD_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
    }
}

pub fn load_config(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
}
