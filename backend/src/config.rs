use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{env, str::FromStr, time::Duration};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// What to do when a request names a player id with no live game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPlayerPolicy {
    /// Answer 404
    #[default]
    Reject,
    /// Start a new game with a fresh player id
    Create,
}

impl FromStr for UnknownPlayerPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "create" => Ok(Self::Create),
            other => bail!("unknown player policy '{}' (expected 'reject' or 'create')", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub unknown_player_policy: UnknownPlayerPolicy,
    pub max_player_name_length: usize,
    /// Sessions idle for longer than this are swept; `None` keeps them forever
    pub session_idle_timeout: Option<Duration>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            unknown_player_policy: UnknownPlayerPolicy::Reject,
            max_player_name_length: 32,
            session_idle_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let server = ServerConfig {
            host: lookup("HOST").unwrap_or(defaults.server.host),
            port: match lookup("PORT") {
                Some(port) => port.parse().context("PORT must be a number")?,
                None => defaults.server.port,
            },
        };

        let game = GameConfig {
            unknown_player_policy: match lookup("UNKNOWN_PLAYER_POLICY") {
                Some(policy) => policy.parse()?,
                None => defaults.game.unknown_player_policy,
            },
            max_player_name_length: match lookup("MAX_PLAYER_NAME_LENGTH") {
                Some(len) => len
                    .parse()
                    .context("MAX_PLAYER_NAME_LENGTH must be a number")?,
                None => defaults.game.max_player_name_length,
            },
            session_idle_timeout: match lookup("SESSION_IDLE_TIMEOUT_SECS") {
                Some(secs) => Some(Duration::from_secs(
                    secs.parse()
                        .context("SESSION_IDLE_TIMEOUT_SECS must be a number of seconds")?,
                )),
                None => defaults.game.session_idle_timeout,
            },
        };

        Ok(Config { server, game })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
