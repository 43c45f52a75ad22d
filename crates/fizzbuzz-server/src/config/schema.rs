use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use fizzbuzz_core::error::{FizzBuzzError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub generator: GeneratorSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            generator: GeneratorSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FizzBuzzError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.generator.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Upper bound for handling one request; expired requests get 408.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Time a client gets to send a complete request head.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Keep-alive connections with no request in flight are closed after this.
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// How long in-flight requests may run after a shutdown signal.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            request_timeout_ms: default_request_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(100..=600_000).contains(&self.request_timeout_ms) {
            return Err(FizzBuzzError::Config(
                "server.request_timeout_ms must be between 100 and 600000".into(),
            ));
        }
        if !(100..=600_000).contains(&self.read_timeout_ms) {
            return Err(FizzBuzzError::Config(
                "server.read_timeout_ms must be between 100 and 600000".into(),
            ));
        }
        if !(100..=3_600_000).contains(&self.idle_timeout_ms) {
            return Err(FizzBuzzError::Config(
                "server.idle_timeout_ms must be between 100 and 3600000".into(),
            ));
        }
        if self.shutdown_grace_ms > 300_000 {
            return Err(FizzBuzzError::Config(
                "server.shutdown_grace_ms must be at most 300000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            FizzBuzzError::Config(format!("server.listen {:?} is not a socket address: {e}", self.listen))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_read_timeout_ms() -> u64 {
    5_000
}
fn default_idle_timeout_ms() -> u64 {
    120_000
}
fn default_shutdown_grace_ms() -> u64 {
    15_000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSection {
    /// Largest accepted `limit`. An explicit `null` removes the cap.
    #[serde(default = "default_max_limit")]
    pub max_limit: Option<i64>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
        }
    }
}

fn default_max_limit() -> Option<i64> {
    Some(1_000_000)
}

impl GeneratorSection {
    pub fn validate(&self) -> Result<()> {
        if matches!(self.max_limit, Some(n) if n <= 0) {
            return Err(FizzBuzzError::Config(
                "generator.max_limit must be positive".into(),
            ));
        }
        Ok(())
    }
}
