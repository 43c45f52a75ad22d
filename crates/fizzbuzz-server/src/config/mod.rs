//! Server config loader (strict parsing).

pub mod schema;

use std::fs;

use fizzbuzz_core::error::{FizzBuzzError, Result};

pub use schema::{AppConfig, GeneratorSection, ServerSection};

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| FizzBuzzError::Config(format!("read {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| FizzBuzzError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the effective config: file (or defaults when no path is given),
/// then the listen override, then validation.
pub fn load(path: Option<&str>, listen_override: Option<String>) -> Result<AppConfig> {
    let mut cfg = match path {
        Some(p) => load_from_file(p)?,
        None => AppConfig::default(),
    };
    if let Some(listen) = listen_override {
        tracing::debug!(%listen, "listen address overridden from environment");
        cfg.server.listen = listen;
    }
    cfg.validate()?;
    Ok(cfg)
}
