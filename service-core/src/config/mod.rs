//! Common configuration shared by the invoicing workspace.
//!
//! Settings come from an optional `configuration` file plus `APP__`-prefixed
//! environment variables; service-specific settings (store backend, SMTP)
//! layer on top in the service's own config module.

use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings every service in the workspace needs.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// HTTP listen port. `0` picks a random free port, which the
    /// integration tests rely on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
