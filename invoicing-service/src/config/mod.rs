use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct InvoicingConfig {
    pub common: core_config::Config,
    pub store: StoreConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

impl InvoicingConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env and the APP__ prefix.
        let common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("postgres"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let database_url = if backend == StoreBackend::Postgres {
            Some(get_env("DATABASE_URL", None, is_prod)?)
        } else {
            env::var("DATABASE_URL").ok()
        };

        let smtp_enabled = get_env("SMTP_ENABLED", Some("false"), is_prod)? == "true";
        let smtp = SmtpConfig {
            enabled: smtp_enabled,
            host: get_env("SMTP_HOST", Some("localhost"), is_prod)?,
            port: get_env("SMTP_PORT", Some("587"), is_prod)?
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("Invalid SMTP_PORT: {}", e))
                })?,
            user: get_env("SMTP_USER", Some(""), is_prod)?,
            password: get_env("SMTP_PASSWORD", Some(""), is_prod)?,
            from_email: get_env("SMTP_FROM_EMAIL", Some("invoices@localhost"), is_prod)?,
            from_name: get_env("SMTP_FROM_NAME", Some("Invoicing"), is_prod)?,
        };

        Ok(InvoicingConfig {
            common,
            store: StoreConfig {
                backend,
                database_url,
            },
            smtp,
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}
