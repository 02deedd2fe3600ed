//! Startup configuration read from the environment

use std::env;
use std::fmt;

use anyhow::{Context, bail};
use clinic::DEFAULT_PREDICTION_URL;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PORT: &str = "5432";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://172.26.0.1:3000";

pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub prediction_url: String,
    pub frontend_origins: Vec<String>,
}

impl AppConfig {
    /// Read every setting once. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = non_empty("JWT_SECRET").context("JWT_SECRET must be set")?;

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let frontend_origins = parse_origins(
            &non_empty("FRONTEND_ORIGINS").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string()),
        )?;

        Ok(Self {
            database_url: database_url()?,
            jwt_secret,
            port,
            prediction_url: non_empty("PREDICTION_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_PREDICTION_URL.to_string()),
            frontend_origins,
        })
    }
}

/// `DATABASE_URL`, or one assembled from the `DB_*` parts.
fn database_url() -> anyhow::Result<String> {
    if let Some(url) = non_empty("DATABASE_URL") {
        return Ok(url);
    }

    let (Some(host), Some(user), Some(name)) =
        (non_empty("DB_HOST"), non_empty("DB_USER"), non_empty("DB_NAME"))
    else {
        bail!("DATABASE_URL or DB_HOST, DB_USER and DB_NAME must be set");
    };
    let port = non_empty("DB_PORT").unwrap_or_else(|| DEFAULT_DB_PORT.to_string());
    let password = non_empty("DB_PASSWORD").unwrap_or_default();

    Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}

/// Comma-separated origin list. Credentialed CORS needs explicit origins,
/// so `*` is refused.
fn parse_origins(raw: &str) -> anyhow::Result<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.iter().any(|origin| origin == "*") {
        bail!("FRONTEND_ORIGINS must list explicit origins, not \"*\"");
    }
    if origins.is_empty() {
        bail!("FRONTEND_ORIGINS must list at least one origin");
    }
    Ok(origins)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("port", &self.port)
            .field("prediction_url", &self.prediction_url)
            .field("frontend_origins", &self.frontend_origins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origins_are_trimmed() {
        let origins = parse_origins(" http://localhost:3000 ,,http://172.26.0.1:3000").unwrap();
        assert_eq!(origins, vec!["http://localhost:3000", "http://172.26.0.1:3000"]);
    }

    #[test]
    fn test_wildcard_origin_is_refused() {
        let err = parse_origins("http://localhost:3000,*").unwrap_err();
        assert!(err.to_string().contains("explicit origins"));
        assert!(parse_origins(" , ").is_err());
    }
}
