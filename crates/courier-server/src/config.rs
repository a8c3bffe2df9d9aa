use anyhow::{Context, Result};

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Create/upgrade the schema before serving.
    pub migrate: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = get("COURIER_PORT").unwrap_or_else(|| "3000".into());
        let migrate = get("COURIER_MIGRATE").unwrap_or_else(|| "true".into());

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| "courier.db".into()),
            host: get("COURIER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: port
                .parse()
                .with_context(|| format!("COURIER_PORT must be a port number, got '{}'", port))?,
            migrate: parse_flag(&migrate).with_context(|| {
                format!("COURIER_MIGRATE must be true or false, got '{}'", migrate)
            })?,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
