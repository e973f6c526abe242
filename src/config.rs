use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse().context("PORT must be a port number")?,
            Err(_) => 3000,
        };
        Ok(Self { host, port })
    }

    pub fn local() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}
