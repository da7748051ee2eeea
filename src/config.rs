use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            host: std::env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string())
                .trim()
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            model_path: artifact_path("MODEL_PATH", "artifacts/model.json")?,
            scaler_path: artifact_path("SCALER_PATH", "artifacts/scaler.json")?,
            rate_limit_per_second: std::env::var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a positive number"))
                .and_then(|n: u64| {
                    if n == 0 {
                        anyhow::bail!("RATE_LIMIT_PER_SECOND cannot be zero");
                    }
                    Ok(n)
                })?,
            rate_limit_burst: std::env::var("RATE_LIMIT_BURST")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_BURST must be a positive number"))
                .and_then(|n: u32| {
                    if n == 0 {
                        anyhow::bail!("RATE_LIMIT_BURST cannot be zero");
                    }
                    Ok(n)
                })?,
        };

        if config.host.is_empty() {
            anyhow::bail!("HOST cannot be empty");
        }

        tracing::debug!("Bind address: {}:{}", config.host, config.port);
        tracing::debug!("Model path: {}", config.model_path.display());
        tracing::debug!("Scaler path: {}", config.scaler_path.display());
        tracing::debug!(
            "Rate limit: {}/s, burst {}",
            config.rate_limit_per_second,
            config.rate_limit_burst
        );

        Ok(config)
    }

    /// `host:port` the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn artifact_path(var: &str, default: &str) -> anyhow::Result<PathBuf> {
    let path = std::env::var(var).unwrap_or_else(|_| default.to_string());
    if path.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", var);
    }
    Ok(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_artifact_path_is_rejected() {
        // Unique variable name so parallel tests don't race on it.
        std::env::set_var("LOAN_TEST_BLANK_PATH", "   ");
        let err = artifact_path("LOAN_TEST_BLANK_PATH", "artifacts/model.json").unwrap_err();
        assert_eq!(err.to_string(), "LOAN_TEST_BLANK_PATH cannot be empty");
    }

    #[test]
    fn unset_artifact_path_uses_default() {
        let path = artifact_path("LOAN_TEST_UNSET_PATH", "artifacts/model.json").unwrap();
        assert_eq!(path, PathBuf::from("artifacts/model.json"));
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 5000,
            model_path: PathBuf::from("m.json"),
            scaler_path: PathBuf::from("s.json"),
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
    }
}
