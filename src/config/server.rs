//! Listener, logging and CORS settings.

use std::net::SocketAddr;

use serde::Deserialize;

use super::error::ValidationError;

const DEFAULT_PORT: u16 = 3001;

/// Where the dashboard backend listens and how it logs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_format: LogFormat,

    /// Comma-separated browser origins, or `*`.
    pub cors_origins: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Origins the CORS layer admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    Listed(Vec<String>),
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidAddress(raw))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Parses `cors_origins`; a `*` anywhere in the list admits every origin.
    pub fn allowed_origins(&self) -> AllowedOrigins {
        let listed: Vec<String> = self
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        if listed.iter().any(|origin| origin == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::Listed(listed)
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr().map(|_| ())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            environment: Environment::Development,
            log_level: "info,risk_pulse=debug,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            cors_origins: "http://localhost:8123,http://localhost:3000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_origins(origins: &str) -> ServerConfig {
        ServerConfig {
            cors_origins: origins.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_bind_dashboard_port() {
        let config = ServerConfig::default();

        assert_eq!(config.port, 3001);
        assert!(!config.is_production());
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3001");
    }

    #[test]
    fn loopback_host_resolves() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn hostname_is_rejected() {
        let config = ServerConfig {
            host: "dashboard.internal".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAddress(addr)) if addr == "dashboard.internal:3001"
        ));
    }

    #[test]
    fn zero_port_is_rejected() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn origins_are_trimmed() {
        assert_eq!(
            with_origins(" http://localhost:5173 ,,http://localhost:3000").allowed_origins(),
            AllowedOrigins::Listed(vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ])
        );
    }

    #[test]
    fn wildcard_admits_any_origin() {
        assert_eq!(with_origins("http://a.test, *").allowed_origins(), AllowedOrigins::Any);
    }
}
