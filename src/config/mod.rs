//! Runtime settings read from the process environment.
//!
//! Variables use the `RISK_PULSE` prefix with `__` between path segments,
//! so `RISK_PULSE__SERVER__PORT=8080` sets `server.port`. A `.env` file in
//! the working directory is read first when present. Every field has a
//! default; an empty environment gives a development server on port 3001
//! signing with [`DEMO_JWT_SECRET`].

mod auth;
mod error;
mod server;

pub use auth::{AuthConfig, DEMO_JWT_SECRET};
pub use error::{ConfigError, ValidationError};
pub use server::{AllowedOrigins, Environment, LogFormat, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "RISK_PULSE";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Reads `.env` (if any) and the prefixed environment.
    ///
    /// Fails only when a value cannot be converted to its field's type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let source = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__");
        let loaded = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(loaded)
    }

    /// Rejects settings the server cannot start with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate(&self.server.environment)
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
