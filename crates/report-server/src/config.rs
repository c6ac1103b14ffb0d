//! Configuration for the HTTP service

use report_utils::{EnvError, env_string, env_var};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ServerError;

/// Where the server listens and how it exposes charts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Directory of `*.html` files replacing the built-in pages
    pub template_dir: Option<PathBuf>,

    /// URL prefix charts are served under
    pub static_url_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            template_dir: None,
            static_url_prefix: "/static".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public URL of a file in the chart directory
    pub fn static_url(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.static_url_prefix.trim_end_matches('/'))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.host.trim().is_empty() {
            return Err(ServerError::ConfigError("host must not be empty".to_string()));
        }

        let prefix = self.static_url_prefix.trim_end_matches('/');
        if !prefix.starts_with('/') || prefix.len() < 2 {
            return Err(ServerError::ConfigError(format!(
                "static_url_prefix must be a path like /static, got '{}'",
                self.static_url_prefix
            )));
        }

        Ok(())
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    template_dir: Option<PathBuf>,
    static_url_prefix: Option<String>,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    pub fn static_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.static_url_prefix = Some(prefix.into());
        self
    }

    /// Read `REPORT_HOST`, `PORT`, `REPORT_TEMPLATE_DIR` and
    /// `REPORT_STATIC_URL` when they are set
    pub fn with_env(mut self) -> Result<Self, ServerError> {
        if let Some(host) = env_string("REPORT_HOST") {
            self.host = Some(host);
        }
        if let Some(port) = env_var("PORT").map_err(config_error)? {
            self.port = Some(port);
        }
        if let Some(dir) = env_string("REPORT_TEMPLATE_DIR") {
            self.template_dir = Some(PathBuf::from(dir));
        }
        if let Some(prefix) = env_string("REPORT_STATIC_URL") {
            self.static_url_prefix = Some(prefix);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ServerError> {
        let defaults = ServerConfig::default();

        let config = ServerConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            template_dir: self.template_dir.or(defaults.template_dir),
            static_url_prefix: self.static_url_prefix.unwrap_or(defaults.static_url_prefix),
        };

        config.validate()?;
        Ok(config)
    }
}

fn config_error(e: EnvError) -> ServerError {
    ServerError::ConfigError(e.to_string())
}
