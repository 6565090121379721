//! Process configuration
//!
//! Every value has a default, so an empty environment yields the fixed
//! contract: listen on `0.0.0.0:8080`, no execution timeout.

use std::env;
use std::time::Duration;

/// Default TCP port the listener binds to
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind host (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone)]
pub struct Config {
    // Server Configuration
    pub host: String,
    pub port: u16,

    // Execution Configuration
    pub exec_timeout: u64, // Seconds before the child is killed (0 = wait forever)
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any `CMDINJECT_*` variable source.
    /// Values are trimmed, empty values count as unset and unparseable
    /// numbers fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("CMDINJECT_{}", name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),

            exec_timeout: var("EXEC_TIMEOUT")
                .and_then(|t| t.parse().ok())
                .unwrap_or(0), // Default: run to completion
        }
    }

    /// Address string handed to the listener, e.g. `0.0.0.0:8080`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Execution timeout, if one is configured
    pub fn exec_timeout(&self) -> Option<Duration> {
        (self.exec_timeout > 0).then_some(Duration::from_secs(self.exec_timeout))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            exec_timeout: 0,
        }
    }
}
