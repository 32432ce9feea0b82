//! Configuration types.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConfigError;

const DEFAULT_DB_PATH: &str = "./data/onboarding.db";
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Path to the libSQL database holding progress records.
    pub db_path: PathBuf,
    /// Address the HTTP server binds to.
    pub bind_addr: IpAddr,
    /// Port the HTTP server listens on.
    pub http_port: u16,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

impl OnboardingConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Unset keys fall back to
    /// defaults; set-but-unparseable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_path = lookup("ONBOARDING_DB_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let http_port = match lookup("ONBOARDING_HTTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "ONBOARDING_HTTP_PORT".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.http_port,
        };

        let bind_addr = match lookup("ONBOARDING_BIND_ADDR") {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|e| ConfigError::InvalidValue {
                key: "ONBOARDING_BIND_ADDR".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.bind_addr,
        };

        Ok(Self {
            db_path,
            bind_addr,
            http_port,
        })
    }

    /// Socket address for the HTTP listener.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = OnboardingConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn reads_overrides() {
        let config = OnboardingConfig::from_lookup(lookup_from(&[
            ("ONBOARDING_DB_PATH", "/tmp/x.db"),
            ("ONBOARDING_HTTP_PORT", "9191"),
            ("ONBOARDING_BIND_ADDR", "127.0.0.1"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9191");
    }

    #[test]
    fn rejects_bad_port() {
        let err = OnboardingConfig::from_lookup(lookup_from(&[("ONBOARDING_HTTP_PORT", "eighty")]))
            .unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "ONBOARDING_HTTP_PORT"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_db_path_uses_default() {
        let config =
            OnboardingConfig::from_lookup(lookup_from(&[("ONBOARDING_DB_PATH", "  ")])).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }
}
