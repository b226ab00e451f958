use crate::{ConfigError, FromEnv, env_or_default, env_parse_or_default};
use std::net::Ipv4Addr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 9000;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on reading a request body
    pub read_timeout: Duration,
    /// Upper bound on producing a response
    pub write_timeout: Duration,
    /// How long a kept-alive connection may wait for its next request
    pub idle_timeout: Duration,
    /// How long in-flight connections get to finish once shutdown starts
    pub shutdown_grace: Duration,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    env_parse_or_default(key, default).map(Duration::from_secs)
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with defaults:
    /// - HOST: 0.0.0.0
    /// - PORT: 9000
    /// - READ_TIMEOUT_SECS / WRITE_TIMEOUT_SECS / IDLE_TIMEOUT_SECS: 60
    /// - SHUTDOWN_GRACE_SECS: 5
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse_or_default("PORT", DEFAULT_PORT)?;

        Ok(Self {
            host,
            port,
            read_timeout: secs("READ_TIMEOUT_SECS", DEFAULT_CONNECTION_TIMEOUT_SECS)?,
            write_timeout: secs("WRITE_TIMEOUT_SECS", DEFAULT_CONNECTION_TIMEOUT_SECS)?,
            idle_timeout: secs("IDLE_TIMEOUT_SECS", DEFAULT_CONNECTION_TIMEOUT_SECS)?,
            shutdown_grace: secs("SHUTDOWN_GRACE_SECS", DEFAULT_SHUTDOWN_GRACE_SECS)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let timeout = Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECS);
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: DEFAULT_PORT,
            read_timeout: timeout,
            write_timeout: timeout,
            idle_timeout: timeout,
            shutdown_grace: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "HOST",
        "PORT",
        "READ_TIMEOUT_SECS",
        "WRITE_TIMEOUT_SECS",
        "IDLE_TIMEOUT_SECS",
        "SHUTDOWN_GRACE_SECS",
    ];

    #[test]
    fn test_server_config_from_env_with_defaults() {
        temp_env::with_vars(VARS.map(|k| (k, None::<&str>)), || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.port, 9000);
            assert_eq!(config.address(), "0.0.0.0:9000");
            assert_eq!(config.read_timeout, Duration::from_secs(60));
            assert_eq!(config.write_timeout, Duration::from_secs(60));
            assert_eq!(config.idle_timeout, Duration::from_secs(60));
            assert_eq!(config.shutdown_grace, Duration::from_secs(5));
        });
    }

    #[test]
    fn test_server_config_from_env_with_custom_values() {
        temp_env::with_vars(
            [
                ("HOST", Some("127.0.0.1")),
                ("PORT", Some("3000")),
                ("READ_TIMEOUT_SECS", Some("10")),
                ("WRITE_TIMEOUT_SECS", Some("20")),
                ("IDLE_TIMEOUT_SECS", Some("30")),
                ("SHUTDOWN_GRACE_SECS", Some("1")),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.address(), "127.0.0.1:3000");
                assert_eq!(config.read_timeout, Duration::from_secs(10));
                assert_eq!(config.write_timeout, Duration::from_secs(20));
                assert_eq!(config.idle_timeout, Duration::from_secs(30));
                assert_eq!(config.shutdown_grace, Duration::from_secs(1));
            },
        );
    }

    #[test]
    fn test_server_config_from_env_invalid_port() {
        temp_env::with_var("PORT", Some("not_a_number"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_server_config_from_env_port_out_of_range() {
        temp_env::with_var("PORT", Some("99999"), || {
            assert!(ServerConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_server_config_from_env_invalid_timeout() {
        temp_env::with_vars(
            [("PORT", None::<&str>), ("IDLE_TIMEOUT_SECS", Some("-1"))],
            || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("IDLE_TIMEOUT_SECS"));
            },
        );
    }

    #[test]
    fn test_server_config_new_keeps_default_timeouts() {
        let config = ServerConfig::new("localhost".to_string(), 8080);
        assert_eq!(config.address(), "localhost:8080");
        assert_eq!(config.shutdown_grace, Duration::from_secs(5));
    }
}
