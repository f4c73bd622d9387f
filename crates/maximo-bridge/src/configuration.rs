use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Upstream Maximo connection settings. Both fields are required.
#[derive(Debug, Deserialize)]
pub struct MaximoSettings {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub maximo: MaximoSettings,
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("manifest_path", default_manifest_path())?
            .add_source(
                Environment::with_prefix("BRIDGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        // Surface missing required settings as the env var the operator
        // needs to set, not the internal field path
        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches("`");
                    let env_var = to_env_var(field);
                    Err(ConfigError::MissingEnvVar { env_var })
                } else if let config::ConfigError::NotFound(field) = &err {
                    let env_var = to_env_var(field);
                    Err(ConfigError::MissingEnvVar { env_var })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_manifest_path() -> String {
    "manifest.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("BRIDGE_") {
                env::remove_var(&key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();

        env::set_var("BRIDGE_MAXIMO__BASE_URL", "https://maximo.example.com/api");
        env::set_var("BRIDGE_MAXIMO__API_KEY", "test-key");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 5001);
        assert_eq!(settings.manifest_path, "manifest.json");
        assert_eq!(settings.maximo.base_url, "https://maximo.example.com/api");
        assert_eq!(settings.maximo.api_key, "test-key");

        env::remove_var("BRIDGE_MAXIMO__BASE_URL");
        env::remove_var("BRIDGE_MAXIMO__API_KEY");
    }

    #[test]
    #[serial]
    fn test_missing_api_key_names_env_var() {
        clean_env();

        env::set_var("BRIDGE_MAXIMO__BASE_URL", "https://maximo.example.com/api");

        let err = Settings::new().unwrap_err();
        match err {
            ConfigError::MissingEnvVar { env_var } => {
                assert!(env_var.starts_with("BRIDGE_MAXIMO"));
            }
            other => panic!("Expected MissingEnvVar, got {:?}", other),
        }

        env::remove_var("BRIDGE_MAXIMO__BASE_URL");
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        clean_env();

        env::set_var("BRIDGE_SERVER__PORT", "8080");
        env::set_var("BRIDGE_MAXIMO__BASE_URL", "https://maximo.example.com/api");
        env::set_var("BRIDGE_MAXIMO__API_KEY", "test-key");
        env::set_var("BRIDGE_MANIFEST_PATH", "/etc/bridge/manifest.json");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.manifest_path, "/etc/bridge/manifest.json");

        env::remove_var("BRIDGE_SERVER__PORT");
        env::remove_var("BRIDGE_MAXIMO__BASE_URL");
        env::remove_var("BRIDGE_MAXIMO__API_KEY");
        env::remove_var("BRIDGE_MANIFEST_PATH");
    }

    #[test]
    fn test_socket_addr_conversion() {
        let server_settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 5001,
        };
        let addr = server_settings.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:5001");
    }
}
