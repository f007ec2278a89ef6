//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{FaucetConfig, TlsConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Prefix of all environment overrides.
pub const ENV_PREFIX: &str = "FAUCET_";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { name: String, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { name, message } => write!(f, "Invalid {}: {}", name, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply `FAUCET_*`
/// environment overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<FaucetConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => FaucetConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` receives the full variable name, e.g. `FAUCET_RPC_PORT`.
pub fn apply_env_overrides<F>(config: &mut FaucetConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| {
        lookup(&format!("{}{}", ENV_PREFIX, suffix)).filter(|v| !v.is_empty())
    };

    if let Some(v) = var("LISTEN_ADDRESS") {
        config.listener.bind_address = v;
    }
    if let Some(v) = var("FUNDING_ADDRESS") {
        config.faucet.funding_address = v;
    }
    if let Some(v) = var("RPC_HOST") {
        config.rpc.host = v;
    }
    if let Some(v) = var("RPC_PORT") {
        config.rpc.port = v.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
            name: format!("{}RPC_PORT", ENV_PREFIX),
            message: e.to_string(),
        })?;
    }
    if let Some(v) = var("RPC_USER") {
        config.rpc.user = v;
    }
    if let Some(v) = var("RPC_PASSWORD") {
        config.rpc.password = v;
    }

    let cert = var("TLS_CERT_FILE");
    let key = var("TLS_KEY_FILE");
    if cert.is_some() || key.is_some() {
        let tls = config.listener.tls.get_or_insert_with(TlsConfig::default);
        if let Some(cert) = cert {
            tls.cert_path = cert;
        }
        if let Some(key) = key {
            tls.key_path = key;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = FaucetConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("FAUCET_FUNDING_ADDRESS", "tmFunding"),
                ("FAUCET_RPC_PORT", "8232"),
                ("FAUCET_RPC_USER", "zcash"),
                ("FAUCET_TLS_CERT_FILE", "/etc/cert.pem"),
            ]),
        )
        .unwrap();

        assert_eq!(config.faucet.funding_address, "tmFunding");
        assert_eq!(config.rpc.port, 8232);
        assert_eq!(config.rpc.user, "zcash");
        let tls = config.listener.tls.unwrap();
        assert_eq!(tls.cert_path, "/etc/cert.pem");
        assert!(tls.key_path.is_empty());
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = FaucetConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("FAUCET_RPC_PORT", "nope")]))
            .unwrap_err();
        assert!(err.to_string().contains("FAUCET_RPC_PORT"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("testnet_faucet_load_test.toml");
        std::fs::write(
            &path,
            "[faucet]\nfunding_address = \"ztestsapling1funding\"\namount = 0.5\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.faucet.amount, 0.5);

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
