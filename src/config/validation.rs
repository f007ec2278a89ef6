//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, addresses parse)
//! - Detect incomplete TLS settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FaucetConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::FaucetConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a loaded configuration.
pub fn validate_config(config: &FaucetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() != tls.key_path.is_empty() {
            errors.push(ValidationError::new(
                "listener.tls",
                "cert_path and key_path are both required",
            ));
        }
    }

    if let Err(e) = url::Url::parse(&config.rpc.endpoint()) {
        errors.push(ValidationError::new(
            "rpc.host",
            format!("'{}' does not form a valid URL: {}", config.rpc.endpoint(), e),
        ));
    }
    if config.rpc.timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.timeout_secs", "must be greater than 0"));
    }

    if config.faucet.funding_address.trim().is_empty() {
        errors.push(ValidationError::new("faucet.funding_address", "is required"));
    }
    if !(config.faucet.amount > 0.0) {
        errors.push(ValidationError::new("faucet.amount", "must be greater than 0"));
    }
    if config.faucet.poll_interval_ms == 0 {
        errors.push(ValidationError::new("faucet.poll_interval_ms", "must be greater than 0"));
    }
    if config.faucet.poll_attempts == 0 {
        errors.push(ValidationError::new("faucet.poll_attempts", "must be greater than 0"));
    }

    if config.throttle.cooldown_secs == 0 {
        errors.push(ValidationError::new("throttle.cooldown_secs", "must be greater than 0"));
    }
    if config.throttle.sweep_interval_secs == 0 {
        errors.push(ValidationError::new("throttle.sweep_interval_secs", "must be greater than 0"));
    }

    if config.chain_info.refresh_secs == 0 {
        errors.push(ValidationError::new("chain_info.refresh_secs", "must be greater than 0"));
    }

    let poll_ceiling_secs =
        config.faucet.poll_interval_ms.saturating_mul(config.faucet.poll_attempts as u64) / 1000;
    if config.http.request_timeout_secs <= poll_ceiling_secs {
        errors.push(ValidationError::new(
            "http.request_timeout_secs",
            format!("must exceed the poll ceiling of {}s", poll_ceiling_secs),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    fn valid_config() -> FaucetConfig {
        let mut config = FaucetConfig::default();
        config.faucet.funding_address = "ztestsapling1funding".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_funding_address() {
        let config = FaucetConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "faucet.funding_address"));
    }

    #[test]
    fn test_half_configured_tls() {
        let mut config = valid_config();
        config.listener.tls = Some(TlsConfig {
            cert_path: "cert.pem".to_string(),
            key_path: String::new(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "listener.tls");
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FaucetConfig::default();
        config.faucet.amount = 0.0;
        config.faucet.poll_attempts = 0;
        config.throttle.cooldown_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 4);
    }

    #[test]
    fn test_request_timeout_must_cover_polling() {
        let mut config = valid_config();
        config.http.request_timeout_secs = 60;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "http.request_timeout_secs");
    }
}
