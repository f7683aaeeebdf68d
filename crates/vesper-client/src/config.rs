//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so a session can start with zero
//! configuration.

use vesper_shared::constants::{DEFAULT_RSA_BITS, MAX_RSA_BITS, MIN_RSA_BITS};
use vesper_store::RequestPolicy;

/// Default log filter, used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "vesper_client=debug,vesper_store=info,vesper_shared=info,warn";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// RSA modulus size for newly generated session keys.
    /// Env: `VESPER_RSA_BITS`
    /// Default: `2048`. Values outside 2048..=4096 are clamped to that range.
    pub rsa_bits: usize,

    /// Friend-request lifecycle policy.
    /// Env: `VESPER_ALLOW_REREQUEST` (true/false)
    /// Default: re-requesting after a rejection is allowed.
    pub request_policy: RequestPolicy,

    /// Log filter directive when `RUST_LOG` is unset.
    /// Env: `VESPER_LOG`
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rsa_bits: DEFAULT_RSA_BITS,
            request_policy: RequestPolicy::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = get("VESPER_RSA_BITS") {
            match val.trim().parse::<usize>() {
                Ok(bits) if bits < MIN_RSA_BITS => {
                    tracing::warn!(
                        requested = bits,
                        minimum = MIN_RSA_BITS,
                        "VESPER_RSA_BITS below minimum, using minimum"
                    );
                    config.rsa_bits = MIN_RSA_BITS;
                }
                Ok(bits) if bits > MAX_RSA_BITS => {
                    tracing::warn!(
                        requested = bits,
                        maximum = MAX_RSA_BITS,
                        "VESPER_RSA_BITS above maximum, using maximum"
                    );
                    config.rsa_bits = MAX_RSA_BITS;
                }
                Ok(bits) => config.rsa_bits = bits,
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid VESPER_RSA_BITS, using default");
                }
            }
        }

        if let Some(val) = get("VESPER_ALLOW_REREQUEST") {
            config.request_policy.allow_rerequest = val != "false" && val != "0";
        }

        if let Some(filter) = get("VESPER_LOG") {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }

        config
    }
}
