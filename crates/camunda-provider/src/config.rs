//! Provider configuration resolution
//!
//! Turns the host's three-valued configuration into a concrete
//! [`ProviderConfig`], applying the environment fallbacks and the TLS
//! key pair policy.

use crate::error::{Diagnostic, ProviderError, Result};
use crate::value::ConfigValue;
use camunda_client::{ClientOptions, KeyPairPem, TlsOptions, TransportOptions};

pub const ENV_ENDPOINT: &str = "CAMUNDA_ENDPOINT";
pub const ENV_USERNAME: &str = "CAMUNDA_USERNAME";
pub const ENV_PASSWORD: &str = "CAMUNDA_PASSWORD";

const CLIENT_SUMMARY: &str = "Unable to create client";

/// Provider configuration block as the host hands it over
#[derive(Debug, Clone, Default)]
pub struct ProviderConfigInput {
    pub endpoint: ConfigValue<String>,
    pub username: ConfigValue<String>,
    pub password: ConfigValue<String>,
    pub insecure_skip_verify: ConfigValue<bool>,
    pub tls_certificate: ConfigValue<String>,
    pub tls_key: ConfigValue<String>,
    pub tls_ca: ConfigValue<String>,
}

impl ProviderConfigInput {
    pub fn new(endpoint: impl Into<ConfigValue<String>>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<ConfigValue<String>>,
        password: impl Into<ConfigValue<String>>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_insecure_skip_verify(mut self, skip: impl Into<ConfigValue<bool>>) -> Self {
        self.insecure_skip_verify = skip.into();
        self
    }

    pub fn with_client_certificate(
        mut self,
        certificate: impl Into<ConfigValue<String>>,
        key: impl Into<ConfigValue<String>>,
    ) -> Self {
        self.tls_certificate = certificate.into();
        self.tls_key = key.into();
        self
    }

    pub fn with_ca(mut self, ca: impl Into<ConfigValue<String>>) -> Self {
        self.tls_ca = ca.into();
        self
    }
}

/// Fully resolved provider configuration
#[derive(Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub tls: TlsOptions,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tls", &self.tls)
            .finish()
    }
}

impl ProviderConfig {
    /// Client options with the default transport settings and this TLS setup
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::new(self.endpoint.clone())
            .with_credentials(self.username.clone(), self.password.clone())
            .with_transport(TransportOptions::default().with_tls(self.tls.clone()))
    }
}

/// Outcome of a resolution that did not fail outright
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Configuration is complete
    Resolved(ProviderConfig),

    /// Configuration cannot be completed yet; the provider stays unconfigured
    Deferred(Diagnostic),
}

/// Resolve against the process environment
pub fn resolve(input: &ProviderConfigInput) -> Result<Resolution> {
    resolve_with(input, |name| std::env::var(name).ok())
}

/// Resolve with a custom environment lookup
pub fn resolve_with<F>(input: &ProviderConfigInput, env: F) -> Result<Resolution>
where
    F: Fn(&str) -> Option<String>,
{
    let username = match &input.username {
        ConfigValue::Unknown => {
            tracing::warn!("Provider username is unknown, skipping client configuration");
            return Ok(Resolution::Deferred(Diagnostic::warning(
                CLIENT_SUMMARY,
                "Cannot use unknown value as username",
            )));
        }
        ConfigValue::Null => env(ENV_USERNAME).unwrap_or_default(),
        ConfigValue::Known(v) => v.clone(),
    };

    let password = match &input.password {
        ConfigValue::Unknown => {
            return Err(ProviderError::configuration(
                CLIENT_SUMMARY,
                "Cannot use unknown value as password",
            ));
        }
        ConfigValue::Null => env(ENV_PASSWORD).unwrap_or_default(),
        ConfigValue::Known(v) => v.clone(),
    };

    let endpoint = match &input.endpoint {
        ConfigValue::Unknown => {
            return Err(ProviderError::configuration(
                CLIENT_SUMMARY,
                "Cannot use unknown value as endpoint",
            ));
        }
        ConfigValue::Null => env(ENV_ENDPOINT).unwrap_or_default(),
        ConfigValue::Known(v) => v.clone(),
    };

    if endpoint.is_empty() {
        return Err(ProviderError::configuration(
            "Unable to find Endpoint",
            "Endpoint cannot be an empty string",
        ));
    }

    Ok(Resolution::Resolved(ProviderConfig {
        endpoint,
        username,
        password,
        tls: resolve_tls(input),
    }))
}

/// Only concrete values take part; a certificate without its key (or the
/// other way round) configures no client certificate at all.
fn resolve_tls(input: &ProviderConfigInput) -> TlsOptions {
    let client_key_pair = match (input.tls_certificate.known(), input.tls_key.known()) {
        (Some(certificate), Some(key)) => Some(KeyPairPem {
            certificate: certificate.clone(),
            key: key.clone(),
        }),
        (None, None) => None,
        _ => {
            tracing::warn!(
                "Only one of tls_certificate and tls_key is set, no client certificate configured"
            );
            None
        }
    };

    TlsOptions {
        insecure_skip_verify: input.insecure_skip_verify.known().copied().unwrap_or(false),
        client_key_pair,
        ca_bundle: input.tls_ca.known().cloned(),
    }
}
