//! HTTP transport construction
//!
//! Builds the pooled `reqwest::Client` every API call goes through, including
//! the TLS material (client key pair, CA bundle, skip-verify).

use crate::error::{ClientError, Result};
use std::time::Duration;

/// Ceiling applied to every request, connect included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30);
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
pub const POOL_MAX_IDLE_PER_HOST: usize = 100;

/// PEM encoded client certificate and its private key
#[derive(Clone)]
pub struct KeyPairPem {
    pub certificate: String,
    pub key: String,
}

impl std::fmt::Debug for KeyPairPem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairPem")
            .field("certificate", &format_args!("{} bytes", self.certificate.len()))
            .field("key", &"<redacted>")
            .finish()
    }
}

/// TLS settings as handed over by the configuration layer
#[derive(Debug, Clone, Default)]
pub struct TlsOptions {
    /// Disable server certificate verification
    pub insecure_skip_verify: bool,

    /// Client certificate presented for mutual TLS
    pub client_key_pair: Option<KeyPairPem>,

    /// PEM bundle of CAs for client certificate verification. It never
    /// changes how the server certificate is verified.
    pub ca_bundle: Option<String>,
}

/// Connection settings for the shared transport
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub tcp_keepalive: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub tls: TlsOptions,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: REQUEST_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
            tcp_keepalive: TCP_KEEPALIVE,
            pool_idle_timeout: POOL_IDLE_TIMEOUT,
            pool_max_idle_per_host: POOL_MAX_IDLE_PER_HOST,
            tls: TlsOptions::default(),
        }
    }
}

impl TransportOptions {
    pub fn with_tls(mut self, tls: TlsOptions) -> Self {
        self.tls = tls;
        self
    }
}

/// Render an error with every cause in its source chain, e.g.
/// `builder error: unexpected error: private key or certificate not found`
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Parse a certificate/key pair into a client identity.
///
/// The parser's message is kept as-is so it can be shown to the user.
pub fn parse_identity(pair: &KeyPairPem) -> Result<reqwest::Identity> {
    let mut pem = String::with_capacity(pair.certificate.len() + pair.key.len() + 1);
    pem.push_str(pair.key.trim_end());
    pem.push('\n');
    pem.push_str(pair.certificate.trim_end());
    pem.push('\n');

    reqwest::Identity::from_pem(pem.as_bytes()).map_err(|e| ClientError::Tls(error_chain(&e)))
}

/// Parse a PEM bundle into trusted certificates. A bundle without a single
/// certificate in it is rejected.
pub fn parse_ca_bundle(bundle: &str) -> Result<Vec<reqwest::Certificate>> {
    let certs = reqwest::Certificate::from_pem_bundle(bundle.as_bytes())
        .map_err(|e| ClientError::CaBundle(e.to_string()))?;

    if certs.is_empty() {
        return Err(ClientError::CaBundle(
            "no PEM encoded certificate found in CA bundle".to_string(),
        ));
    }
    Ok(certs)
}

/// Build the pooled HTTP client
pub fn build_http_client(options: &TransportOptions) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(options.timeout)
        .connect_timeout(options.connect_timeout)
        .tcp_keepalive(options.tcp_keepalive)
        .pool_idle_timeout(options.pool_idle_timeout)
        .pool_max_idle_per_host(options.pool_max_idle_per_host)
        .user_agent(concat!("camunda-client/", env!("CARGO_PKG_VERSION")));

    let tls = &options.tls;
    if tls.insecure_skip_verify {
        tracing::warn!("Server certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(pair) = &tls.client_key_pair {
        builder = builder.identity(parse_identity(pair)?);
        tracing::debug!("Configured client certificate for mutual TLS");
    }

    // Client certificate CAs only; server trust roots stay untouched
    if let Some(bundle) = &tls.ca_bundle {
        match parse_ca_bundle(bundle) {
            Ok(certs) => tracing::debug!("CA bundle holds {} certificate(s)", certs.len()),
            Err(e) => tracing::warn!("Ignoring CA bundle: {}", e),
        }
    }

    builder.build().map_err(|e| ClientError::Tls(error_chain(&e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT_CRT: &str = include_str!("../tests/fixtures/client.crt");
    const CLIENT_KEY: &str = include_str!("../tests/fixtures/client.key");
    const CA_CRT: &str = include_str!("../tests/fixtures/ca.crt");

    #[test]
    fn test_default_transport_options() {
        let options = TransportOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.pool_idle_timeout, Duration::from_secs(90));
        assert_eq!(options.pool_max_idle_per_host, 100);
        assert!(!options.tls.insecure_skip_verify);
        assert!(options.tls.client_key_pair.is_none());
    }

    #[test]
    fn test_parse_identity_valid_pair() {
        let pair = KeyPairPem {
            certificate: CLIENT_CRT.to_string(),
            key: CLIENT_KEY.to_string(),
        };
        assert!(parse_identity(&pair).is_ok());
    }

    #[test]
    fn test_parse_identity_garbage() {
        let pair = KeyPairPem {
            certificate: "not a certificate".to_string(),
            key: "not a key".to_string(),
        };
        let err = parse_identity(&pair).unwrap_err();
        assert!(matches!(err, ClientError::Tls(_)));

        // The parser's cause is kept, not just reqwest's "builder error"
        let message = err.to_string();
        assert_ne!(message, "builder error");
        assert!(message.starts_with("builder error: "), "{}", message);
        let cause = message.to_lowercase();
        assert!(cause.contains("key") || cause.contains("certificate"), "{}", message);
    }

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl std::fmt::Display for Layer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.1.as_deref().map(|e| e as _)
        }
    }

    #[test]
    fn test_error_chain() {
        let err = Layer(
            "builder error",
            Some(Box::new(Layer(
                "unexpected error: private key or certificate not found",
                None,
            ))),
        );
        assert_eq!(
            error_chain(&err),
            "builder error: unexpected error: private key or certificate not found"
        );

        // A cause already printed by its parent is not repeated
        let err = Layer("io: denied", Some(Box::new(Layer("denied", None))));
        assert_eq!(error_chain(&err), "io: denied");
    }

    #[test]
    fn test_parse_identity_missing_key() {
        let pair = KeyPairPem {
            certificate: CLIENT_CRT.to_string(),
            key: String::new(),
        };
        assert!(parse_identity(&pair).is_err());
    }

    #[test]
    fn test_parse_ca_bundle() {
        let certs = parse_ca_bundle(CA_CRT).unwrap();
        assert_eq!(certs.len(), 1);

        let bundle = format!("{}{}", CA_CRT, CLIENT_CRT);
        assert_eq!(parse_ca_bundle(&bundle).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_ca_bundle_without_certificates() {
        let err = parse_ca_bundle("hello").unwrap_err();
        assert!(matches!(err, ClientError::CaBundle(_)));
        assert!(err.to_string().contains("CA bundle"));
    }

    #[test]
    fn test_build_http_client_ignores_bad_ca_bundle() {
        let options = TransportOptions::default().with_tls(TlsOptions {
            ca_bundle: Some("not pem".to_string()),
            ..Default::default()
        });
        assert!(build_http_client(&options).is_ok());
    }

    #[test]
    fn test_build_http_client_with_full_tls() {
        let options = TransportOptions::default().with_tls(TlsOptions {
            insecure_skip_verify: true,
            client_key_pair: Some(KeyPairPem {
                certificate: CLIENT_CRT.to_string(),
                key: CLIENT_KEY.to_string(),
            }),
            ca_bundle: Some(CA_CRT.to_string()),
        });
        assert!(build_http_client(&options).is_ok());
    }

    #[test]
    fn test_key_pair_debug_redacts_key() {
        let pair = KeyPairPem {
            certificate: CLIENT_CRT.to_string(),
            key: CLIENT_KEY.to_string(),
        };
        let debug = format!("{:?}", pair);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("PRIVATE KEY"));
    }
}
