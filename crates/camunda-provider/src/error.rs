//! Provider error and diagnostic types

use camunda_client::ClientError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const NOT_CONFIGURED_DETAIL: &str = "The provider hasn't been configured before apply, likely because it depends on an unknown value from another resource. Configure the provider with known values before managing deployments.";

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{detail}")]
    Configuration { summary: String, detail: String },

    #[error("{}", NOT_CONFIGURED_DETAIL)]
    NotConfigured,

    #[error("Could not create key {key}: {source}")]
    Create {
        key: String,
        #[source]
        source: ClientError,
    },

    #[error("Could not read id {id}: {source}")]
    Read {
        id: String,
        #[source]
        source: ClientError,
    },

    #[error("Could not delete id {id}: {source}")]
    Delete {
        id: String,
        #[source]
        source: ClientError,
    },
}

impl ProviderError {
    pub fn configuration(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Configuration {
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Short title shown above the detailed message
    pub fn summary(&self) -> &str {
        match self {
            ProviderError::Configuration { summary, .. } => summary,
            ProviderError::NotConfigured => "Provider not configured",
            ProviderError::Create { .. } => "Error creating deployment",
            ProviderError::Read { .. } => "Error reading deployment",
            ProviderError::Delete { .. } => "Error deleting deployment",
        }
    }

    /// Underlying client failure, if any
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            ProviderError::Create { source, .. }
            | ProviderError::Read { source, .. }
            | ProviderError::Delete { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// A structured message reported back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&ProviderError> for Diagnostic {
    fn from(err: &ProviderError) -> Self {
        Diagnostic::error(err.summary(), err.to_string())
    }
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        Diagnostic::from(&err)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.summary, self.detail)
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::error(summary, detail));
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Diagnostic::warning(summary, detail));
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }
}

impl From<ProviderError> for Diagnostics {
    fn from(err: ProviderError) -> Self {
        Self(vec![err.into()])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
