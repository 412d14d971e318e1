//! Camunda provider
//!
//! Manages Camunda deployments as declarative infrastructure resources. A
//! host (a plan/apply engine) configures the provider once, then drives the
//! `camunda_deployment` resource through create, read, update, delete and
//! import.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        host (plan / apply / state store)       │
//! └───────────────┬──────────────────────────────┘
//!                 │ configure          │ lifecycle calls
//! ┌───────────────▼─────────┐ ┌────────▼───────────────┐
//! │ config::resolve          │ │ DeploymentResource      │
//! │ (explicit > environment) │ │ create/read/update/...  │
//! └───────────────┬─────────┘ └────────▲───────────────┘
//!                 │ Client::new         │ Arc<dyn DeploymentApi>
//! ┌───────────────▼─────────────────────┴──────────┐
//! │        CamundaProvider (client, set once)       │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use camunda_provider::{CamundaProvider, DeploymentModel, ProviderConfigInput};
//!
//! let provider = CamundaProvider::new();
//! let diags = provider.configure(
//!     &ProviderConfigInput::new("https://engine.example.com/engine-rest")
//!         .with_credentials("demo", "demo"),
//! );
//! assert!(!diags.has_error());
//!
//! let state = provider
//!     .deployment_resource()
//!     .create(DeploymentModel::new("orders-process").with_resource("orders.bpmn", xml))
//!     .await?;
//! ```

pub mod config;
pub mod deployment;
pub mod error;
pub mod provider;
pub mod schema;
pub mod value;

// Re-exports
pub use config::{ProviderConfig, ProviderConfigInput, Resolution};
pub use deployment::{DeploymentModel, DeploymentResource, ResourceFile};
pub use error::{Diagnostic, Diagnostics, ProviderError, Result, Severity};
pub use provider::CamundaProvider;
pub use schema::{Attribute, AttributeType, Schema};
pub use value::ConfigValue;
