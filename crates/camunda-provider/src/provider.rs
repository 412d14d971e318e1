//! Provider configuration and resource wiring

use crate::config::{self, ProviderConfigInput, Resolution};
use crate::deployment::{DeploymentResource, RESOURCE_TYPE};
use crate::error::{Diagnostic, Diagnostics, ProviderError};
use crate::schema::{self, Schema};
use camunda_client::{Client, ClientError, DeploymentApi};
use std::sync::{Arc, OnceLock};

/// The Camunda provider.
///
/// Holds the API client once configuration succeeded. The client is set at
/// most once and never replaced; resource handlers receive it explicitly
/// through [`CamundaProvider::deployment_resource`].
#[derive(Default)]
pub struct CamundaProvider {
    client: OnceLock<Arc<dyn DeploymentApi>>,
}

impl std::fmt::Debug for CamundaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CamundaProvider")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl CamundaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        "camunda"
    }

    pub fn is_configured(&self) -> bool {
        self.client.get().is_some()
    }

    pub fn schema(&self) -> Schema {
        schema::provider_schema()
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        vec![RESOURCE_TYPE]
    }

    pub fn data_source_types(&self) -> Vec<&'static str> {
        Vec::new()
    }

    pub fn resource_schema(&self, resource_type: &str) -> Option<Schema> {
        (resource_type == RESOURCE_TYPE).then(schema::deployment_schema)
    }

    /// Resolve the configuration against the process environment and build
    /// the client. Returns the diagnostics to report to the host.
    pub fn configure(&self, input: &ProviderConfigInput) -> Diagnostics {
        self.configure_with(input, |name| std::env::var(name).ok())
    }

    /// Same as [`configure`](Self::configure) with a custom environment lookup
    pub fn configure_with<F>(&self, input: &ProviderConfigInput, env: F) -> Diagnostics
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut diags = Diagnostics::new();

        if self.is_configured() {
            diags.add_error(
                "Provider already configured",
                "The provider can only be configured once per process",
            );
            return diags;
        }

        let config = match config::resolve_with(input, env) {
            Ok(Resolution::Resolved(config)) => config,
            Ok(Resolution::Deferred(warning)) => {
                diags.push(warning);
                return diags;
            }
            Err(e) => {
                diags.push(e.into());
                return diags;
            }
        };

        let client = match Client::new(config.client_options()) {
            Ok(client) => client,
            Err(e) => {
                diags.push(client_error_diagnostic(e));
                return diags;
            }
        };

        tracing::debug!("Configured Camunda client for {}", client.endpoint());
        if self.client.set(Arc::new(client)).is_err() {
            diags.add_error(
                "Provider already configured",
                "The provider can only be configured once per process",
            );
        }
        diags
    }

    /// Handler for one `camunda_deployment` instance
    pub fn deployment_resource(&self) -> DeploymentResource {
        match self.client.get() {
            Some(client) => DeploymentResource::new(client.clone()),
            None => DeploymentResource::unconfigured(),
        }
    }
}

fn client_error_diagnostic(err: ClientError) -> Diagnostic {
    let summary = match &err {
        ClientError::Tls(_) => "Unable to parse certificates",
        _ => "Unable to create client",
    };
    ProviderError::configuration(summary, err.to_string()).into()
}
