//! `camunda_deployment` resource lifecycle
//!
//! Maps a declared deployment onto the engine's deployment API:
//!
//! ```text
//!            create / update
//!   Absent ─────────────────▶ Present ──┐ read
//!      ▲                        │  ▲    │
//!      └──────── delete ────────┘  └────┘
//! ```
//!
//! Every call is one request/reply against the engine. Nothing is retried,
//! and a failed call leaves the previously persisted state as it was.

use crate::error::{ProviderError, Result};
use camunda_client::{DeleteOptions, DeploymentApi, Named, ReqDeploymentCreate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RESOURCE_TYPE: &str = "camunda_deployment";

/// Value of `deployment-source` on every deployment this provider creates
pub const DEPLOYMENT_SOURCE: &str = "Terraform Provider Camunda";

/// A named file of a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFile {
    pub name: String,
    pub content: String,
}

impl ResourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Declared and persisted shape of a deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentModel {
    /// Assigned by the engine; absent until the first successful create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,

    pub resources: Vec<ResourceFile>,
}

impl DeploymentModel {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn with_resource(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.resources.push(ResourceFile::new(name, content));
        self
    }

    /// Whether moving from `self` to `planned` needs destroy-then-create
    pub fn requires_replace(&self, planned: &DeploymentModel) -> bool {
        self.key != planned.key || self.tenant != planned.tenant
    }

    /// Create request for this declaration. Files are keyed by name; when a
    /// name repeats, the last occurrence is deployed.
    fn create_request(&self) -> ReqDeploymentCreate {
        let mut req = ReqDeploymentCreate::new(self.key.clone())
            .with_source(DEPLOYMENT_SOURCE)
            .with_changed_only(true);

        for file in &self.resources {
            if req.resources.contains_key(&file.name) {
                tracing::warn!(
                    "Resource {} is declared more than once in deployment {}, using the last one",
                    file.name,
                    self.key
                );
            }
            req = req.with_resource(Named::new(file.name.clone(), file.content.clone()));
        }
        req
    }
}

/// Lifecycle handler for one deployment resource instance.
///
/// The client is injected by the provider; a handler created before the
/// provider was configured carries none and refuses every operation.
#[derive(Clone)]
pub struct DeploymentResource {
    client: Option<Arc<dyn DeploymentApi>>,
}

impl std::fmt::Debug for DeploymentResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentResource")
            .field("configured", &self.client.is_some())
            .finish()
    }
}

impl DeploymentResource {
    pub fn new(client: Arc<dyn DeploymentApi>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Handler without a client
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&dyn DeploymentApi> {
        self.client.as_deref().ok_or(ProviderError::NotConfigured)
    }

    /// Deploy the declared files and return the state to persist
    pub async fn create(&self, plan: DeploymentModel) -> Result<DeploymentModel> {
        let client = self.client()?;

        let created = client
            .create(plan.create_request())
            .await
            .map_err(|source| ProviderError::Create {
                key: plan.key.clone(),
                source,
            })?;

        tracing::info!("Created deployment {} with id {}", plan.key, created.id);
        Ok(DeploymentModel {
            id: Some(created.id),
            key: plan.key,
            tenant: plan.tenant,
            resources: plan.resources,
        })
    }

    /// Refresh `id` and `key` from the engine. `tenant` and `resources` keep
    /// their persisted values.
    pub async fn read(&self, state: DeploymentModel) -> Result<DeploymentModel> {
        let client = self.client()?;

        // Imported state has no id yet; the request fails on the empty id.
        let id = state.id.clone().unwrap_or_default();
        tracing::debug!("Reading deployment {}", id);

        let deployment = client
            .get(&id)
            .await
            .map_err(|source| ProviderError::Read {
                id: id.clone(),
                source,
            })?;

        Ok(DeploymentModel {
            key: deployment.name.unwrap_or_default(),
            id: Some(deployment.id),
            ..state
        })
    }

    /// Redeploy the declared files as a new deployment.
    ///
    /// The engine assigns a fresh id; the deployment recorded in `prior`
    /// is left on the engine.
    pub async fn update(
        &self,
        prior: &DeploymentModel,
        plan: DeploymentModel,
    ) -> Result<DeploymentModel> {
        let updated = self.create(plan).await?;
        if let Some(prior_id) = &prior.id {
            tracing::debug!(
                "Deployment {} replaced by {:?}, previous deployment kept",
                prior_id,
                updated.id
            );
        }
        Ok(updated)
    }

    /// Remove the deployment from the engine. On success the host drops the
    /// resource from its state.
    pub async fn delete(&self, state: DeploymentModel) -> Result<()> {
        let client = self.client()?;

        let id = state.id.unwrap_or_default();
        client
            .delete(&id, DeleteOptions::default())
            .await
            .map_err(|source| ProviderError::Delete {
                id: id.clone(),
                source,
            })?;

        tracing::info!("Deleted deployment {}", id);
        Ok(())
    }

    /// State to bootstrap an import from. The import identifier is recorded
    /// as the key; the following read fills in the rest.
    pub fn import_state(&self, import_id: impl Into<String>) -> DeploymentModel {
        DeploymentModel::new(import_id)
    }
}
