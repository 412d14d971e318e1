//! Deployment endpoint types and the `DeploymentApi` seam

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named file that is part of a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    pub name: String,
    pub content: String,
}

impl Named {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /deployment/create`
#[derive(Debug, Clone, Default)]
pub struct ReqDeploymentCreate {
    pub deployment_name: String,
    pub deployment_source: Option<String>,
    pub deploy_changed_only: Option<bool>,
    pub enable_duplicate_filtering: Option<bool>,
    pub tenant_id: Option<String>,

    /// Files keyed by resource name
    pub resources: BTreeMap<String, Named>,
}

impl ReqDeploymentCreate {
    pub fn new(deployment_name: impl Into<String>) -> Self {
        Self {
            deployment_name: deployment_name.into(),
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.deployment_source = Some(source.into());
        self
    }

    pub fn with_changed_only(mut self, changed_only: bool) -> Self {
        self.deploy_changed_only = Some(changed_only);
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Add a file; a later file with the same name replaces the earlier one
    pub fn with_resource(mut self, resource: Named) -> Self {
        self.resources.insert(resource.name.clone(), resource);
        self
    }
}

/// Deployment as reported by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResDeployment {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub deployment_time: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

/// Query flags for `DELETE /deployment/{id}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Also delete process instances and history
    pub cascade: Option<bool>,
    pub skip_custom_listeners: Option<bool>,
    pub skip_io_mappings: Option<bool>,
}

impl DeleteOptions {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("cascade", self.cascade),
            ("skipCustomListeners", self.skip_custom_listeners),
            ("skipIoMappings", self.skip_io_mappings),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v.to_string())))
        .collect()
    }
}

/// Deployment operations the resource lifecycle depends on.
///
/// Implementations must be usable from several resource instances at once.
#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// Deploy the given files under a deployment name
    async fn create(&self, req: ReqDeploymentCreate) -> Result<ResDeployment>;

    /// Fetch a deployment by id
    async fn get(&self, id: &str) -> Result<ResDeployment>;

    /// Remove a deployment by id
    async fn delete(&self, id: &str, options: DeleteOptions) -> Result<()>;
}
