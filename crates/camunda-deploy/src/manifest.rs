//! Deployment manifest
//!
//! ```json
//! {
//!   "key": "orders-process",
//!   "tenant": "tenant-a",
//!   "resources": [
//!     { "name": "orders.bpmn", "path": "processes/orders.bpmn" },
//!     { "name": "approve.form", "content": "{ \"components\": [] }" }
//!   ]
//! }
//! ```
//!
//! Relative paths are resolved against the manifest's directory.

use anyhow::{Context, bail};
use camunda_provider::{DeploymentModel, ResourceFile};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub key: String,
    #[serde(default)]
    pub tenant: Option<String>,
    pub resources: Vec<ManifestResource>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestResource {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Manifest {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let manifest: Manifest = serde_json::from_str(content)?;
        if manifest.key.is_empty() {
            bail!("manifest key must not be empty");
        }
        if manifest.resources.is_empty() {
            bail!("manifest must list at least one resource");
        }
        Ok(manifest)
    }

    /// Load a manifest and the files it references
    pub fn load(path: &Path) -> anyhow::Result<DeploymentModel> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest = Self::parse(&content)
            .with_context(|| format!("invalid manifest {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.into_model(base)
    }

    pub fn into_model(self, base: &Path) -> anyhow::Result<DeploymentModel> {
        let resources = self
            .resources
            .into_iter()
            .map(|r| r.into_file(base))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(DeploymentModel {
            id: None,
            key: self.key,
            tenant: self.tenant,
            resources,
        })
    }
}

impl ManifestResource {
    fn into_file(self, base: &Path) -> anyhow::Result<ResourceFile> {
        let content = match (self.path, self.content) {
            (Some(path), None) => {
                let full = base.join(&path);
                std::fs::read_to_string(&full)
                    .with_context(|| format!("failed to read resource {}", full.display()))?
            }
            (None, Some(content)) => content,
            _ => bail!(
                "resource {} must set exactly one of path and content",
                self.name
            ),
        };
        Ok(ResourceFile::new(self.name, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("processes")).unwrap();
        fs::write(dir.path().join("processes/orders.bpmn"), "<xml/>").unwrap();
        fs::write(
            dir.path().join("deployment.json"),
            r#"{
                "key": "orders-process",
                "resources": [
                    { "name": "orders.bpmn", "path": "processes/orders.bpmn" },
                    { "name": "inline.dmn", "content": "<dmn/>" }
                ]
            }"#,
        )
        .unwrap();

        let model = Manifest::load(&dir.path().join("deployment.json")).unwrap();
        assert_eq!(model.key, "orders-process");
        assert_eq!(model.id, None);
        assert_eq!(
            model.resources,
            vec![
                ResourceFile::new("orders.bpmn", "<xml/>"),
                ResourceFile::new("inline.dmn", "<dmn/>"),
            ]
        );
    }

    #[test]
    fn test_resource_needs_exactly_one_source() {
        let manifest = Manifest::parse(
            r#"{ "key": "k", "resources": [{ "name": "a.bpmn", "path": "a", "content": "b" }] }"#,
        )
        .unwrap();
        let err = manifest.into_model(Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("exactly one of path and content"));
    }

    #[test]
    fn test_empty_resources_rejected() {
        assert!(Manifest::parse(r#"{ "key": "k", "resources": [] }"#).is_err());
        assert!(Manifest::parse(r#"{ "key": "", "resources": [{ "name": "a", "content": "" }] }"#).is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(
            Manifest::parse(r#"{ "key": "k", "id": "x", "resources": [{ "name": "a", "content": "" }] }"#)
                .is_err()
        );
    }
}
