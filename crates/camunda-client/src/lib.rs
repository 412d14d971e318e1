//! Camunda engine REST client
//!
//! This crate wraps the deployment endpoints of the Camunda 7 engine REST API
//! that the provider needs: create a deployment from a set of named files,
//! read it back by id, and delete it.
//!
//! # Example
//!
//! ```ignore
//! use camunda_client::{Client, ClientOptions, DeploymentApi, Named, ReqDeploymentCreate};
//!
//! let client = Client::new(
//!     ClientOptions::new("https://engine.example.com/engine-rest")
//!         .with_credentials("demo", "demo"),
//! )?;
//!
//! let created = client
//!     .create(
//!         ReqDeploymentCreate::new("orders-process")
//!             .with_changed_only(true)
//!             .with_resource(Named::new("orders.bpmn", bpmn_xml)),
//!     )
//!     .await?;
//!
//! let deployment = client.get(&created.id).await?;
//! ```
//!
//! # TLS
//!
//! [`TransportOptions`] carries the TLS material: an optional client
//! certificate/key pair (mutual TLS), an optional CA bundle and a
//! skip-verify switch. A malformed key pair is reported as
//! [`ClientError::Tls`] when the client is built; a CA bundle that does not
//! parse is logged and ignored.

pub mod client;
pub mod deployment;
pub mod error;
pub mod transport;

pub use client::{Client, ClientOptions};
pub use deployment::{DeleteOptions, DeploymentApi, Named, ReqDeploymentCreate, ResDeployment};
pub use error::{ClientError, Result};
pub use transport::{KeyPairPem, TlsOptions, TransportOptions};
