//! Camunda engine REST client
//!
//! Thin typed wrapper over the engine's deployment endpoints. Every request
//! carries the configured basic credentials and goes through one shared,
//! pooled transport, so a `Client` can be cloned freely and used from many
//! tasks at once.

use crate::deployment::{DeleteOptions, DeploymentApi, ReqDeploymentCreate, ResDeployment};
use crate::error::{ClientError, Result};
use crate::transport::{self, TransportOptions};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Deserialize;

/// Options for constructing a [`Client`]
#[derive(Clone)]
pub struct ClientOptions {
    /// Engine REST root, e.g. `https://engine.example.com/engine-rest`
    pub endpoint_url: String,
    pub api_user: String,
    pub api_password: String,
    pub transport: TransportOptions,
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_user", &self.api_user)
            .field("api_password", &"<redacted>")
            .field("transport", &self.transport)
            .finish()
    }
}

impl ClientOptions {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            api_user: String::new(),
            api_password: String::new(),
            transport: TransportOptions::default(),
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.api_user = user.into();
        self.api_password = password.into();
        self
    }

    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }
}

/// Camunda REST client
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base: Url,
    api_user: String,
    api_password: String,
    client_certificate: bool,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base", &self.base.as_str())
            .field("api_user", &self.api_user)
            .field("client_certificate", &self.client_certificate)
            .finish()
    }
}

impl Client {
    /// Create a new client, building its transport from `options.transport`
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base = Url::parse(options.endpoint_url.trim_end_matches('/')).map_err(|e| {
            ClientError::InvalidRequest(format!(
                "invalid endpoint URL {}: {}",
                options.endpoint_url, e
            ))
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidRequest(format!(
                "endpoint URL {} cannot carry a path",
                options.endpoint_url
            )));
        }

        let http = transport::build_http_client(&options.transport)?;

        Ok(Self {
            http,
            base,
            api_user: options.api_user,
            api_password: options.api_password,
            client_certificate: options.transport.tls.client_key_pair.is_some(),
        })
    }

    /// Engine REST root all paths are resolved against
    pub fn endpoint(&self) -> &str {
        self.base.as_str()
    }

    /// Whether a client certificate is presented during the TLS handshake
    pub fn has_client_certificate(&self) -> bool {
        self.client_certificate
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest(format!("invalid base URL {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        if self.api_user.is_empty() {
            builder
        } else {
            builder.basic_auth(&self.api_user, Some(&self.api_password))
        }
    }
}

#[async_trait]
impl DeploymentApi for Client {
    async fn create(&self, req: ReqDeploymentCreate) -> Result<ResDeployment> {
        let url = self.url(&["deployment", "create"])?;

        let mut form =
            reqwest::multipart::Form::new().text("deployment-name", req.deployment_name.clone());
        if let Some(source) = req.deployment_source {
            form = form.text("deployment-source", source);
        }
        if let Some(changed_only) = req.deploy_changed_only {
            form = form.text("deploy-changed-only", changed_only.to_string());
        }
        if let Some(filtering) = req.enable_duplicate_filtering {
            form = form.text("enable-duplicate-filtering", filtering.to_string());
        }
        if let Some(tenant_id) = req.tenant_id {
            form = form.text("tenant-id", tenant_id);
        }
        for (name, resource) in req.resources {
            let part = reqwest::multipart::Part::text(resource.content).file_name(resource.name);
            form = form.part(name, part);
        }

        tracing::debug!("POST {} (deployment {})", url, req.deployment_name);
        let response = self.request(Method::POST, url).multipart(form).send().await?;
        decode(response).await
    }

    async fn get(&self, id: &str) -> Result<ResDeployment> {
        if id.is_empty() {
            return Err(ClientError::InvalidRequest(
                "deployment id must not be empty".to_string(),
            ));
        }

        let url = self.url(&["deployment", id])?;
        tracing::debug!("GET {}", url);
        let response = self.request(Method::GET, url).send().await?;
        decode(response).await
    }

    async fn delete(&self, id: &str, options: DeleteOptions) -> Result<()> {
        if id.is_empty() {
            return Err(ClientError::InvalidRequest(
                "deployment id must not be empty".to_string(),
            ));
        }

        let mut url = self.url(&["deployment", id])?;
        let query = options.query_pairs();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        tracing::debug!("DELETE {}", url);
        let response = self.request(Method::DELETE, url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

// ============ Response handling ============

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    error_type: Option<String>,
    message: Option<String>,
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body
            }
        });

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode(response: Response) -> Result<ResDeployment> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::Named;
    use crate::transport::{KeyPairPem, TlsOptions};
    use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Client {
        Client::new(
            ClientOptions::new(format!("{}/engine-rest", server.uri()))
                .with_credentials("demo", "secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_endpoint() {
        let err = Client::new(ClientOptions::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let client = Client::new(ClientOptions::new("https://engine.example.com/engine-rest/"))
            .unwrap();
        let url = client.url(&["deployment", "create"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://engine.example.com/engine-rest/deployment/create"
        );
    }

    #[test]
    fn test_url_escapes_id() {
        let client = Client::new(ClientOptions::new("https://engine.example.com")).unwrap();
        let url = client.url(&["deployment", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "https://engine.example.com/deployment/a%2Fb%20c");
    }

    #[test]
    fn test_client_certificate_flag() {
        let client = Client::new(ClientOptions::new("https://engine.example.com")).unwrap();
        assert!(!client.has_client_certificate());

        let transport = TransportOptions::default().with_tls(TlsOptions {
            client_key_pair: Some(KeyPairPem {
                certificate: include_str!("../tests/fixtures/client.crt").to_string(),
                key: include_str!("../tests/fixtures/client.key").to_string(),
            }),
            ..Default::default()
        });
        let client =
            Client::new(ClientOptions::new("https://engine.example.com").with_transport(transport))
                .unwrap();
        assert!(client.has_client_certificate());
    }

    #[test]
    fn test_debug_redacts_password() {
        let options = ClientOptions::new("https://engine.example.com")
            .with_credentials("demo", "hunter2");
        assert!(!format!("{:?}", options).contains("hunter2"));
    }

    #[tokio::test]
    async fn test_create_posts_multipart_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/engine-rest/deployment/create"))
            .and(header_exists("authorization"))
            .and(body_string_contains("name=\"deployment-name\""))
            .and(body_string_contains("orders-process"))
            .and(body_string_contains("name=\"deploy-changed-only\""))
            .and(body_string_contains("filename=\"orders.bpmn\""))
            .and(body_string_contains("<xml/>"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "dep-123",
                "name": "orders-process",
                "source": "Terraform Provider Camunda",
                "deploymentTime": "2024-01-01T00:00:00.000+0000",
                "tenantId": null,
                "links": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server)
            .create(
                ReqDeploymentCreate::new("orders-process")
                    .with_source("Terraform Provider Camunda")
                    .with_changed_only(true)
                    .with_resource(Named::new("orders.bpmn", "<xml/>")),
            )
            .await
            .unwrap();

        assert_eq!(created.id, "dep-123");
        assert_eq!(created.name.as_deref(), Some("orders-process"));
    }

    #[tokio::test]
    async fn test_get_returns_deployment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/engine-rest/deployment/dep-123"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "dep-123",
                "name": "orders-process"
            })))
            .mount(&server)
            .await;

        let deployment = client_for(&server).get("dep-123").await.unwrap();
        assert_eq!(deployment.id, "dep-123");
        assert_eq!(deployment.name.as_deref(), Some("orders-process"));
    }

    #[tokio::test]
    async fn test_get_not_found_surfaces_engine_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/engine-rest/deployment/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "type": "InvalidRequestException",
                "message": "Deployment with id 'missing' does not exist"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).get("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "API error (404): Deployment with id 'missing' does not exist"
        );
    }

    #[tokio::test]
    async fn test_get_empty_id_is_rejected_locally() {
        let server = MockServer::start().await;
        let err = client_for(&server).get("").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway from proxy"))
            .mount(&server)
            .await;

        let err = client_for(&server).get("dep-1").await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway from proxy");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_without_options() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/engine-rest/deployment/dep-123"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .delete("dep-123", DeleteOptions::default())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn test_delete_with_cascade() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/engine-rest/deployment/dep-123"))
            .and(query_param("cascade", "true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let options = DeleteOptions {
            cascade: Some(true),
            ..Default::default()
        };
        client_for(&server).delete("dep-123", options).await.unwrap();
    }

    #[tokio::test]
    async fn test_anonymous_client_sends_no_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "dep-1"
            })))
            .mount(&server)
            .await;

        let client = Client::new(ClientOptions::new(server.uri())).unwrap();
        client.get("dep-1").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_error() {
        let client = Client::new(ClientOptions::new("http://127.0.0.1:1")).unwrap();
        let err = client.get("dep-1").await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
