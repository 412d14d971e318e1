//! Attribute schemas for the provider block and the deployment resource

use serde::Serialize;

/// Attribute value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "attributes")]
pub enum AttributeType {
    String,
    Bool,
    /// List of objects with the given nested attributes
    ListNested(Vec<Attribute>),
}

/// Schema of a single attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(flatten)]
    pub attr_type: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// A change to this attribute forces destroy-then-create
    pub requires_replace: bool,
    pub description: &'static str,
}

impl Attribute {
    fn new(name: &'static str, attr_type: AttributeType) -> Self {
        Self {
            name,
            attr_type,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            requires_replace: false,
            description: "",
        }
    }

    pub fn required(name: &'static str, attr_type: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::new(name, attr_type)
        }
    }

    pub fn optional(name: &'static str, attr_type: AttributeType) -> Self {
        Self {
            optional: true,
            ..Self::new(name, attr_type)
        }
    }

    pub fn computed(name: &'static str, attr_type: AttributeType) -> Self {
        Self {
            computed: true,
            ..Self::new(name, attr_type)
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Block schema: an ordered set of attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Names of the attributes whose change forces replacement
    pub fn replace_triggers(&self) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.requires_replace)
            .map(|a| a.name)
            .collect()
    }
}

/// Schema of the `provider "camunda"` block
pub fn provider_schema() -> Schema {
    use AttributeType::{Bool, String};

    Schema {
        attributes: vec![
            Attribute::required("endpoint", String)
                .describe("Engine REST endpoint; falls back to CAMUNDA_ENDPOINT"),
            Attribute::optional("username", String)
                .describe("Basic auth user; falls back to CAMUNDA_USERNAME"),
            Attribute::optional("password", String)
                .sensitive()
                .describe("Basic auth password; falls back to CAMUNDA_PASSWORD"),
            Attribute::optional("insecure_skip_verify", Bool)
                .describe("Skip server certificate verification"),
            Attribute::optional("tls_certificate", String)
                .describe("PEM client certificate, used together with tls_key"),
            Attribute::optional("tls_key", String)
                .sensitive()
                .describe("PEM private key of the client certificate"),
            Attribute::optional("tls_ca", String).describe("PEM bundle of trusted certificates"),
        ],
    }
}

/// Schema of the `camunda_deployment` resource
pub fn deployment_schema() -> Schema {
    use AttributeType::{ListNested, String};

    Schema {
        attributes: vec![
            Attribute::computed("id", String).describe("The id to identify the deployment by"),
            Attribute::required("key", String)
                .requires_replace()
                .describe("The key to identify the deployment by"),
            Attribute::optional("tenant", String)
                .requires_replace()
                .describe("The tenant that the deployment belongs to"),
            Attribute::required(
                "resources",
                ListNested(vec![
                    Attribute::required("name", String),
                    Attribute::required("content", String),
                ]),
            )
            .describe("The resources to deploy"),
        ],
    }
}
