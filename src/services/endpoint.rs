use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Only these methods ever send a request body.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// Where a declared parameter goes in the outgoing request.
///
/// Catalogs extracted from OpenAPI documents can also mention `header` and
/// `cookie` parameters; those load but are never routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
    FormData,
    Header,
    Cookie,
    #[serde(other)]
    Unknown,
}

impl ParameterLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Body => "body",
            ParameterLocation::FormData => "formData",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Unknown => "unknown",
        }
    }

    pub fn is_body(self) -> bool {
        matches!(self, ParameterLocation::Body | ParameterLocation::FormData)
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    /// Descriptive only; values are never checked against it.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

impl EndpointDescriptor {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.operation_id.to_lowercase().contains(needle)
            || self.summary.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_parses_extracted_catalog_entry() {
        let raw = r#"{
            "path": "/v2/droplets/{droplet_id}",
            "method": "GET",
            "operationId": "droplets_get",
            "summary": "Retrieve an Existing Droplet",
            "description": "To show information about an individual Droplet...",
            "tags": ["Droplets"],
            "parameters": [
                {"name": "droplet_id", "in": "path", "required": true, "description": "A unique identifier for a Droplet instance.", "type": "integer"}
            ]
        }"#;
        let endpoint: EndpointDescriptor = serde_json::from_str(raw).expect("must parse");
        assert_eq!(endpoint.method, HttpMethod::Get);
        assert_eq!(endpoint.operation_id, "droplets_get");
        assert_eq!(endpoint.parameters[0].location, ParameterLocation::Path);
        assert_eq!(endpoint.parameters[0].kind, "integer");
        assert!(endpoint.parameters[0].required);
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let raw = r#"{"path": "/v2/account", "method": "GET", "operationId": "account_get"}"#;
        let endpoint: EndpointDescriptor = serde_json::from_str(raw).expect("must parse");
        assert!(endpoint.summary.is_empty());
        assert!(endpoint.tags.is_empty());
        assert!(endpoint.parameters.is_empty());
    }

    #[test]
    fn header_and_unknown_locations_still_load() {
        let raw = r#"[
            {"name": "X-Trace", "in": "header"},
            {"name": "weird", "in": "matrix"},
            {"name": "payload", "in": "formData"}
        ]"#;
        let params: Vec<ParameterSpec> = serde_json::from_str(raw).expect("must parse");
        assert_eq!(params[0].location, ParameterLocation::Header);
        assert_eq!(params[1].location, ParameterLocation::Unknown);
        assert!(params[2].location.is_body());
    }

    #[test]
    fn only_post_put_patch_carry_bodies() {
        assert!(HttpMethod::Post.carries_body());
        assert!(HttpMethod::Put.carries_body());
        assert!(HttpMethod::Patch.carries_body());
        assert!(!HttpMethod::Get.carries_body());
        assert!(!HttpMethod::Delete.carries_body());
    }
}
