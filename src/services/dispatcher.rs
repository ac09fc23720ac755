use crate::constants::network::ALLOWED_SCHEMES;
use crate::constants::server;
use crate::errors::ToolError;
use crate::services::credentials::ApiConfig;
use crate::services::endpoint::{EndpointDescriptor, HttpMethod, ParameterLocation};
use crate::services::logger::Logger;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use url::Url;

/// Flat parameter bag supplied by the caller, keyed by parameter name.
pub type ParameterMap = Map<String, Value>;

/// A request ready to send: path placeholders resolved, parameters routed.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Option<Map<String, Value>>,
    pub body: Option<Map<String, Value>>,
}

/// Route `params` into the path, query string and body declared by `endpoint`.
///
/// Placeholders are filled first, by name, whatever location the parameter is
/// declared with; a value used in the path is not sent again. Remaining values go
/// to the query (`query`) or body (`body`, `formData`) per their declaration.
/// Keys the endpoint does not know are dropped, and required parameters are not
/// checked here: the API is the judge of that.
pub fn build_request(endpoint: &EndpointDescriptor, params: &ParameterMap) -> PreparedRequest {
    let mut path = endpoint.path.clone();
    let mut absorbed: HashSet<&str> = HashSet::new();
    for (key, value) in params {
        let placeholder = format!("{{{}}}", key);
        if path.contains(&placeholder) {
            let encoded = urlencoding::encode(&path_value(value)).into_owned();
            path = path.replace(&placeholder, &encoded);
            absorbed.insert(key.as_str());
        }
    }

    let mut query = Map::new();
    let mut body = Map::new();
    for spec in &endpoint.parameters {
        if absorbed.contains(spec.name.as_str()) {
            continue;
        }
        let Some(value) = params.get(&spec.name) else {
            continue;
        };
        match spec.location {
            ParameterLocation::Query => {
                query.insert(spec.name.clone(), value.clone());
            }
            location if location.is_body() => {
                body.insert(spec.name.clone(), value.clone());
            }
            _ => {}
        }
    }

    PreparedRequest {
        method: endpoint.method,
        path,
        query: (!query.is_empty()).then_some(query),
        body: (endpoint.method.carries_body() && !body.is_empty()).then_some(body),
    }
}

/// String form of a value placed into a path segment, before escaping.
fn path_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(path_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Query map flattened to pairs; arrays repeat the key, nulls are skipped.
pub fn query_pairs(query: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in query {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = query_value(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = query_value(other) {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    pairs
}

/// Absolute URL for `request` under `base_url`, query string included.
pub fn resolve_url(base_url: &str, request: &PreparedRequest) -> Result<Url, ToolError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        request.path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined)
        .map_err(|err| ToolError::invalid_params(format!("Invalid API URL {}: {}", joined, err)))?;
    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(ToolError::invalid_params(
            "Only http/https base URLs are supported",
        ));
    }
    if let Some(query) = &request.query {
        let pairs = query_pairs(query);
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
    }
    Ok(url)
}

/// Decoded response payload: JSON when it parses, the raw text otherwise.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn server_message(data: &Value) -> Option<String> {
    match data.get("message")? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        return ToolError::timeout(err.to_string());
    }
    ToolError::transport(err.to_string())
}

/// Sends prepared requests with bearer auth and normalizes failures.
#[derive(Clone)]
pub struct RequestDispatcher {
    logger: Logger,
    client: Client,
    timeout: Duration,
}

impl RequestDispatcher {
    pub fn new(logger: Logger, timeout_ms: u64) -> Result<Self, ToolError> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", server::NAME, server::VERSION))
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("dispatch"),
            client,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub async fn call(
        &self,
        endpoint: &EndpointDescriptor,
        params: &ParameterMap,
        config: &ApiConfig,
    ) -> Result<Value, ToolError> {
        let request = build_request(endpoint, params);
        self.execute(&request, config).await
    }

    pub async fn execute(
        &self,
        request: &PreparedRequest,
        config: &ApiConfig,
    ) -> Result<Value, ToolError> {
        let url = resolve_url(&config.base_url, request)?;
        self.logger.debug(
            "Sending request",
            Some(&serde_json::json!({
                "method": request.method.as_str(),
                "url": url.as_str(),
                "body": request.body.is_some(),
            })),
        );

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .bearer_auth(&config.token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(self.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let data = decode_body(&bytes);
        self.logger.debug(
            "Response received",
            Some(&serde_json::json!({
                "status": status.as_u16(),
                "duration_ms": started.elapsed().as_millis() as u64,
                "bytes": bytes.len(),
            })),
        );

        if status.is_success() || status.is_redirection() {
            return Ok(data);
        }

        let code = status.as_u16();
        let message = server_message(&data)
            .unwrap_or_else(|| format!("Request failed with status code {}", code));
        Err(
            ToolError::api(code, format!("API Error: {} - {}", code, message))
                .with_details(serde_json::json!({ "status": code, "body": data })),
        )
    }
}
