//! HTTP plumbing shared by all API areas
//!
//! Builds `/v1` requests, applies options and the ACL token, maps error
//! statuses, and decodes bodies and Nomad response headers.

use std::{sync::Arc, time::Duration};

use reqwest::{Certificate, Client, Identity, Method, Response, header::HeaderMap};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;

use crate::config::NomadApiConfiguration;
use crate::error::{NomadError, Result};
use crate::options::{QueryOptions, WriteOptions};
use crate::response::{EvaluationResponse, NomadResponse, ServerQueryResponse, ServerResponse};

pub const HEADER_TOKEN: &str = "X-Nomad-Token";

/// Slack added on top of a blocking wait before the HTTP request times out
const BLOCKING_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// A request under construction: verb, path segments, parameters and body
#[derive(Clone, Debug)]
pub(crate) struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            params: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub(crate) fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one path segment; it is percent-encoded as a whole
    pub(crate) fn segment(mut self, segment: &str) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub(crate) fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn param_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }
}

/// Per-call scope: extra parameters, token and timeout derived from options
#[derive(Default)]
struct Scope {
    params: Vec<(String, String)>,
    token: Option<String>,
    timeout: Option<Duration>,
}

/// HTTP client bound to one agent address
#[derive(Clone, Debug)]
pub struct NomadHttpClient {
    client: Client,
    config: Arc<NomadApiConfiguration>,
    base_url: Url,
}

impl NomadHttpClient {
    /// Create a new HTTP client
    pub fn new(config: NomadApiConfiguration) -> Result<Self> {
        let client = build_client(&config)?;
        let base_url = parse_address(&config.address)?;

        Ok(Self {
            client,
            config: Arc::new(config),
            base_url,
        })
    }

    /// Same settings and connection pool, talking to a different agent
    pub fn with_address(&self, address: &str) -> Result<Self> {
        Ok(Self {
            client: self.client.clone(),
            config: self.config.clone(),
            base_url: parse_address(address)?,
        })
    }

    pub fn config(&self) -> &NomadApiConfiguration {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL from path segments
    fn build_url(&self, segments: &[String]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                NomadError::InvalidRequest(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request timeout, stretched to cover a blocking wait plus server jitter
    fn timeout_for(&self, wait: Option<Duration>) -> Option<Duration> {
        let configured = self.config.request_timeout_ms.map(Duration::from_millis);
        match (configured, wait) {
            (Some(timeout), Some(wait)) => {
                Some(timeout.max(wait + wait / 16 + BLOCKING_TIMEOUT_SLACK))
            }
            (configured, _) => configured,
        }
    }

    fn query_scope(&self, options: Option<&QueryOptions>) -> Scope {
        match options {
            Some(options) => Scope {
                params: options.to_params(&self.config),
                token: options
                    .auth_token
                    .clone()
                    .or_else(|| self.config.auth_token.clone()),
                timeout: self.timeout_for(options.wait),
            },
            None => self.default_scope(),
        }
    }

    fn write_scope(&self, options: Option<&WriteOptions>) -> Scope {
        match options {
            Some(options) => Scope {
                params: options.to_params(&self.config),
                token: options
                    .auth_token
                    .clone()
                    .or_else(|| self.config.auth_token.clone()),
                timeout: self.timeout_for(None),
            },
            None => self.default_scope(),
        }
    }

    fn default_scope(&self) -> Scope {
        Scope {
            params: QueryOptions::default().to_params(&self.config),
            token: self.config.auth_token.clone(),
            timeout: self.timeout_for(None),
        }
    }

    /// Send a request and fail on non-success statuses
    async fn send(&self, request: ApiRequest, scope: Scope) -> Result<Response> {
        let url = self.build_url(&request.segments)?;
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .query(&request.params)
            .query(&scope.params);
        if let Some(token) = &scope.token {
            builder = builder.header(HEADER_TOKEN, token);
        }
        if let Some(timeout) = scope.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            "{} {} failed with status {}: {}",
            request.method,
            url,
            status,
            body.trim()
        );
        Err(NomadError::ErrorResponse {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch(&self, request: ApiRequest, scope: Scope) -> Result<(u16, HeaderMap, String)> {
        let response = self.send(request, scope).await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok((status, headers, body))
    }

    /// Read from the servers; the response carries blocking-query metadata
    pub(crate) async fn query<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<T>> {
        let (_, headers, body) = self.fetch(request, self.query_scope(options)).await?;
        let value = parse_json(&body)?;
        ServerQueryResponse::from_parts(value, &headers, body)
    }

    /// Write to the servers, decoding the JSON body
    pub(crate) async fn write<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<T>> {
        let (_, headers, body) = self.fetch(request, self.write_scope(options)).await?;
        let value = parse_json(&body)?;
        ServerResponse::from_parts(value, &headers, body)
    }

    /// Write to the servers, ignoring the body
    pub(crate) async fn write_unit(
        &self,
        request: ApiRequest,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<()>> {
        let (_, headers, body) = self.fetch(request, self.write_scope(options)).await?;
        ServerResponse::from_parts((), &headers, body)
    }

    /// Write that creates an evaluation; extracts its ID
    pub(crate) async fn write_evaluation(
        &self,
        request: ApiRequest,
        options: Option<&WriteOptions>,
    ) -> Result<EvaluationResponse> {
        #[derive(serde::Deserialize)]
        struct EvalIdResponse {
            #[serde(rename = "EvalID", default)]
            eval_id: String,
        }

        let (_, headers, body) = self.fetch(request, self.write_scope(options)).await?;
        let parsed: EvalIdResponse = parse_json(&body)?;
        ServerResponse::from_parts(parsed.eval_id, &headers, body)
    }

    /// Call an endpoint without server metadata and decode the JSON body
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<T>> {
        let (status, _, body) = self.fetch(request, self.query_scope(options)).await?;
        Ok(NomadResponse {
            value: parse_json(&body)?,
            status,
            raw_body: body,
        })
    }

    /// Call an endpoint and return the body as text
    pub(crate) async fn execute_text(
        &self,
        request: ApiRequest,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<String>> {
        let (status, _, body) = self.fetch(request, self.query_scope(options)).await?;
        Ok(NomadResponse {
            value: body.clone(),
            status,
            raw_body: body,
        })
    }

    /// Call an endpoint and ignore the body
    pub(crate) async fn execute_unit(
        &self,
        request: ApiRequest,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<()>> {
        let (status, _, body) = self.fetch(request, self.query_scope(options)).await?;
        Ok(NomadResponse {
            value: (),
            status,
            raw_body: body,
        })
    }

    /// Call a streaming endpoint; the caller consumes the body
    pub(crate) async fn stream(
        &self,
        request: ApiRequest,
        options: Option<&QueryOptions>,
    ) -> Result<Response> {
        let mut scope = self.query_scope(options);
        // streams stay open for as long as the caller reads them
        scope.timeout = None;
        self.send(request, scope).await
    }
}

/// Decode a JSON body, keeping the body on failure
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| NomadError::parsing(e.to_string(), body))
}

/// Parse an agent address; a bare host:port gets the http scheme
fn parse_address(address: &str) -> Result<Url> {
    let normalized = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };
    Url::parse(&normalized).map_err(|source| NomadError::InvalidAddress {
        address: address.to_string(),
        source,
    })
}

fn build_client(config: &NomadApiConfiguration) -> Result<Client> {
    let mut builder =
        Client::builder().connect_timeout(Duration::from_millis(config.connect_timeout_ms));

    let tls = &config.tls;
    if let Some(path) = &tls.ca_cert_path {
        let pem = std::fs::read(path)?;
        builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
    }
    match (&tls.client_cert_path, &tls.client_key_path) {
        (Some(cert), Some(key)) => {
            let mut pem = std::fs::read(cert)?;
            pem.push(b'\n');
            pem.extend(std::fs::read(key)?);
            builder = builder.identity(Identity::from_pem(&pem)?);
        }
        (None, None) => {}
        _ => {
            return Err(NomadError::InvalidRequest(
                "client certificate and key must be configured together".to_string(),
            ));
        }
    }
    if tls.skip_verify {
        builder = builder.danger_accept_invalid_certs(true);
    }

    Ok(builder.build()?)
}
