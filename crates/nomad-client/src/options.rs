//! Per-request options for queries and writes
//!
//! Values set here override the defaults from [`NomadApiConfiguration`].
//!
//! [`NomadApiConfiguration`]: crate::config::NomadApiConfiguration

use std::time::Duration;

use crate::config::NomadApiConfiguration;
use crate::response::ServerQueryResponse;

/// Options for read requests, including blocking-query parameters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub region: Option<String>,
    pub namespace: Option<String>,
    /// Block until the server's index for the resource exceeds this value
    pub index: Option<u64>,
    /// Maximum time the server may block before answering
    pub wait: Option<Duration>,
    /// Allow any server, not just the leader, to answer
    pub allow_stale: bool,
    /// ID prefix filter for list endpoints
    pub prefix: Option<String>,
    pub auth_token: Option<String>,
}

impl QueryOptions {
    /// Options that block until the data has changed since `response` was served
    pub fn newer_than<T>(response: &ServerQueryResponse<T>) -> Self {
        Self {
            index: Some(response.index),
            ..Default::default()
        }
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_string()),
            ..Default::default()
        }
    }

    pub fn region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn wait(mut self, wait: Duration) -> Self {
        self.wait = Some(wait);
        self
    }

    pub fn stale(mut self) -> Self {
        self.allow_stale = true;
        self
    }

    pub fn auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    /// Query string parameters, with configuration defaults filled in
    pub(crate) fn to_params(&self, config: &NomadApiConfiguration) -> Vec<(String, String)> {
        let mut params = scope_params(
            self.region.as_deref(),
            self.namespace.as_deref(),
            config,
        );
        if let Some(index) = self.index {
            params.push(("index".to_string(), index.to_string()));
        }
        if let Some(wait) = self.wait {
            params.push(("wait".to_string(), format!("{}ms", wait_millis(wait))));
        }
        if self.allow_stale {
            params.push(("stale".to_string(), String::new()));
        }
        if let Some(prefix) = &self.prefix {
            params.push(("prefix".to_string(), prefix.clone()));
        }
        params
    }
}

/// Whole milliseconds for the `wait` parameter, rounded up and never 0,
/// since the servers read a zero wait as their default of several minutes
fn wait_millis(wait: Duration) -> u128 {
    let millis = wait.as_millis();
    if wait.subsec_nanos() % 1_000_000 != 0 {
        millis + 1
    } else {
        millis.max(1)
    }
}

/// Options for write requests
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub region: Option<String>,
    pub namespace: Option<String>,
    pub auth_token: Option<String>,
}

impl WriteOptions {
    pub fn region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    pub(crate) fn to_params(&self, config: &NomadApiConfiguration) -> Vec<(String, String)> {
        scope_params(self.region.as_deref(), self.namespace.as_deref(), config)
    }
}

fn scope_params(
    region: Option<&str>,
    namespace: Option<&str>,
    config: &NomadApiConfiguration,
) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(region) = region.or(config.region.as_deref()) {
        params.push(("region".to_string(), region.to_string()));
    }
    if let Some(namespace) = namespace.or(config.namespace.as_deref()) {
        params.push(("namespace".to_string(), namespace.to_string()));
    }
    params
}
