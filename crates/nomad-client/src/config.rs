//! Client configuration
//!
//! Defaults match a local dev agent. [`NomadApiConfiguration::from_env`] reads
//! the same environment variables as the `nomad` CLI.

use std::path::PathBuf;

use config::{Config, Environment};

use crate::error::Result;

pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:4646";

/// TLS settings for talking to agents over https
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// PEM bundle used to verify the agent certificate
    pub ca_cert_path: Option<PathBuf>,
    /// PEM client certificate presented for mutual TLS
    pub client_cert_path: Option<PathBuf>,
    /// PEM private key matching `client_cert_path`
    pub client_key_path: Option<PathBuf>,
    pub skip_verify: bool,
}

/// Configuration for the Nomad API client
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NomadApiConfiguration {
    /// Base address of the agent, e.g. "http://127.0.0.1:4646"
    pub address: String,
    /// Region applied to requests that don't set one
    pub region: Option<String>,
    /// Namespace applied to requests that don't set one
    pub namespace: Option<String>,
    /// ACL token applied to requests that don't set one
    pub auth_token: Option<String>,
    pub tls: TlsConfig,
    /// Connection timeout in milliseconds (default: 5000)
    pub connect_timeout_ms: u64,
    /// Overall request timeout in milliseconds. Unset by default;
    /// blocking queries stretch it to cover their wait.
    pub request_timeout_ms: Option<u64>,
}

impl Default for NomadApiConfiguration {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            region: None,
            namespace: None,
            auth_token: None,
            tls: TlsConfig::default(),
            connect_timeout_ms: 5000,
            request_timeout_ms: None,
        }
    }
}

impl NomadApiConfiguration {
    /// Create a new config for the given agent address
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            ..Default::default()
        }
    }

    /// Load configuration from `NOMAD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Environment::with_prefix("NOMAD"))
    }

    pub(crate) fn from_environment(env: Environment) -> Result<Self> {
        let source = Config::builder().add_source(env).build()?;
        let defaults = Self::default();

        let get = |key: &str| source.get_string(key).ok().filter(|v| !v.is_empty());

        Ok(Self {
            address: get("addr").unwrap_or(defaults.address),
            region: get("region"),
            namespace: get("namespace"),
            auth_token: get("token"),
            tls: TlsConfig {
                ca_cert_path: get("cacert").map(PathBuf::from),
                client_cert_path: get("client_cert").map(PathBuf::from),
                client_key_path: get("client_key").map(PathBuf::from),
                skip_verify: source.get_bool("skip_verify").unwrap_or(false),
            },
            ..defaults
        })
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn with_auth_token(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, request_ms: Option<u64>) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.request_timeout_ms = request_ms;
        self
    }
}
