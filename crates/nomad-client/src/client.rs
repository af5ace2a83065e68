// NomadApiClient - facade handing out the per-resource APIs

use crate::{
    api::{
        AclPoliciesApi, AclTokensApi, AgentApi, AllocationsApi, ClientApi, DeploymentsApi,
        EvaluationsApi, JobsApi, NamespacesApi, NodesApi, RegionsApi, StatusApi, SystemApi,
    },
    config::NomadApiConfiguration,
    error::Result,
    http::NomadHttpClient,
};

/// Entry point of the SDK. Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct NomadApiClient {
    http: NomadHttpClient,
}

impl NomadApiClient {
    /// Create a new NomadApiClient with the given configuration
    pub fn new(config: NomadApiConfiguration) -> Result<Self> {
        Ok(Self {
            http: NomadHttpClient::new(config)?,
        })
    }

    /// Client for a single agent address with default settings
    pub fn from_address(address: &str) -> Result<Self> {
        Self::new(NomadApiConfiguration::new(address))
    }

    /// Client configured from `NOMAD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(NomadApiConfiguration::from_env()?)
    }

    pub fn config(&self) -> &NomadApiConfiguration {
        self.http.config()
    }

    pub fn jobs(&self) -> JobsApi {
        JobsApi::new(self.http.clone())
    }

    pub fn allocations(&self) -> AllocationsApi {
        AllocationsApi::new(self.http.clone())
    }

    pub fn evaluations(&self) -> EvaluationsApi {
        EvaluationsApi::new(self.http.clone())
    }

    pub fn nodes(&self) -> NodesApi {
        NodesApi::new(self.http.clone())
    }

    pub fn namespaces(&self) -> NamespacesApi {
        NamespacesApi::new(self.http.clone())
    }

    pub fn deployments(&self) -> DeploymentsApi {
        DeploymentsApi::new(self.http.clone())
    }

    pub fn agent(&self) -> AgentApi {
        AgentApi::new(self.http.clone())
    }

    pub fn status(&self) -> StatusApi {
        StatusApi::new(self.http.clone())
    }

    pub fn regions(&self) -> RegionsApi {
        RegionsApi::new(self.http.clone())
    }

    pub fn system(&self) -> SystemApi {
        SystemApi::new(self.http.clone())
    }

    pub fn acl_policies(&self) -> AclPoliciesApi {
        AclPoliciesApi::new(self.http.clone())
    }

    pub fn acl_tokens(&self) -> AclTokensApi {
        AclTokensApi::new(self.http.clone())
    }

    /// Client API of the agent this client is configured for
    pub fn client(&self) -> ClientApi {
        ClientApi::new(self.http.clone())
    }

    /// Client API of the agent at `address`, with this client's settings
    pub fn client_api(&self, address: &str) -> Result<ClientApi> {
        Ok(ClientApi::new(self.http.with_address(address)?))
    }

    /// Client API of the agent running on the node with the given ID,
    /// at the HTTP address the node advertises
    pub async fn lookup_client_api_by_node_id(&self, node_id: &str) -> Result<ClientApi> {
        let node = self.nodes().info(node_id, None).await?.value;
        tracing::debug!("Node {} serves its API at {}", node_id, node.http_url());
        self.client_api(&node.http_url())
    }
}
