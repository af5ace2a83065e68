//! Agent API: the local agent's own view and gossip membership

use nomad_api_model::{AgentHealthResponse, JoinResponse, ServerMembers};

use crate::error::Result;
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::QueryOptions;
use crate::response::NomadResponse;

#[derive(Clone, Debug)]
pub struct AgentApi {
    http: NomadHttpClient,
}

impl AgentApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// Configuration and runtime stats of the agent, passed through untyped
    pub async fn self_info(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<serde_json::Value>> {
        self.http
            .execute(ApiRequest::get("/v1/agent/self"), options)
            .await
    }

    pub async fn health(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<AgentHealthResponse>> {
        self.http
            .execute(ApiRequest::get("/v1/agent/health"), options)
            .await
    }

    /// Server members known through gossip
    pub async fn members(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<ServerMembers>> {
        self.http
            .execute(ApiRequest::get("/v1/agent/members"), options)
            .await
    }

    /// Servers a client agent is configured to talk to
    pub async fn servers(&self, options: Option<&QueryOptions>) -> Result<NomadResponse<Vec<String>>> {
        self.http
            .execute(ApiRequest::get("/v1/agent/servers"), options)
            .await
    }

    /// Replace the server list of a client agent
    pub async fn set_servers(&self, addresses: &[&str]) -> Result<NomadResponse<()>> {
        let request = addresses
            .iter()
            .fold(ApiRequest::put("/v1/agent/servers"), |r, a| {
                r.param("address", a)
            });
        self.http.execute_unit(request, None).await
    }

    /// Ask a server agent to join the given gossip addresses
    pub async fn join(&self, addresses: &[&str]) -> Result<NomadResponse<JoinResponse>> {
        let request = addresses
            .iter()
            .fold(ApiRequest::put("/v1/agent/join"), |r, a| {
                r.param("address", a)
            });
        self.http.execute(request, None).await
    }

    /// Force a failed member into the left state
    pub async fn force_leave(&self, node: &str) -> Result<NomadResponse<()>> {
        let request = ApiRequest::put("/v1/agent/force-leave").param("node", node);
        self.http.execute_unit(request, None).await
    }
}
