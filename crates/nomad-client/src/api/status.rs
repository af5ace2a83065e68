//! Status API

use crate::error::Result;
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::QueryOptions;
use crate::response::NomadResponse;

/// Raft status of the server cluster
#[derive(Clone, Debug)]
pub struct StatusApi {
    http: NomadHttpClient,
}

impl StatusApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// RPC address of the leader; empty while there is none
    pub async fn leader(&self, options: Option<&QueryOptions>) -> Result<NomadResponse<String>> {
        self.http
            .execute(ApiRequest::get("/v1/status/leader"), options)
            .await
    }

    /// RPC addresses of the Raft peers
    pub async fn peers(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<NomadResponse<Vec<String>>> {
        self.http
            .execute(ApiRequest::get("/v1/status/peers"), options)
            .await
    }
}
