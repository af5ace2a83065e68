//! Allocations API: `/v1/allocations` and `/v1/allocation/<id>`

use nomad_api_model::{AllocStopResponse, Allocation, AllocationListStub};

use crate::error::Result;
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::{QueryOptions, WriteOptions};
use crate::response::{ServerQueryResponse, ServerResponse};

#[derive(Clone, Debug)]
pub struct AllocationsApi {
    http: NomadHttpClient,
}

impl AllocationsApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// List allocations; `options.prefix` filters by ID prefix
    pub async fn list(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<AllocationListStub>>> {
        self.http
            .query(ApiRequest::get("/v1/allocations"), options)
            .await
    }

    pub async fn info(
        &self,
        alloc_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Allocation>> {
        let request = ApiRequest::get("/v1/allocation").segment(alloc_id);
        self.http.query(request, options).await
    }

    /// Stop an allocation; the scheduler replaces it
    pub async fn stop(
        &self,
        alloc_id: &str,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<AllocStopResponse>> {
        let request = ApiRequest::put("/v1/allocation")
            .segment(alloc_id)
            .segment("stop");
        self.http.write(request, options).await
    }
}
