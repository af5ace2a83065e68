//! Evaluations API

use nomad_api_model::{AllocationListStub, Evaluation};

use crate::error::Result;
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::QueryOptions;
use crate::response::ServerQueryResponse;

#[derive(Clone, Debug)]
pub struct EvaluationsApi {
    http: NomadHttpClient,
}

impl EvaluationsApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<Evaluation>>> {
        self.http
            .query(ApiRequest::get("/v1/evaluations"), options)
            .await
    }

    pub async fn info(
        &self,
        eval_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Evaluation>> {
        let request = ApiRequest::get("/v1/evaluation").segment(eval_id);
        self.http.query(request, options).await
    }

    /// Allocations created or updated by an evaluation
    pub async fn allocations(
        &self,
        eval_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<AllocationListStub>>> {
        let request = ApiRequest::get("/v1/evaluation")
            .segment(eval_id)
            .segment("allocations");
        self.http.query(request, options).await
    }
}
