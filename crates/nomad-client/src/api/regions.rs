//! Regions API

use crate::error::Result;
use crate::http::{ApiRequest, NomadHttpClient};
use crate::response::NomadResponse;

#[derive(Clone, Debug)]
pub struct RegionsApi {
    http: NomadHttpClient,
}

impl RegionsApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// Names of all known regions
    pub async fn list(&self) -> Result<NomadResponse<Vec<String>>> {
        self.http.execute(ApiRequest::get("/v1/regions"), None).await
    }
}
