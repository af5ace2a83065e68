//! System API: cluster maintenance operations

use crate::error::Result;
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::{QueryOptions, WriteOptions};

#[derive(Clone, Debug)]
pub struct SystemApi {
    http: NomadHttpClient,
}

impl SystemApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// Run a cluster-wide garbage collection
    pub async fn garbage_collect(&self, options: Option<&WriteOptions>) -> Result<()> {
        let request = ApiRequest::put("/v1/system/gc");
        self.execute(request, options).await
    }

    /// Recompute job summaries from the state store
    pub async fn reconcile_summaries(&self, options: Option<&WriteOptions>) -> Result<()> {
        let request = ApiRequest::put("/v1/system/reconcile/summaries");
        self.execute(request, options).await
    }

    // no index header on these responses
    async fn execute(&self, request: ApiRequest, options: Option<&WriteOptions>) -> Result<()> {
        let query = options.map(|o| QueryOptions {
            region: o.region.clone(),
            namespace: o.namespace.clone(),
            auth_token: o.auth_token.clone(),
            ..Default::default()
        });
        self.http.execute_unit(request, query.as_ref()).await?;
        Ok(())
    }
}
