//! Namespaces API (Nomad Enterprise)

use nomad_api_model::Namespace;

use crate::error::{NomadError, Result};
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::{QueryOptions, WriteOptions};
use crate::response::{ServerQueryResponse, ServerResponse};

#[derive(Clone, Debug)]
pub struct NamespacesApi {
    http: NomadHttpClient,
}

impl NamespacesApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// List namespaces; `options.prefix` filters by name prefix
    pub async fn list(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<Namespace>>> {
        self.http
            .query(ApiRequest::get("/v1/namespaces"), options)
            .await
    }

    pub async fn info(
        &self,
        name: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Namespace>> {
        let request = ApiRequest::get("/v1/namespace").segment(name);
        self.http.query(request, options).await
    }

    /// Create or update a namespace
    pub async fn register(
        &self,
        namespace: &Namespace,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<()>> {
        if namespace.name.is_empty() {
            return Err(NomadError::InvalidRequest(
                "namespace has no name".to_string(),
            ));
        }
        let request = ApiRequest::put("/v1/namespace")
            .segment(&namespace.name)
            .json(namespace)?;
        self.http.write_unit(request, options).await
    }

    pub async fn delete(
        &self,
        name: &str,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<()>> {
        let request = ApiRequest::delete("/v1/namespace").segment(name);
        self.http.write_unit(request, options).await
    }
}
