//! ACL policies and tokens

use nomad_api_model::{AclPolicy, AclPolicyListStub, AclToken, AclTokenListStub};

use crate::error::{NomadError, Result};
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::{QueryOptions, WriteOptions};
use crate::response::{ServerQueryResponse, ServerResponse};

#[derive(Clone, Debug)]
pub struct AclPoliciesApi {
    http: NomadHttpClient,
}

impl AclPoliciesApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    pub async fn list(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<AclPolicyListStub>>> {
        self.http
            .query(ApiRequest::get("/v1/acl/policies"), options)
            .await
    }

    pub async fn info(
        &self,
        name: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<AclPolicy>> {
        let request = ApiRequest::get("/v1/acl/policy").segment(name);
        self.http.query(request, options).await
    }

    /// Create or replace a policy
    pub async fn upsert(
        &self,
        policy: &AclPolicy,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<()>> {
        if policy.name.is_empty() {
            return Err(NomadError::InvalidRequest("policy has no name".to_string()));
        }
        let request = ApiRequest::put("/v1/acl/policy")
            .segment(&policy.name)
            .json(policy)?;
        self.http.write_unit(request, options).await
    }

    pub async fn delete(
        &self,
        name: &str,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<()>> {
        let request = ApiRequest::delete("/v1/acl/policy").segment(name);
        self.http.write_unit(request, options).await
    }
}

#[derive(Clone, Debug)]
pub struct AclTokensApi {
    http: NomadHttpClient,
}

impl AclTokensApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// Create the initial management token; only succeeds once per cluster
    pub async fn bootstrap(
        &self,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<AclToken>> {
        self.http
            .write(ApiRequest::put("/v1/acl/bootstrap"), options)
            .await
    }

    pub async fn list(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<AclTokenListStub>>> {
        self.http
            .query(ApiRequest::get("/v1/acl/tokens"), options)
            .await
    }

    pub async fn info(
        &self,
        accessor_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<AclToken>> {
        let request = ApiRequest::get("/v1/acl/token").segment(accessor_id);
        self.http.query(request, options).await
    }

    /// The token the request is authenticated with
    pub async fn self_token(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<AclToken>> {
        self.http
            .query(ApiRequest::get("/v1/acl/token/self"), options)
            .await
    }

    /// Create a token; the response carries the assigned accessor and secret
    pub async fn create(
        &self,
        token: &AclToken,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<AclToken>> {
        if token.accessor_id.is_some() {
            return Err(NomadError::InvalidRequest(
                "new token must not have an accessor ID".to_string(),
            ));
        }
        let request = ApiRequest::put("/v1/acl/token").json(token)?;
        self.http.write(request, options).await
    }

    pub async fn update(
        &self,
        token: &AclToken,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<AclToken>> {
        let accessor_id = match token.accessor_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => {
                return Err(NomadError::InvalidRequest(
                    "token has no accessor ID".to_string(),
                ));
            }
        };
        let request = ApiRequest::put("/v1/acl/token")
            .segment(accessor_id)
            .json(token)?;
        self.http.write(request, options).await
    }

    pub async fn delete(
        &self,
        accessor_id: &str,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<()>> {
        let request = ApiRequest::delete("/v1/acl/token").segment(accessor_id);
        self.http.write_unit(request, options).await
    }
}
