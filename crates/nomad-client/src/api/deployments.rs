//! Deployments API: `/v1/deployments` and `/v1/deployment/...`

use nomad_api_model::{AllocationListStub, Deployment, DeploymentUpdateResponse};
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::error::Result;
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::{QueryOptions, WriteOptions};
use crate::response::{ServerQueryResponse, ServerResponse};

#[derive(Clone, Debug)]
pub struct DeploymentsApi {
    http: NomadHttpClient,
}

#[skip_serializing_none]
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PromoteBody<'a> {
    #[serde(rename = "DeploymentID")]
    deployment_id: &'a str,
    all: bool,
    groups: Option<&'a [String]>,
}

impl DeploymentsApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// List deployments; `options.prefix` filters by ID prefix
    pub async fn list(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<Deployment>>> {
        self.http
            .query(ApiRequest::get("/v1/deployments"), options)
            .await
    }

    pub async fn info(
        &self,
        deployment_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Deployment>> {
        let request = ApiRequest::get("/v1/deployment").segment(deployment_id);
        self.http.query(request, options).await
    }

    pub async fn allocations(
        &self,
        deployment_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<AllocationListStub>>> {
        let request = ApiRequest::get("/v1/deployment")
            .segment("allocations")
            .segment(deployment_id);
        self.http.query(request, options).await
    }

    /// Mark a deployment failed, rolling back if the job asks for it
    pub async fn fail(
        &self,
        deployment_id: &str,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<DeploymentUpdateResponse>> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(rename = "DeploymentID")]
            deployment_id: &'a str,
        }

        let request = ApiRequest::put("/v1/deployment/fail")
            .segment(deployment_id)
            .json(&Body { deployment_id })?;
        self.http.write(request, options).await
    }

    /// Pause or resume a deployment
    pub async fn pause(
        &self,
        deployment_id: &str,
        pause: bool,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<DeploymentUpdateResponse>> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            #[serde(rename = "DeploymentID")]
            deployment_id: &'a str,
            pause: bool,
        }

        let request = ApiRequest::put("/v1/deployment/pause")
            .segment(deployment_id)
            .json(&Body {
                deployment_id,
                pause,
            })?;
        self.http.write(request, options).await
    }

    /// Promote the canaries of every task group
    pub async fn promote_all(
        &self,
        deployment_id: &str,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<DeploymentUpdateResponse>> {
        self.promote(
            deployment_id,
            PromoteBody {
                deployment_id,
                all: true,
                groups: None,
            },
            options,
        )
        .await
    }

    /// Promote the canaries of the named task groups
    pub async fn promote_groups(
        &self,
        deployment_id: &str,
        groups: &[String],
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<DeploymentUpdateResponse>> {
        self.promote(
            deployment_id,
            PromoteBody {
                deployment_id,
                all: false,
                groups: Some(groups),
            },
            options,
        )
        .await
    }

    async fn promote(
        &self,
        deployment_id: &str,
        body: PromoteBody<'_>,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<DeploymentUpdateResponse>> {
        let request = ApiRequest::put("/v1/deployment/promote")
            .segment(deployment_id)
            .json(&body)?;
        self.http.write(request, options).await
    }

    /// Manually set the health of allocations in a deployment
    pub async fn set_alloc_health(
        &self,
        deployment_id: &str,
        healthy_alloc_ids: &[String],
        unhealthy_alloc_ids: &[String],
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<DeploymentUpdateResponse>> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(rename = "DeploymentID")]
            deployment_id: &'a str,
            #[serde(rename = "HealthyAllocationIDs")]
            healthy: &'a [String],
            #[serde(rename = "UnhealthyAllocationIDs")]
            unhealthy: &'a [String],
        }

        let request = ApiRequest::put("/v1/deployment/allocation-health")
            .segment(deployment_id)
            .json(&Body {
                deployment_id,
                healthy: healthy_alloc_ids,
                unhealthy: unhealthy_alloc_ids,
            })?;
        self.http.write(request, options).await
    }
}
