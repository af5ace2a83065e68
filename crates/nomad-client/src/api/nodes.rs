//! Nodes API: `/v1/nodes` and `/v1/node/<id>/...`

use nomad_api_model::{
    Allocation, DrainSpec, Node, NodeDrainUpdateResponse, NodeEligibilityUpdateResponse,
    NodeEvaluateResponse, NodeListStub,
    node::{NODE_SCHEDULING_ELIGIBLE, NODE_SCHEDULING_INELIGIBLE},
};
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::error::Result;
use crate::http::{ApiRequest, NomadHttpClient};
use crate::options::{QueryOptions, WriteOptions};
use crate::response::{ServerQueryResponse, ServerResponse};

#[derive(Clone, Debug)]
pub struct NodesApi {
    http: NomadHttpClient,
}

impl NodesApi {
    pub(crate) fn new(http: NomadHttpClient) -> Self {
        Self { http }
    }

    /// List client nodes; `options.prefix` filters by ID prefix
    pub async fn list(
        &self,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<NodeListStub>>> {
        self.http.query(ApiRequest::get("/v1/nodes"), options).await
    }

    pub async fn info(
        &self,
        node_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Node>> {
        self.http.query(node_path(node_id), options).await
    }

    /// Allocations placed on a node
    pub async fn allocations(
        &self,
        node_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<ServerQueryResponse<Vec<Allocation>>> {
        self.http
            .query(node_path(node_id).segment("allocations"), options)
            .await
    }

    /// Create evaluations for every job with allocations on the node
    pub async fn force_evaluate(
        &self,
        node_id: &str,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<NodeEvaluateResponse>> {
        let request = ApiRequest::put("/v1/node")
            .segment(node_id)
            .segment("evaluate");
        self.http.write(request, options).await
    }

    /// Start draining a node with `spec`, or cancel a drain with None.
    ///
    /// `mark_eligible` makes the node eligible again when cancelling.
    pub async fn toggle_drain(
        &self,
        node_id: &str,
        spec: Option<&DrainSpec>,
        mark_eligible: bool,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<NodeDrainUpdateResponse>> {
        #[skip_serializing_none]
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            #[serde(rename = "NodeID")]
            node_id: &'a str,
            drain_spec: Option<&'a DrainSpec>,
            mark_eligible: bool,
        }

        let request = ApiRequest::put("/v1/node")
            .segment(node_id)
            .segment("drain")
            .json(&Body {
                node_id,
                drain_spec: spec,
                mark_eligible,
            })?;
        self.http.write(request, options).await
    }

    /// Allow or forbid scheduling new allocations on a node
    pub async fn toggle_eligibility(
        &self,
        node_id: &str,
        eligible: bool,
        options: Option<&WriteOptions>,
    ) -> Result<ServerResponse<NodeEligibilityUpdateResponse>> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            #[serde(rename = "NodeID")]
            node_id: &'a str,
            eligibility: &'static str,
        }

        let eligibility = if eligible {
            NODE_SCHEDULING_ELIGIBLE
        } else {
            NODE_SCHEDULING_INELIGIBLE
        };
        let request = ApiRequest::put("/v1/node")
            .segment(node_id)
            .segment("eligibility")
            .json(&Body {
                node_id,
                eligibility,
            })?;
        self.http.write(request, options).await
    }
}

fn node_path(node_id: &str) -> ApiRequest {
    ApiRequest::get("/v1/node").segment(node_id)
}
