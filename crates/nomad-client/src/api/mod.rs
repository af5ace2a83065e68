//! Per-resource APIs, handed out by [`NomadApiClient`](crate::NomadApiClient)

mod acl;
mod agent;
mod allocations;
mod client;
mod deployments;
mod evaluations;
mod jobs;
mod namespaces;
mod nodes;
mod regions;
mod status;
mod system;

pub use acl::{AclPoliciesApi, AclTokensApi};
pub use agent::AgentApi;
pub use allocations::AllocationsApi;
pub use client::{ClientApi, LogType, StreamOrigin};
pub use deployments::DeploymentsApi;
pub use evaluations::EvaluationsApi;
pub use jobs::{JobsApi, ScalingRequest};
pub use namespaces::NamespacesApi;
pub use nodes::NodesApi;
pub use regions::RegionsApi;
pub use status::StatusApi;
pub use system::SystemApi;
