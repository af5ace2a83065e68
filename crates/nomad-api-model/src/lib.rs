//! Nomad API Model - request and response documents of the Nomad HTTP API
//!
//! Every type mirrors a JSON document the server produces or accepts. JSON
//! keys keep the server's PascalCase spelling.

pub mod acl;
pub mod agent;
pub mod allocation;
pub mod codec;
pub mod deployment;
pub mod evaluation;
pub mod job;
pub mod namespace;
pub mod node;
pub mod stream;

pub use acl::{AclPolicy, AclPolicyListStub, AclToken, AclTokenListStub};
pub use agent::{AgentHealth, AgentHealthResponse, AgentMember, JoinResponse, ServerMembers};
pub use allocation::{
    AllocDeploymentStatus, AllocFileInfo, AllocResourceUsage, AllocStopResponse,
    AllocatedCpuResources, AllocatedMemoryResources, AllocatedResources,
    AllocatedSharedResources, AllocatedTaskResources, Allocation, AllocationListStub,
    AllocationMetric, CpuStats, DesiredTransition, MemoryStats, RescheduleEvent,
    RescheduleTracker, ResourceUsage, TaskEvent, TaskResourceUsage, TaskState,
};
pub use deployment::{Deployment, DeploymentState, DeploymentUpdateResponse};
pub use evaluation::Evaluation;
pub use job::{
    Affinity, CheckRestart, Constraint, DispatchPayloadConfig, EphemeralDisk, Job,
    JobChildrenSummary, JobDispatchResponse, JobListStub, JobPlanResponse,
    JobScaleStatusResponse, JobSummary, JobValidateResponse, JobVersionsResponseData, LogConfig,
    MigrateStrategy, NetworkResource, ParameterizedJobConfig, PeriodicConfig, Port,
    ReschedulePolicy, Resources, RestartPolicy, ScalingEvent, Service, ServiceCheck, Spread,
    SpreadTarget, Task, TaskArtifact, TaskGroup, TaskGroupScaleStatus, TaskGroupSummary, Template,
    UpdateStrategy,
};
pub use namespace::Namespace;
pub use node::{
    DrainSpec, DrainStrategy, DriverInfo, HostCpuStats, HostDiskStats, HostMemoryStats, HostStats,
    Node, NodeDrainUpdateResponse, NodeEligibilityUpdateResponse, NodeEvaluateResponse, NodeEvent,
    NodeListStub,
};
pub use stream::StreamFrame;

/// Unknown JSON properties kept on the primary entities
pub type UnmappedProperties = std::collections::HashMap<String, serde_json::Value>;
