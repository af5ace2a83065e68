// Node model types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::job::Resources;
use crate::UnmappedProperties;

pub const NODE_STATUS_INIT: &str = "initializing";
pub const NODE_STATUS_READY: &str = "ready";
pub const NODE_STATUS_DOWN: &str = "down";

pub const NODE_SCHEDULING_ELIGIBLE: &str = "eligible";
pub const NODE_SCHEDULING_INELIGIBLE: &str = "ineligible";

/// A client node registered with the servers
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Node {
    #[serde(rename = "ID")]
    pub id: String,
    pub datacenter: String,
    pub name: String,
    /// Address the node's agent serves the HTTP API on (host:port)
    #[serde(rename = "HTTPAddr")]
    pub http_addr: String,
    #[serde(rename = "TLSEnabled")]
    pub tls_enabled: bool,
    pub attributes: Option<HashMap<String, String>>,
    pub resources: Option<Resources>,
    pub reserved: Option<Resources>,
    pub links: Option<HashMap<String, String>>,
    pub meta: Option<HashMap<String, String>>,
    pub node_class: String,
    pub drain: bool,
    pub drain_strategy: Option<DrainStrategy>,
    pub scheduling_eligibility: String,
    pub status: String,
    pub status_description: String,
    pub status_updated_at: i64,
    pub events: Option<Vec<NodeEvent>>,
    pub drivers: Option<HashMap<String, DriverInfo>>,
    pub create_index: u64,
    pub modify_index: u64,
    #[serde(flatten)]
    pub unmapped_properties: UnmappedProperties,
}

impl Node {
    /// Base URL of the node's own HTTP API
    pub fn http_url(&self) -> String {
        let scheme = if self.tls_enabled { "https" } else { "http" };
        format!("{}://{}", scheme, self.http_addr)
    }
}

/// Entry of `GET /v1/nodes`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NodeListStub {
    pub address: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub datacenter: String,
    pub name: String,
    pub node_class: String,
    pub version: String,
    pub drain: bool,
    pub scheduling_eligibility: String,
    pub status: String,
    pub status_description: String,
    pub drivers: Option<HashMap<String, DriverInfo>>,
    pub create_index: u64,
    pub modify_index: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DriverInfo {
    pub attributes: Option<HashMap<String, String>>,
    pub detected: bool,
    pub healthy: bool,
    pub health_description: String,
    pub update_time: Option<String>,
}

/// Drain settings sent with a drain request. Deadline is nanoseconds;
/// a negative deadline forces an immediate drain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DrainSpec {
    pub deadline: i64,
    pub ignore_system_jobs: bool,
}

/// Drain in progress, as reported on a node
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DrainStrategy {
    pub deadline: i64,
    pub ignore_system_jobs: bool,
    pub force_deadline: Option<String>,
    pub started_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NodeEvent {
    pub message: String,
    pub subsystem: String,
    pub details: Option<HashMap<String, String>>,
    pub timestamp: Option<String>,
    pub create_index: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NodeEvaluateResponse {
    #[serde(rename = "EvalIDs")]
    pub eval_ids: Option<Vec<String>>,
    pub eval_create_index: u64,
    pub node_modify_index: u64,
    pub index: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NodeDrainUpdateResponse {
    pub node_modify_index: u64,
    #[serde(rename = "EvalIDs")]
    pub eval_ids: Option<Vec<String>>,
    pub eval_create_index: u64,
    pub index: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NodeEligibilityUpdateResponse {
    pub node_modify_index: u64,
    #[serde(rename = "EvalIDs")]
    pub eval_ids: Option<Vec<String>>,
    pub eval_create_index: u64,
    pub index: u64,
}

// ============================================================================
// Host statistics (client agent)
// ============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HostStats {
    pub memory: Option<HostMemoryStats>,
    #[serde(rename = "CPU")]
    pub cpu: Option<Vec<HostCpuStats>>,
    pub disk_stats: Option<Vec<HostDiskStats>>,
    pub device_stats: Option<Vec<serde_json::Value>>,
    pub uptime: u64,
    #[serde(rename = "CPUTicksConsumed")]
    pub cpu_ticks_consumed: f64,
    pub timestamp: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HostMemoryStats {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub free: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HostCpuStats {
    #[serde(rename = "CPU")]
    pub cpu: String,
    pub user: f64,
    pub system: f64,
    pub idle: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HostDiskStats {
    pub device: String,
    pub mountpoint: String,
    pub size: u64,
    pub used: u64,
    pub available: u64,
    pub used_percent: f64,
    pub inodes_used_percent: f64,
}
