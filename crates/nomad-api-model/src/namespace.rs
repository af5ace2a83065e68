// Namespace model types

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::UnmappedProperties;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Namespace information. Registered as-is, so unset fields are omitted.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Namespace {
    pub name: String,
    pub description: Option<String>,
    pub quota: Option<String>,
    pub create_index: Option<u64>,
    pub modify_index: Option<u64>,
    #[serde(flatten)]
    pub unmapped_properties: UnmappedProperties,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
