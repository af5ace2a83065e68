// ACL policy and token model types

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

pub const ACL_TOKEN_TYPE_CLIENT: &str = "client";
pub const ACL_TOKEN_TYPE_MANAGEMENT: &str = "management";

/// ACL policy. `rules` holds the HCL policy document.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AclPolicy {
    pub name: String,
    pub description: Option<String>,
    pub rules: String,
    pub create_index: Option<u64>,
    pub modify_index: Option<u64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AclPolicyListStub {
    pub name: String,
    pub description: String,
    pub create_index: u64,
    pub modify_index: u64,
}

/// ACL token. Accessor and secret IDs are assigned by the server on create.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AclToken {
    #[serde(rename = "AccessorID")]
    pub accessor_id: Option<String>,
    #[serde(rename = "SecretID")]
    pub secret_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub token_type: Option<String>,
    pub policies: Option<Vec<String>>,
    pub global: Option<bool>,
    pub create_time: Option<String>,
    pub create_index: Option<u64>,
    pub modify_index: Option<u64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AclTokenListStub {
    #[serde(rename = "AccessorID")]
    pub accessor_id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub token_type: String,
    pub policies: Option<Vec<String>>,
    pub global: bool,
    pub create_time: Option<String>,
    pub create_index: u64,
    pub modify_index: u64,
}
