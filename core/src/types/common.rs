use serde::{Deserialize, Serialize};

use super::settings::MembershipTier;

/// One page of an offset-paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub rows: Vec<T>,
    /// Size of the whole collection, when the endpoint reports it.
    #[serde(default)]
    pub total: Option<u64>,
}

/// A company tag attached to customers. Tags are keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Minimal customer reference embedded in operations and orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerShortInfo {
    /// Company-scoped id.
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub membership_tier: Option<MembershipTier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cashier {
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
}
