use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One entry of the `GET /activities` body, keyed by activity name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

/// Body of `GET /activities`. Key order is the registry's order.
pub type CatalogResponse = IndexMap<String, ActivityRecord>;

/// Success body of the signup and unregister endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
