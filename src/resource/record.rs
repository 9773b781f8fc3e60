//! Output Records
//!
//! The flat state written back after a read. Field names are the persisted
//! attribute names.

use super::node::Owner;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flattened state of one deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Request id the deployment was read through
    pub id: String,
    pub deployment_id: Option<String>,
    pub name: Option<String>,
    pub catalog_item_id: Option<String>,
    pub catalog_item_name: Option<String>,
    pub description: Option<String>,
    pub request_status: Option<String>,
    pub tenant_id: Option<String>,
    pub business_group_id: Option<String>,
    pub business_group_name: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub lease_start: DateTime<Utc>,
    pub lease_end: Option<DateTime<Utc>>,
    pub lease_days: Option<i64>,
    pub owners: Vec<Owner>,
    pub resource_configuration: Vec<ResourceConfiguration>,
}

/// One virtual machine of a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfiguration {
    pub name: Option<String>,
    pub resource_id: Option<String>,
    pub resource_type: Option<String>,
    pub request_id: Option<String>,
    pub request_state: Option<String>,
    pub parent_resource_id: Option<String>,
    pub component_name: String,
    /// Number of machines in the deployment sharing `component_name`
    pub cluster_size: u32,
    pub ip_address: String,
    pub status: Option<String>,
    pub description: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}
