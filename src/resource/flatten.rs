//! Graph Flattener
//!
//! Projects the children of a deployment into flat [`ResourceConfiguration`]s.
//! Only virtual machines are kept; other resource types are skipped.

use super::cluster::{self, ClusterCountMap};
use super::coerce::optional_timestamp;
use super::node::{ResourceKind, ResourceNode};
use super::record::ResourceConfiguration;
use crate::error::{ReadError, ReadResult};

/// Data bag key holding the blueprint component a machine belongs to
pub const COMPONENT_KEY: &str = "Component";

/// Data bag key holding a machine's IP address
pub const IP_ADDRESS_KEY: &str = "ip_address";

/// Output of one flattening pass, before cluster sizes are known
#[derive(Debug, Default)]
pub struct Flattened {
    pub configs: Vec<ResourceConfiguration>,
    pub counts: ClusterCountMap,
}

impl Flattened {
    /// Second pass: write the cluster sizes
    pub fn into_annotated(self) -> Vec<ResourceConfiguration> {
        cluster::annotate(self.configs, &self.counts)
    }
}

/// Flatten `nodes` in order, counting machines per component as it goes
pub fn flatten<'a, I>(nodes: I) -> ReadResult<Flattened>
where
    I: IntoIterator<Item = &'a ResourceNode>,
{
    let mut out = Flattened::default();

    for node in nodes {
        match node.kind() {
            ResourceKind::Virtual => {
                let config = machine_configuration(node)?;
                out.counts.record(&config.component_name);
                out.configs.push(config);
            }
            ResourceKind::Deployment | ResourceKind::Other => {
                tracing::trace!(
                    resource = node.label(),
                    resource_type = ?node.resource_type,
                    "skipping non-machine resource"
                );
            }
        }
    }

    Ok(out)
}

/// Build the configuration of a single virtual machine
fn machine_configuration(node: &ResourceNode) -> ReadResult<ResourceConfiguration> {
    let label = node.label();

    let component_name = node
        .data_str(COMPONENT_KEY)
        .ok_or_else(|| ReadError::malformed(label, format!("data.{COMPONENT_KEY} is missing")))?;
    let ip_address = node
        .data_str(IP_ADDRESS_KEY)
        .ok_or_else(|| ReadError::malformed(label, format!("data.{IP_ADDRESS_KEY} is missing")))?;

    Ok(ResourceConfiguration {
        name: node.name.clone(),
        resource_id: node.resource_id.clone(),
        resource_type: node.resource_type.clone(),
        request_id: node.request_id.clone(),
        request_state: node.request_state.clone(),
        parent_resource_id: node.parent_resource_id.clone(),
        component_name: component_name.to_string(),
        cluster_size: 0,
        ip_address: ip_address.to_string(),
        status: node.status.clone(),
        description: node.description.clone(),
        date_created: optional_timestamp(label, "dateCreated", node.date_created.as_deref())?,
        last_updated: optional_timestamp(label, "lastUpdated", node.last_updated.as_deref())?,
    })
}
