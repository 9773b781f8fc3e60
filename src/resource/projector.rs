//! Deployment Projector
//!
//! Extracts the scalar attributes of the deployment root and finds its
//! children, either inline in the same resource view or behind the
//! child-resources link.

use super::api::DeploymentApi;
use super::coerce::optional_timestamp;
use super::lease::Lease;
use super::node::{Owner, ResourceKind, ResourceNode};
use super::record::{DeploymentRecord, ResourceConfiguration};
use crate::error::{ReadError, ReadResult};
use chrono::{DateTime, Utc};

/// Scalar attributes of a deployment, before its machines are attached
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentProjection {
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
    pub lease: Lease,
    pub owners: Vec<Owner>,
}

impl DeploymentProjection {
    /// Assemble the final record
    pub fn into_record(
        self,
        request_id: String,
        resource_configuration: Vec<ResourceConfiguration>,
    ) -> DeploymentRecord {
        DeploymentRecord {
            id: request_id,
            deployment_id: self.deployment_id,
            name: self.name,
            catalog_item_id: self.catalog_item_id,
            catalog_item_name: self.catalog_item_name,
            description: self.description,
            request_status: self.request_status,
            tenant_id: self.tenant_id,
            business_group_id: self.business_group_id,
            business_group_name: self.business_group_name,
            date_created: self.date_created,
            last_updated: self.last_updated,
            lease_start: self.lease.start,
            lease_end: self.lease.end,
            lease_days: self.lease.days_remaining,
            owners: self.owners,
            resource_configuration,
        }
    }
}

/// Index of the single deployment root in `content`
///
/// No root means the request no longer has a deployment; more than one is
/// not a shape the API produces.
pub fn locate_root(request_id: &str, content: &[ResourceNode]) -> ReadResult<usize> {
    let mut roots = content
        .iter()
        .enumerate()
        .filter(|(_, node)| node.kind() == ResourceKind::Deployment)
        .map(|(idx, _)| idx);

    let Some(first) = roots.next() else {
        return Err(ReadError::ResourceNotFound {
            request_id: request_id.to_string(),
        });
    };

    let extra = roots.count();
    if extra > 0 {
        return Err(ReadError::malformed(
            request_id,
            format!("resource view holds {} deployment nodes", extra + 1),
        ));
    }

    Ok(first)
}

/// Project the root's own attributes
pub fn project(root: &ResourceNode, now: DateTime<Utc>) -> ReadResult<DeploymentProjection> {
    let label = root.label();

    Ok(DeploymentProjection {
        deployment_id: root.resource_id.clone(),
        name: root.name.clone(),
        catalog_item_id: root.catalog_item_id.clone(),
        catalog_item_name: root.catalog_item_label.clone(),
        description: root.description.clone(),
        request_status: root.status.clone(),
        tenant_id: root.tenant_id.clone(),
        business_group_id: root.business_group_id.clone(),
        business_group_name: root.business_group_name.clone(),
        date_created: optional_timestamp(label, "dateCreated", root.date_created.as_deref())?,
        last_updated: optional_timestamp(label, "lastUpdated", root.last_updated.as_deref())?,
        lease: Lease::from_window(label, root.lease.as_ref(), now)?,
        owners: root.owners.clone(),
    })
}

/// Children of a deployment root
#[derive(Debug)]
pub enum Children<'a> {
    /// Embedded in the resource view next to the root
    Inline {
        content: &'a [ResourceNode],
        root_idx: usize,
    },
    /// Fetched through the child-resources link
    Linked(Vec<ResourceNode>),
}

impl Children<'_> {
    pub fn iter(&self) -> Box<dyn Iterator<Item = &ResourceNode> + '_> {
        match self {
            Children::Inline { content, root_idx } => Box::new(
                content
                    .iter()
                    .enumerate()
                    .filter(move |(idx, _)| idx != root_idx)
                    .map(|(_, node)| node),
            ),
            Children::Linked(nodes) => Box::new(nodes.iter()),
        }
    }
}

/// Find the children of the root at `root_idx` in `content`
///
/// Follows the child-resources link when the root has one; an empty answer
/// there means the deployment was deleted remotely.
pub(crate) async fn children<'a>(
    api: &dyn DeploymentApi,
    request_id: &str,
    content: &'a [ResourceNode],
    root_idx: usize,
) -> ReadResult<Children<'a>> {
    let Some(root) = content.get(root_idx) else {
        return Err(ReadError::ResourceNotFound {
            request_id: request_id.to_string(),
        });
    };

    let Some(href) = root.child_resources_href() else {
        tracing::debug!(inline = content.len() - 1, "using inline children");
        return Ok(Children::Inline { content, root_idx });
    };

    tracing::debug!(href, "following child resources link");
    let view = api
        .fetch_child_resources(href)
        .await
        .map_err(|source| ReadError::ChildResourceFetchFailed {
            href: href.to_string(),
            source,
        })?;

    if view.content.is_empty() {
        tracing::warn!(request_id, "child resources are empty, deployment is gone");
        return Err(ReadError::ResourceNotFound {
            request_id: request_id.to_string(),
        });
    }

    Ok(Children::Linked(view.nodes()?))
}
