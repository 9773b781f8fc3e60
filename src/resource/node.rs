//! Resource Nodes
//!
//! Typed view of the entries of a resource-view response. Every field is
//! optional: the API omits or nulls fields freely, and absence must stay
//! visible as `None` rather than a defaulted value.
//!
//! Entries stay raw JSON until classified. Only deployment and machine
//! entries are decoded; any other type is skipped whatever its shape.

use crate::error::{ReadError, ReadResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Relation name of the link pointing at a deployment's children
pub const CHILD_RESOURCES_REL: &str = "GET: Child Resources";

/// Discriminators marking the deployment root
const DEPLOYMENT_TYPES: &[&str] = &["deployment", "composition.resource.type.deployment"];

/// Discriminators marking a virtual machine
const VIRTUAL_TYPES: &[&str] = &["infrastructure.virtual", "Infrastructure.Virtual"];

/// Response body of the resource-view and child-resource endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceView {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<Value>,
}

impl ResourceView {
    /// Decode the deployment and machine entries in order
    pub fn nodes(&self) -> ReadResult<Vec<ResourceNode>> {
        self.content.iter().filter_map(decode_node).collect()
    }
}

fn decode_node(raw: &Value) -> Option<ReadResult<ResourceNode>> {
    let resource_type = raw.get("resourceType").and_then(Value::as_str);
    if ResourceKind::from_type(resource_type) == ResourceKind::Other {
        tracing::trace!(resource_type = ?resource_type, "skipping non-machine resource");
        return None;
    }

    Some(ResourceNode::deserialize(raw).map_err(|e| {
        let label = ["resourceId", "name"]
            .iter()
            .find_map(|key| raw.get(*key).and_then(Value::as_str))
            .unwrap_or("<unnamed>");
        ReadError::malformed(label, e.to_string())
    }))
}

/// One entry of a resource view
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNode {
    pub resource_type: Option<String>,
    pub name: Option<String>,
    pub resource_id: Option<String>,
    pub request_id: Option<String>,
    pub parent_resource_id: Option<String>,
    pub request_state: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub date_created: Option<String>,
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_children: bool,
    pub catalog_item_id: Option<String>,
    pub catalog_item_label: Option<String>,
    pub tenant_id: Option<String>,
    pub business_group_id: Option<String>,
    pub business_group_name: Option<String>,
    pub lease: Option<LeaseWindow>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owners: Vec<Owner>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
    /// Type-specific data bag
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Map<String, Value>,
}

/// Treat an explicit `null` like an absent field for collection-like values
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw lease window as returned on the deployment node
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaseWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Deployment owner
///
/// vRA reports owners as `{ref, value}` principals; `{id, name}` is accepted
/// too, and so is a bare principal name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OwnerRepr")]
pub struct Owner {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OwnerRepr {
    Principal {
        #[serde(default, alias = "ref")]
        id: Option<String>,
        #[serde(default, alias = "value")]
        name: Option<String>,
    },
    Name(String),
}

impl From<OwnerRepr> for Owner {
    fn from(repr: OwnerRepr) -> Self {
        match repr {
            OwnerRepr::Principal { id, name } => Self { id, name },
            OwnerRepr::Name(id) => Self { id: Some(id), name: None },
        }
    }
}

/// Hypermedia link attached to a node
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub rel: Option<String>,
    pub href: Option<String>,
}

/// Category of a node, from its `resourceType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Deployment,
    Virtual,
    Other,
}

impl ResourceKind {
    /// Classify a discriminator; unknown or missing values are `Other`
    pub fn from_type(resource_type: Option<&str>) -> Self {
        match resource_type {
            Some(t) if DEPLOYMENT_TYPES.contains(&t) => Self::Deployment,
            Some(t) if VIRTUAL_TYPES.contains(&t) => Self::Virtual,
            _ => Self::Other,
        }
    }
}

impl ResourceNode {
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::from_type(self.resource_type.as_deref())
    }

    /// Best available label for diagnostics
    pub fn label(&self) -> &str {
        self.resource_id
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("<unnamed>")
    }

    /// Href of the child-resources link, only when the node claims children
    pub fn child_resources_href(&self) -> Option<&str> {
        if !self.has_children {
            return None;
        }
        self.links
            .iter()
            .filter(|l| l.rel.as_deref() == Some(CHILD_RESOURCES_REL))
            .filter_map(|l| l.href.as_deref())
            .last()
    }

    /// String field from the data bag; null and non-string values count as absent
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}
