//! Shared fixtures for deployment read tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;
use vra_state::error::ApiError;
use vra_state::resource::{DeploymentApi, ResourceView};

pub const CHILD_HREF: &str =
    "https://vra.example.com/catalog-service/api/consumer/resourceViews/dep-1/children";

/// Collaborator call, as recorded by [`FakeApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Resolve(String),
    View(String),
    Children(String),
}

/// In-memory deployment API
pub struct FakeApi {
    /// Request id every deployment id resolves to; `None` fails resolution
    pub resolved: Option<String>,
    /// Resource view body, or the status it fails with
    pub view: Result<Value, u16>,
    /// Child resources body, or the status it fails with
    pub children: Result<Value, u16>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new(view: Value) -> Self {
        Self {
            resolved: Some("req-1".to_string()),
            view: Ok(view),
            children: Ok(json!({"content": []})),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_children(mut self, children: Value) -> Self {
        self.children = Ok(children);
        self
    }

    pub fn failing_children(mut self, status: u16) -> Self {
        self.children = Err(status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(body: &Result<Value, u16>) -> Result<ResourceView, ApiError> {
        match body {
            Ok(value) => Ok(serde_json::from_value(value.clone())?),
            Err(status) => Err(ApiError::Status { status: *status }),
        }
    }
}

#[async_trait]
impl DeploymentApi for FakeApi {
    async fn resolve_request_id(&self, deployment_id: &str) -> Result<String, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Resolve(deployment_id.to_string()));
        self.resolved
            .clone()
            .ok_or(ApiError::MissingField("requestId"))
    }

    async fn fetch_resource_view(&self, request_id: &str) -> Result<ResourceView, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::View(request_id.to_string()));
        Self::answer(&self.view)
    }

    async fn fetch_child_resources(&self, href: &str) -> Result<ResourceView, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Children(href.to_string()));
        Self::answer(&self.children)
    }
}

/// Deployment root node
pub fn deployment(lease_end: Option<&str>, child_href: Option<&str>) -> Value {
    let mut node = json!({
        "resourceType": "composition.resource.type.deployment",
        "name": "CentOS-001",
        "resourceId": "dep-1",
        "requestId": "req-1",
        "requestState": "SUCCESSFUL",
        "status": "ACTIVE",
        "description": "demo deployment",
        "catalogItemId": "cat-1",
        "catalogItemLabel": "CentOS 7",
        "tenantId": "vsphere.local",
        "businessGroupId": "bg-1",
        "dateCreated": "2022-12-31T12:00:00.000Z",
        "lastUpdated": "2022-12-31T12:30:00.000Z",
        "hasChildren": false,
        "lease": {"start": "2023-01-01T00:00:00Z", "end": lease_end},
        "owners": [
            {"tenantName": "vsphere.local", "ref": "jdoe@vsphere.local", "type": "USER", "value": "J Doe"}
        ],
        "links": [],
        "data": {}
    });

    if let Some(href) = child_href {
        node["hasChildren"] = json!(true);
        node["links"] = json!([{"@type": "link", "rel": "GET: Child Resources", "href": href}]);
    }
    node
}

/// Virtual machine node
pub fn vm(name: &str, component: &str, ip: &str) -> Value {
    json!({
        "resourceType": "Infrastructure.Virtual",
        "name": name,
        "resourceId": format!("{name}-id"),
        "requestId": "req-1",
        "parentResourceId": "dep-1",
        "requestState": "SUCCESSFUL",
        "status": "On",
        "description": null,
        "dateCreated": "2023-01-01T00:05:00.000Z",
        "lastUpdated": "2023-01-01T00:10:00.000Z",
        "data": {"Component": component, "ip_address": ip, "MachineCPU": 2}
    })
}

/// Node of a type the flattener does not know
pub fn network(name: &str) -> Value {
    json!({
        "resourceType": "Infrastructure.Network.Network.Existing",
        "name": name,
        "resourceId": format!("{name}-id"),
        "parentResourceId": "dep-1",
        "data": {"Component": "net"}
    })
}

pub fn view(nodes: Vec<Value>) -> Value {
    json!({ "links": [], "content": nodes, "metadata": {"size": 20, "totalElements": 1} })
}
