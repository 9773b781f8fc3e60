//! Deployment API
//!
//! The network calls a deployment read depends on. [`crate::vra::VraClient`]
//! implements it over HTTP.

use super::node::ResourceView;
use crate::error::ApiError;
use async_trait::async_trait;

#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// Resolve a deployment id to the id of the request that created it
    async fn resolve_request_id(&self, deployment_id: &str) -> Result<String, ApiError>;

    /// Fetch the resource view of a request
    async fn fetch_resource_view(&self, request_id: &str) -> Result<ResourceView, ApiError>;

    /// Fetch the children behind a child-resources link
    async fn fetch_child_resources(&self, href: &str) -> Result<ResourceView, ApiError>;
}
