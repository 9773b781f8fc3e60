//! Identity Resolver
//!
//! A read may be keyed by the request id or by the deployment id. The
//! deployment id wins when both are given.

use super::api::DeploymentApi;
use crate::error::{ReadError, ReadResult};

/// Identifiers a read was asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadRequest {
    /// Request id, as persisted by an earlier read
    pub id: Option<String>,
    pub deployment_id: Option<String>,
}

impl ReadRequest {
    pub fn new(id: Option<String>, deployment_id: Option<String>) -> Self {
        Self { id, deployment_id }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new(Some(id.into()), None)
    }

    pub fn by_deployment_id(deployment_id: impl Into<String>) -> Self {
        Self::new(None, Some(deployment_id.into()))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Determine the request id to fetch the resource view with
pub async fn resolve_request_id(
    api: &dyn DeploymentApi,
    request: &ReadRequest,
) -> ReadResult<String> {
    if let Some(deployment_id) = present(&request.deployment_id) {
        let request_id = api
            .resolve_request_id(deployment_id)
            .await
            .map_err(|source| ReadError::IdentityResolutionFailed {
                deployment_id: deployment_id.to_string(),
                source,
            })?;
        tracing::debug!(deployment_id, request_id = %request_id, "resolved deployment id");
        return Ok(request_id);
    }

    match present(&request.id) {
        Some(id) => Ok(id.to_string()),
        None => Err(ReadError::MissingIdentifier),
    }
}
