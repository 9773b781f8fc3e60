//! Deployment Reader
//!
//! Entry point of a read: resolves the request id, fetches the resource view
//! and assembles the flattened [`DeploymentRecord`]. Nothing is persisted
//! here; the caller stores the record or reacts to the error.

use super::api::DeploymentApi;
use super::coerce::now_rfc3339;
use super::flatten;
use super::identity::{self, ReadRequest};
use super::projector;
use super::record::DeploymentRecord;
use crate::error::{ReadError, ReadResult};
use chrono::{DateTime, Utc};
use tracing::Instrument;

/// Per-read inputs that are not identifiers
#[derive(Debug, Clone)]
pub struct ReadContext {
    /// Reference time for lease computations
    pub now: DateTime<Utc>,
    /// Span all diagnostics of the read are recorded under
    pub span: tracing::Span,
}

impl ReadContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            span: tracing::info_span!("read_deployment"),
        }
    }

    /// Context anchored at the current time
    pub fn now() -> Self {
        Self::new(now_rfc3339())
    }

    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }
}

/// Read a deployment and flatten it
pub async fn read_deployment(
    api: &dyn DeploymentApi,
    request: &ReadRequest,
    ctx: &ReadContext,
) -> ReadResult<DeploymentRecord> {
    read(api, request, ctx.now)
        .instrument(ctx.span.clone())
        .await
}

async fn read(
    api: &dyn DeploymentApi,
    request: &ReadRequest,
    now: DateTime<Utc>,
) -> ReadResult<DeploymentRecord> {
    let request_id = identity::resolve_request_id(api, request).await?;

    let view = api
        .fetch_resource_view(&request_id)
        .await
        .map_err(|source| ReadError::ResourceViewFetchFailed {
            request_id: request_id.clone(),
            source,
        })?;
    let nodes = view.nodes()?;
    tracing::debug!(
        request_id = %request_id,
        entries = view.content.len(),
        nodes = nodes.len(),
        "fetched resource view"
    );

    let root_idx = projector::locate_root(&request_id, &nodes)?;
    let projection = projector::project(&nodes[root_idx], now)?;

    let children = projector::children(api, &request_id, &nodes, root_idx).await?;
    let flattened = flatten::flatten(children.iter())?;
    tracing::debug!(
        machines = flattened.configs.len(),
        components = flattened.counts.components(),
        "flattened deployment"
    );

    let record = projection.into_record(request_id, flattened.into_annotated());
    tracing::info!(
        "Finished reading deployment {} with request id {}",
        record.deployment_id.as_deref().unwrap_or("-"),
        record.id
    );
    Ok(record)
}
