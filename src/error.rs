//! Error types
//!
//! [`ApiError`] covers failures of the vRA HTTP collaborator, [`ReadError`]
//! is what a deployment read surfaces to its caller.

use thiserror::Error;

/// Errors raised while talking to the vRA catalog service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed: {status}")]
    Status { status: u16 },

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Response is missing field `{0}`")]
    MissingField(&'static str),
}

/// Errors raised by a deployment read
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("One of id or deployment_id must be assigned")]
    MissingIdentifier,

    #[error("Failed to resolve request id for deployment {deployment_id}: {source}")]
    IdentityResolutionFailed {
        deployment_id: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to fetch resource view for request {request_id}: {source}")]
    ResourceViewFetchFailed {
        request_id: String,
        #[source]
        source: ApiError,
    },

    #[error("The resource cannot be found (request {request_id})")]
    ResourceNotFound { request_id: String },

    #[error("Resource view failed to load from {href}: {source}")]
    ChildResourceFetchFailed {
        href: String,
        #[source]
        source: ApiError,
    },

    #[error("Malformed data on resource {resource}: {reason}")]
    MalformedResourceData { resource: String, reason: String },
}

impl ReadError {
    pub(crate) fn malformed(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResourceData {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Whether the persisted identifier must be dropped: the deployment is gone remotely
    pub fn clears_identifier(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

pub type ReadResult<T> = std::result::Result<T, ReadError>;
