//! vRA Client
//!
//! Catalog-service client implementing [`DeploymentApi`] over HTTP.

use super::http::VraHttpClient;
use crate::error::ApiError;
use crate::resource::{DeploymentApi, ResourceView};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// Path of the consumer API below the vRA host
const CONSUMER_API_PATH: &str = "catalog-service/api/consumer/";

/// Catalog resource, reduced to what identity resolution needs
#[derive(Debug, Deserialize)]
struct CatalogResource {
    #[serde(rename = "requestId")]
    request_id: Option<String>,
}

/// Main vRA client
#[derive(Clone)]
pub struct VraClient {
    pub host: Url,
    token: Option<String>,
    http: VraHttpClient,
}

impl VraClient {
    /// Create a new client for `host`, authenticating with a pre-issued bearer token
    pub fn new(host: &str, token: Option<String>) -> Result<Self, ApiError> {
        let mut host = Url::parse(host)?;
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }

        Ok(Self {
            host,
            token,
            http: VraHttpClient::new()?,
        })
    }

    /// Build consumer API URL
    pub fn consumer_url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.host.join(CONSUMER_API_PATH)?.join(path)?)
    }

    /// URL of a catalog resource (a deployment)
    pub fn resource_url(&self, deployment_id: &str) -> Result<Url, ApiError> {
        self.consumer_url(&format!("resources/{}", urlencoding::encode(deployment_id)))
    }

    /// URL of the resource views of a request
    pub fn resource_views_url(&self, request_id: &str) -> Result<Url, ApiError> {
        self.consumer_url(&format!(
            "requests/{}/resourceViews",
            urlencoding::encode(request_id)
        ))
    }

    /// Resolve a link href, which may be absolute or relative to the host
    pub fn link_url(&self, href: &str) -> Result<Url, ApiError> {
        match Url::parse(href) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(self.host.join(href)?),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl DeploymentApi for VraClient {
    async fn resolve_request_id(&self, deployment_id: &str) -> Result<String, ApiError> {
        let url = self.resource_url(deployment_id)?;
        let resource: CatalogResource = self.http.get(&url, self.token.as_deref()).await?;
        resource
            .request_id
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::MissingField("requestId"))
    }

    async fn fetch_resource_view(&self, request_id: &str) -> Result<ResourceView, ApiError> {
        let url = self.resource_views_url(request_id)?;
        self.http.get(&url, self.token.as_deref()).await
    }

    async fn fetch_child_resources(&self, href: &str) -> Result<ResourceView, ApiError> {
        let url = self.link_url(href)?;
        self.http.get(&url, self.token.as_deref()).await
    }
}
