//! vRA API interaction module
//!
//! # Module Structure
//!
//! - [`client`] - Catalog-service client implementing the deployment API
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use vra_state::vra::VraClient;
//! use vra_state::resource::DeploymentApi;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = VraClient::new("https://vra.example.com", Some(token))?;
//!     let view = client.fetch_resource_view("b1c2...").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;

pub use client::VraClient;
pub use http::format_api_error;
