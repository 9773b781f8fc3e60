//! Resource-graph flattening
//!
//! Turns the nested resource view of a vRA deployment into a flat
//! [`DeploymentRecord`].
//!
//! # Architecture
//!
//! - [`node`] - Typed resource-view entries and their classification
//! - [`coerce`] - Timestamp coercion
//! - [`lease`] - Lease window and days remaining
//! - [`identity`] - Picks the request id a read is keyed by
//! - [`projector`] - Scalar attributes of the deployment root, child discovery
//! - [`flatten`] - One configuration per virtual machine
//! - [`cluster`] - Cluster sizes per component name
//! - [`reader`] - The read operation tying it together
//!
//! # Example
//!
//! ```ignore
//! use vra_state::resource::{read_deployment, ReadContext, ReadRequest};
//! use vra_state::vra::VraClient;
//!
//! async fn example(client: &VraClient) -> anyhow::Result<()> {
//!     let request = ReadRequest::by_deployment_id("7f6a2c9e-...");
//!     let record = read_deployment(client, &request, &ReadContext::now()).await?;
//!     println!("{} machines", record.resource_configuration.len());
//!     Ok(())
//! }
//! ```

mod api;
pub mod cluster;
pub mod coerce;
pub mod flatten;
pub mod identity;
pub mod lease;
pub mod node;
pub mod projector;
pub mod reader;
pub mod record;

pub use api::DeploymentApi;
pub use cluster::ClusterCountMap;
pub use identity::ReadRequest;
pub use lease::Lease;
pub use node::{Owner, ResourceKind, ResourceNode, ResourceView};
pub use reader::{read_deployment, ReadContext};
pub use record::{DeploymentRecord, ResourceConfiguration};
