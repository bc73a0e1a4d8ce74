//! Social backend library: vote aggregation, feed pagination, and the
//! ownership guard for posts and comments.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the model, ports,
//! and services; [`inbound`] and [`outbound`] hold the HTTP and storage
//! adapters that drive and back it.

pub mod doc;
pub mod domain;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
