//! Catalog API access: transport and endpoint URLs.

pub mod client;
pub mod endpoints;

pub use client::{HttpTransport, Transport};
pub use endpoints::Endpoints;
