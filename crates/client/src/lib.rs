//! Backend data sources for resource overlays.
//!
//! [`DataSource`] is the seam between the overlay engine and the services
//! that own annotations, semantic chunks, quality scores, references and
//! symbol summaries. [`HttpSource`] talks to those services over HTTP;
//! [`MemorySource`] serves fixed data for tests and offline hosts.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod source;

pub use config::EndpointConfig;
pub use error::{Result, SourceError};
pub use http::HttpSource;
pub use memory::{Endpoint, MemorySource};
pub use source::DataSource;
