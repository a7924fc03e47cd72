//! Async HTTP transport for dashboard widget data.
//!
//! One endpoint per widget id (`GET {base}/api/dashboard/widgets/{id}` by
//! default). [`WidgetClient`] performs the request and decodes the JSON
//! payload; every failure mode (transport, non-success status, rejected
//! envelope, undecodable body) surfaces as an [`Error`] for `dashwire-core`
//! to turn into a cache or mock fallback.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{DEFAULT_PATH_PREFIX, PayloadEnvelope, WidgetClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
