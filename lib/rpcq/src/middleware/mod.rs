//! Tower middleware layers for the rpcq HTTP transport.
//!
//! Layers wrap the [`crate::HyperClient`] service and see every procedure call's
//! request and response:
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! Any other tower `Layer` over `Request<Bytes>`/`Response<Bytes>` can be added with
//! [`crate::HyperClientBuilder::layer`].
//!
//! ```ignore
//! use rpcq::HyperClient;
//! use rpcq::middleware::LoggingLayer;
//!
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
