//! Tower middleware for the hyper transport.
//!
//! Layers added with [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer)
//! see every request before it reaches the network, multipart uploads
//! included (their body is [`Body::Stream`](crate::Body::Stream)).
//!
//! # Example
//!
//! ```ignore
//! use tgbot::HyperClient;
//! use tgbot::middleware::LoggingLayer;
//!
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod logging;

pub use logging::{Logging, LoggingLayer};

pub use tower::{Layer, ServiceBuilder};
