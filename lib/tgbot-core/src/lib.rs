//! Core types and traits for the tgbot Telegram Bot API client.
//!
//! This crate provides the transport-independent building blocks:
//! - [`ApiMethod`] and [`Transport`] - Descriptors of Bot API calls
//! - [`Params`] - Ordered method parameters
//! - [`Envelope`] - The `{ok, result, ...}` response wrapper
//! - [`Endpoint`] - `<base>/bot<token>/<method>` URL construction
//! - [`Attachment`] and [`mime`] - Local files and their content types
//! - [`MultipartWriter`] - Streaming `multipart/form-data` bodies
//! - [`Request`], [`Response`] and [`Body`] - HTTP message types
//! - [`HttpClient`] - Transport trait
//! - [`Error`] and [`Result`] - Error handling

mod api_method;
mod attachment;
mod body;
mod client;
mod endpoint;
mod envelope;
mod error;
mod method;
pub mod mime;
mod multipart;
mod params;
pub mod prelude;
mod request;
mod response;

pub use api_method::{ApiMethod, Transport};
pub use attachment::Attachment;
pub use body::{Body, BodyStream, ContentType, from_json, to_json};
pub use client::HttpClient;
pub use endpoint::{DEFAULT_API_URL, Endpoint, redact_url};
pub use envelope::{Envelope, ResponseParameters};
pub use error::{Error, Result};
pub use method::Method;
pub use multipart::MultipartWriter;
pub use params::Params;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
