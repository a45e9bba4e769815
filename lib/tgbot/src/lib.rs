//! Telegram Bot API client.
//!
//! Describe a call as an [`ApiMethod`], hand it to [`Bot::execute`], get the
//! decoded `result` back. Calls travel as `GET` with a query string, as
//! `POST` with a JSON body, or as a streamed `multipart/form-data` upload.
//!
//! # Example
//!
//! ```ignore
//! use tgbot::prelude::*;
//!
//! let bot = Bot::builder("123456:ABC-DEF").with_logging().build()?;
//! let me = bot.get_me().await?;
//!
//! let sticker = Attachment::from_path("cat.webp")?;
//! bot.send_sticker(42, sticker).await?;
//!
//! // Methods without a typed helper
//! let ok: bool = bot
//!     .execute(ApiMethod::post(
//!         "deleteMessage",
//!         Params::new().with("chat_id", "42").with("message_id", "7"),
//!     ))
//!     .await?;
//! ```

mod bot;
mod client;
mod config;
mod connector;
pub mod methods;
pub mod middleware;
pub mod prelude;
pub mod types;

pub use bot::{Bot, BotBuilder};
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{API_URL_ENV, BotConfig, ClientConfig, ClientConfigBuilder, TOKEN_ENV};

// Re-export tower for middleware composition
pub use tower;

// Re-export secrecy for tokens
pub use secrecy;

// Re-export core types
pub use tgbot_core::{
    ApiMethod, Attachment, Body, BodyStream, ContentType, DEFAULT_API_URL, Endpoint, Envelope,
    Error, HttpClient, Method, MultipartWriter, Params, Request, RequestBuilder, Response,
    ResponseParameters, Result, Transport, from_json, mime, redact_url, to_json,
};

// Re-export http types for status codes and headers
pub use tgbot_core::{StatusCode, header};
