//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tgbot_core::prelude::*;
//! ```

pub use crate::{
    ApiMethod, Attachment, Body, Envelope, Error, HttpClient, Method, Params, Request, Response,
    Result, Transport,
};
