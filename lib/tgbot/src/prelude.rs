//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tgbot::prelude::*;
//! ```

pub use crate::types::{Chat, File, Message, Sticker, Update, User};
pub use crate::{
    ApiMethod, Attachment, Bot, BotConfig, ClientConfig, Error, HttpClient, HyperClient, Params,
    Result, Transport,
};
