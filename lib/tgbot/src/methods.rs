//! Typed descriptors of common Bot API methods.
//!
//! Each function returns an [`ApiMethod`] to pass to
//! [`Bot::execute`](crate::Bot::execute). Methods not covered here can be
//! described directly with [`ApiMethod::get`], [`ApiMethod::post`] or
//! [`ApiMethod::multipart`].

use std::fmt::Display;

use tgbot_core::{ApiMethod, Attachment, Params};

use crate::types::{File, Message, Update, User};

/// `getMe`: basic information about the bot.
#[must_use]
pub fn get_me() -> ApiMethod<User> {
    ApiMethod::get("getMe", Params::new())
}

/// `getUpdates`: incoming updates, long polling for up to `timeout` seconds.
#[must_use]
pub fn get_updates(
    offset: Option<i64>,
    limit: Option<u32>,
    timeout: Option<u32>,
) -> ApiMethod<Vec<Update>> {
    let params = Params::new()
        .with_opt("offset", offset.map(|v| v.to_string()))
        .with_opt("limit", limit.map(|v| v.to_string()))
        .with_opt("timeout", timeout.map(|v| v.to_string()));
    ApiMethod::get("getUpdates", params)
}

/// `sendMessage`: send a text message.
///
/// `chat_id` is a numeric chat id or an `@channelusername`.
#[must_use]
pub fn send_message(chat_id: impl Display, text: impl Into<String>) -> ApiMethod<Message> {
    let params = Params::new()
        .with("chat_id", chat_id.to_string())
        .with("text", text);
    ApiMethod::post("sendMessage", params)
}

/// `sendSticker`: upload a `.webp`, `.tgs` or `.webm` sticker file.
#[must_use]
pub fn send_sticker(chat_id: impl Display, sticker: Attachment) -> ApiMethod<Message> {
    let params = Params::new().with("chat_id", chat_id.to_string());
    ApiMethod::multipart("sendSticker", params, "sticker", Some(sticker))
}

/// `getFile`: file path for downloading a file by id.
#[must_use]
pub fn get_file(file_id: impl Into<String>) -> ApiMethod<File> {
    ApiMethod::get("getFile", Params::new().with("file_id", file_id))
}

#[cfg(test)]
mod tests {
    use tgbot_core::{Method, Transport};

    use super::*;

    #[test]
    fn get_updates_skips_absent_params() {
        let method = get_updates(Some(10), None, Some(30));
        assert_eq!(method.name(), "getUpdates");
        assert_eq!(method.transport().method(), Method::Get);
        assert_eq!(method.params().to_query_string(), "offset=10&timeout=30");
    }

    #[test]
    fn send_message_posts_json() {
        let method = send_message("@channel", "hello");
        assert!(matches!(method.transport(), Transport::Post(_)));
        assert_eq!(method.params().get("chat_id"), Some("@channel"));
        assert_eq!(method.params().get("text"), Some("hello"));
    }

    #[test]
    fn send_sticker_is_multipart() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cat.webp");
        std::fs::write(&path, b"RIFF").expect("write");

        let method = send_sticker(42, Attachment::from_path(&path).expect("attachment"));
        let Transport::Multipart {
            params,
            attachment_name,
            attachment,
        } = method.transport()
        else {
            panic!("expected multipart transport");
        };
        assert_eq!(params.get("chat_id"), Some("42"));
        assert_eq!(attachment_name, "sticker");
        assert_eq!(
            attachment.as_ref().map(Attachment::file_name),
            Some("cat.webp")
        );
    }
}
