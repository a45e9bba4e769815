//! Descriptors of Bot API calls.

use std::fmt;
use std::marker::PhantomData;

use crate::{Attachment, Method, Params};

/// How the parameters of a call travel to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// `GET`, parameters in the query string.
    Get(Params),
    /// `POST`, parameters as a flat JSON object.
    Post(Params),
    /// `POST` as `multipart/form-data`, parameters as text fields followed
    /// by at most one file part.
    Multipart {
        /// Text fields.
        params: Params,
        /// Form field name of the file part.
        attachment_name: String,
        /// The file to upload.
        attachment: Option<Attachment>,
    },
}

impl Transport {
    /// HTTP verb used by this transport.
    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::Get(_) => Method::Get,
            Self::Post(_) | Self::Multipart { .. } => Method::Post,
        }
    }

    /// Parameters of the call.
    #[must_use]
    pub const fn params(&self) -> &Params {
        match self {
            Self::Get(params) | Self::Post(params) | Self::Multipart { params, .. } => params,
        }
    }
}

/// One Bot API call whose `result` decodes into `T`.
///
/// # Example
///
/// ```
/// use tgbot_core::{ApiMethod, Params};
///
/// let method: ApiMethod<bool> = ApiMethod::post(
///     "deleteMessage",
///     Params::new().with("chat_id", "42").with("message_id", "7"),
/// );
/// assert_eq!(method.name(), "deleteMessage");
/// ```
pub struct ApiMethod<T> {
    name: String,
    transport: Transport,
    result: PhantomData<fn() -> T>,
}

impl<T> ApiMethod<T> {
    /// Describe a call with an explicit transport.
    #[must_use]
    pub fn new(name: impl Into<String>, transport: Transport) -> Self {
        Self {
            name: name.into(),
            transport,
            result: PhantomData,
        }
    }

    /// Describe a `GET` call.
    #[must_use]
    pub fn get(name: impl Into<String>, params: Params) -> Self {
        Self::new(name, Transport::Get(params))
    }

    /// Describe a `POST` call with a JSON body.
    #[must_use]
    pub fn post(name: impl Into<String>, params: Params) -> Self {
        Self::new(name, Transport::Post(params))
    }

    /// Describe a multipart upload.
    #[must_use]
    pub fn multipart(
        name: impl Into<String>,
        params: Params,
        attachment_name: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> Self {
        Self::new(
            name,
            Transport::Multipart {
                params,
                attachment_name: attachment_name.into(),
                attachment,
            },
        )
    }

    /// Bot API method name, e.g. `sendMessage`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transport of the call.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Parameters of the call.
    #[must_use]
    pub const fn params(&self) -> &Params {
        self.transport.params()
    }

    /// Consume into (name, transport).
    #[must_use]
    pub fn into_parts(self) -> (String, Transport) {
        (self.name, self.transport)
    }
}

impl<T> Clone for ApiMethod<T> {
    fn clone(&self) -> Self {
        Self::new(self.name.clone(), self.transport.clone())
    }
}

impl<T> fmt::Debug for ApiMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiMethod")
            .field("name", &self.name)
            .field("transport", &self.transport)
            .field("result", &std::any::type_name::<T>())
            .finish()
    }
}
