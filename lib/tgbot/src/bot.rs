//! The Bot API method executor.

use std::fmt::Display;
use std::io::{self, ErrorKind};

use bytes::Bytes;
use futures_util::{StreamExt, TryStreamExt, future, stream};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tgbot_core::{
    ApiMethod, Attachment, Body, Endpoint, Envelope, Error, HttpClient, Method, MultipartWriter,
    Params, Request, Response, Result, Transport,
};
use tokio::io::AsyncWrite;
use tokio::sync::oneshot;
use tokio_util::io::ReaderStream;
use tracing::{Instrument, debug, debug_span, warn};
use url::Url;

use crate::config::{BotConfig, ClientConfig};
use crate::types::{File, Message, Update, User};
use crate::{HyperClient, HyperClientBuilder, methods};

/// Buffer between the multipart writer and the outgoing request body.
const PIPE_CAPACITY: usize = 64 * 1024;

/// Executes [`ApiMethod`]s against one bot's endpoint.
///
/// The token and server are fixed at construction. `Bot` holds no other
/// state, so clones and shared references can run calls concurrently.
///
/// # Example
///
/// ```ignore
/// use tgbot::Bot;
///
/// let bot = Bot::new("123456:ABC-DEF")?;
/// let me = bot.get_me().await?;
/// println!("running as @{}", me.username.unwrap_or_default());
/// ```
#[derive(Debug)]
pub struct Bot<C = HyperClient> {
    client: C,
    endpoint: Endpoint,
}

impl<C: Clone> Clone for Bot<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

impl Bot {
    /// Bot on the public Bot API server with a default transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(HyperClient::new(), Endpoint::telegram(token)?))
    }

    /// Builder for a bot with a custom server or transport settings.
    #[must_use]
    pub fn builder(token: impl Into<String>) -> BotBuilder {
        BotBuilder::new(token)
    }

    /// Bot from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or server URL is malformed.
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        BotBuilder::from_config(config).build()
    }
}

impl<C> Bot<C> {
    /// Bot over any transport.
    #[must_use]
    pub fn with_client(client: C, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }

    /// Server and token of this bot.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Underlying transport.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: HttpClient> Bot<C> {
    /// Execute one Bot API call and decode its `result`.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] for any status other than `200 OK`, with the body
    ///   text verbatim
    /// - [`Error::Api`] when Telegram answers `ok: false`
    /// - [`Error::JsonDeserialization`] when the body does not decode into
    ///   `Envelope<T>`
    /// - transport and I/O errors, including failures reading the attachment
    pub async fn execute<T: DeserializeOwned>(&self, method: ApiMethod<T>) -> Result<T> {
        let span = debug_span!("bot_api", method = %method.name());
        async move {
            let (name, transport) = method.into_parts();
            let url = self.endpoint.method_url(&name)?;

            let (request, upload) = match transport {
                Transport::Get(params) => {
                    let request = Request::<Body>::builder(Method::Get, url)
                        .query_pairs(params.iter())
                        .build();
                    (request, None)
                }
                Transport::Post(params) => {
                    let mut builder = Request::<Body>::builder(Method::Post, url);
                    if !params.is_empty() {
                        builder = builder.json(&params)?;
                    }
                    (builder.build(), None)
                }
                Transport::Multipart {
                    params,
                    attachment_name,
                    attachment,
                } => {
                    let (request, upload) =
                        multipart_request(url, params, attachment_name, attachment);
                    (request, Some(upload))
                }
            };

            let redacted = self.endpoint.redact(request.url());
            debug!(url = %redacted, verb = %request.method(), "calling method");

            let response = match upload {
                None => self.client.execute(request).await?,
                Some(upload) => {
                    let (written, response) = tokio::join!(upload, self.client.execute(request));
                    match written {
                        // The transport stopped reading; its own outcome explains why.
                        Err(err) if err.kind() == ErrorKind::BrokenPipe => response?,
                        Err(err) => {
                            warn!(error = %err, "multipart body aborted");
                            return Err(Error::Io(err));
                        }
                        Ok(()) => response?,
                    }
                }
            };

            let result = decode(&redacted, &response);
            debug!(status = response.status(), ok = result.is_ok(), "method completed");
            result
        }
        .instrument(span)
        .await
    }

    /// `getMe`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn get_me(&self) -> Result<User> {
        self.execute(methods::get_me()).await
    }

    /// `getUpdates`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        limit: Option<u32>,
        timeout: Option<u32>,
    ) -> Result<Vec<Update>> {
        self.execute(methods::get_updates(offset, limit, timeout))
            .await
    }

    /// `sendMessage`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn send_message(
        &self,
        chat_id: impl Display,
        text: impl Into<String>,
    ) -> Result<Message> {
        self.execute(methods::send_message(chat_id, text)).await
    }

    /// `sendSticker`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn send_sticker(
        &self,
        chat_id: impl Display,
        sticker: Attachment,
    ) -> Result<Message> {
        self.execute(methods::send_sticker(chat_id, sticker)).await
    }

    /// `getFile`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn get_file(&self, file_id: impl Into<String>) -> Result<File> {
        self.execute(methods::get_file(file_id)).await
    }
}

/// Build a `multipart/form-data` request whose body is written while it is
/// in flight.
///
/// The returned future fills one end of an in-memory pipe; the other end is
/// the request body. The body ends once the closing boundary is written. If
/// writing fails, the body yields an error instead of ending, so the
/// transport aborts the request rather than sending a truncated form.
fn multipart_request(
    url: Url,
    params: Params,
    attachment_name: String,
    attachment: Option<Attachment>,
) -> (Request<Body>, impl Future<Output = io::Result<()>> + Send) {
    let (reader, writer) = tokio::io::duplex(PIPE_CAPACITY);
    let (abort, aborted) = oneshot::channel::<Error>();
    let multipart = MultipartWriter::new(writer);

    // Yields the writer's error, if any, once the pipe is drained
    let failure = stream::once(aborted)
        .filter_map(|aborted| future::ready(aborted.ok().map(Err)));
    let body = ReaderStream::new(reader).map_err(Error::from).chain(failure);

    let request = Request::<Body>::builder(Method::Post, url)
        .header("Content-Type", multipart.content_type())
        .body(Body::stream(body))
        .build();

    let upload = async move {
        let written = write_form(multipart, &params, &attachment_name, attachment.as_ref()).await;
        if let Err(err) = &written
            && err.kind() != ErrorKind::BrokenPipe
        {
            let _ = abort.send(Error::Io(io::Error::new(err.kind(), err.to_string())));
        }
        written
    };
    (request, upload)
}

/// Fields in call order, then the attachment, then the closing boundary.
async fn write_form<W: AsyncWrite + Unpin>(
    mut multipart: MultipartWriter<W>,
    params: &Params,
    attachment_name: &str,
    attachment: Option<&Attachment>,
) -> io::Result<()> {
    for (name, value) in params.iter() {
        multipart.add_form_field(name, value).await?;
    }
    if let Some(attachment) = attachment {
        multipart.add_file_part(attachment_name, attachment).await?;
    }
    multipart.finish().await.map(drop)
}

/// Turn a buffered response into the method result.
fn decode<T: DeserializeOwned>(url: &str, response: &Response<Bytes>) -> Result<T> {
    if !response.is_ok() {
        warn!(status = response.status(), "request failed with HTTP error");
        return Err(Error::http(response.status(), url, response.text_lossy()));
    }

    let envelope: Envelope<T> = response.json()?;
    envelope
        .into_result()
        .inspect_err(|err| warn!(error = %err, "request rejected by the Bot API"))
}

/// Builder for [`Bot`].
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tgbot::Bot;
///
/// let bot = Bot::builder("123456:ABC-DEF")
///     .api_url("http://localhost:8081")
///     .timeout(Duration::from_secs(60))
///     .with_logging()
///     .build()?;
/// ```
#[derive(Debug)]
pub struct BotBuilder {
    token: SecretString,
    api_url: String,
    client: HyperClientBuilder,
}

impl BotBuilder {
    fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            api_url: tgbot_core::DEFAULT_API_URL.to_string(),
            client: HyperClient::builder(),
        }
    }

    /// Builder seeded with loaded settings, for further transport tuning.
    #[must_use]
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            token: config.token.clone(),
            api_url: config.api_url.clone(),
            client: HyperClient::builder(),
        }
    }

    /// Bot API server, e.g. a self-hosted `telegram-bot-api`.
    #[must_use]
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Transport settings.
    #[must_use]
    pub fn client_config(mut self, config: &ClientConfig) -> Self {
        self.client = self.client.config(config);
        self
    }

    /// Request timeout. Keep it above any `getUpdates` polling timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.client = self.client.timeout(timeout);
        self
    }

    /// Log every HTTP exchange at info level.
    #[must_use]
    pub fn with_logging(mut self) -> Self {
        self.client = self.client.with_logging();
        self
    }

    /// Log every HTTP exchange with headers and body shape.
    #[must_use]
    pub fn with_debug_logging(mut self) -> Self {
        self.client = self.client.with_debug_logging();
        self
    }

    /// Build a bot over the hyper transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or server URL is malformed.
    pub fn build(self) -> Result<Bot> {
        let endpoint = Endpoint::with_secret(&self.api_url, self.token)?;
        Ok(Bot::with_client(self.client.build(), endpoint))
    }

    /// Build a bot over a caller-supplied transport, ignoring transport
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the token or server URL is malformed.
    pub fn build_with<C: HttpClient>(self, client: C) -> Result<Bot<C>> {
        let endpoint = Endpoint::with_secret(&self.api_url, self.token)?;
        Ok(Bot::with_client(client, endpoint))
    }
}
