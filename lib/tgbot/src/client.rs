//! Hyper transport for the Bot API.
//!
//! [`HyperClient`] pools connections, speaks HTTP/1.1 and HTTP/2 over rustls
//! and streams [`Body::Stream`] request bodies frame by frame, which is what
//! lets multipart uploads start before the file is fully read.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body::Frame;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{self, Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::connector::https_connector;
use crate::middleware::LoggingLayer;
use crate::{Body, Error, Request, Response, Result};

/// Outgoing body as hyper sees it.
type OutgoingBody = UnsyncBoxBody<Bytes, Error>;

/// The transport stack once layers are applied, with its types erased.
pub type BoxedService = BoxCloneService<Request<Body>, Response<Bytes>, Error>;

/// Future returned by the transport stack.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'static>>;

/// `BoxCloneService` is `Send` but not `Sync`; callers share a `HyperClient`
/// by reference, so the stack sits behind a mutex and each call works on a
/// clone of it.
#[derive(Clone)]
struct SharedStack(Arc<Mutex<BoxedService>>);

impl SharedStack {
    fn call(&self, request: Request<Body>) -> ServiceFuture {
        let mut stack = self
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Box::pin(async move { stack.call(request).await })
    }
}

/// Innermost service: one hyper exchange per call.
#[derive(Clone)]
struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, OutgoingBody>,
    timeout: Duration,
}

impl HyperTransport {
    fn new(config: &ClientConfig) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector(config.connect_timeout));

        Self {
            client,
            timeout: config.timeout,
        }
    }

    async fn exchange(self, request: Request<Body>) -> Result<Response<Bytes>> {
        let request = into_hyper(request)?;

        let exchange = async {
            let response = self.client.request(request).await.map_err(classify)?;
            let status = response.status().as_u16();
            let headers = header_map(response.headers());
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|err| Error::connection(err.to_string()))?
                .to_bytes();
            Ok(Response::new(status, headers, body))
        };

        // The deadline covers the upload, the wait and the download
        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| Error::Timeout)?
    }
}

impl Service<Request<Body>> for HyperTransport {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        Box::pin(self.clone().exchange(request))
    }
}

fn outgoing_body(body: Body) -> OutgoingBody {
    match body {
        Body::Empty => Empty::new().map_err(|never| match never {}).boxed_unsync(),
        Body::Full(bytes) => Full::new(bytes).map_err(|never| match never {}).boxed_unsync(),
        Body::Stream(chunks) => StreamBody::new(chunks.map_ok(Frame::data)).boxed_unsync(),
    }
}

fn into_hyper(request: Request<Body>) -> Result<http::Request<OutgoingBody>> {
    let (method, url, headers, body) = request.into_parts();

    headers
        .iter()
        .fold(
            http::Request::builder()
                .method(http::Method::from(method))
                .uri(url.as_str()),
            |builder, (name, value)| builder.header(name.as_str(), value.as_str()),
        )
        .body(outgoing_body(body))
        .map_err(|err| Error::invalid_request(err.to_string()))
}

/// Response headers that are valid UTF-8.
fn header_map(headers: &http::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

/// Sort a hyper failure into the error kinds callers can act on.
#[allow(clippy::needless_pass_by_value)]
fn classify(err: legacy::Error) -> Error {
    let message = err.to_string();
    if err.is_connect() {
        return Error::connection(message);
    }
    if ["ssl", "tls", "certificate"]
        .iter()
        .any(|needle| message.contains(needle))
    {
        return Error::tls(message);
    }

    // A failing request body surfaces somewhere down the source chain
    let mut cause = std::error::Error::source(&err);
    while let Some(current) = cause {
        let io = match current.downcast_ref::<Error>() {
            Some(Error::Io(io)) => Some(io),
            _ => current.downcast_ref::<std::io::Error>(),
        };
        if let Some(io) = io {
            return Error::Io(std::io::Error::new(io.kind(), io.to_string()));
        }
        cause = current.source();
    }

    Error::connection(message)
}

/// Pooled HTTPS client with an optional tower middleware stack.
///
/// Cheap to clone; clones share the connection pool.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tgbot::HyperClient;
///
/// let client = HyperClient::builder()
///     .timeout(Duration::from_secs(60))
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    stack: SharedStack,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Client with default settings and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Client with the given settings and no middleware.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self::builder().config(&config).build()
    }

    /// Start configuring a client.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// Settings this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl tgbot_core::HttpClient for HyperClient {
    async fn execute(&self, request: Request<Body>) -> Result<Response<Bytes>> {
        self.stack.call(request).await
    }
}

impl Service<Request<Body>> for HyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        self.stack.call(request)
    }
}

type BoxedLayer = Box<dyn FnOnce(BoxedService) -> BoxedService + Send + Sync>;

/// Builder for [`HyperClient`].
///
/// The first layer added is the outermost one: it sees requests first and
/// responses last.
#[derive(Default)]
pub struct HyperClientBuilder {
    config: ClientConfigBuilder,
    layers: Vec<BoxedLayer>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("config", &self.config)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Replace all transport settings at once.
    #[must_use]
    pub fn config(mut self, config: &ClientConfig) -> Self {
        self.config = ClientConfig::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_per_host(config.pool_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout);
        self
    }

    /// Deadline for a whole exchange, upload and download included.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Deadline for establishing a TCP connection.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Idle connections kept per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// How long an idle connection is kept.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Wrap the transport in a tower layer.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request<Body>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request<Body>>>::Future: Send,
    {
        self.layers
            .push(Box::new(move |inner| BoxCloneService::new(layer.layer(inner))));
        self
    }

    /// Log each exchange at info level.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log each exchange with headers and body shape at debug level.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Assemble the client.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let config = self.config.build();
        let transport: BoxedService = BoxCloneService::new(HyperTransport::new(&config));
        let stack = self
            .layers
            .into_iter()
            .rev()
            .fold(transport, |inner, wrap| wrap(inner));

        HyperClient {
            stack: SharedStack(Arc::new(Mutex::new(stack))),
            config,
        }
    }
}
