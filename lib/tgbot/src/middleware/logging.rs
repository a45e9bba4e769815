//! Exchange logging middleware.
//!
//! Each request runs inside a `telegram_http` span named after the Bot API
//! method it calls. URLs are logged with the bot token masked.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Body, Error, Request, Response, Result, redact_url};

/// Layer logging every HTTP exchange of the transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    verbose: bool,
}

impl LoggingLayer {
    /// One event per request and one per outcome, at info level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log request headers and body shape, at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self { verbose: true }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            verbose: self.verbose,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    verbose: bool,
}

/// Shape of a request body, as logged.
fn body_shape(body: &Body) -> String {
    match body {
        Body::Empty => "empty".to_string(),
        Body::Full(bytes) => format!("{} bytes", bytes.len()),
        Body::Stream(_) => "streamed".to_string(),
    }
}

/// Last path segment of a Bot API URL, i.e. the method name.
fn api_method(url: &url::Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

impl<S> Service<Request<Body>> for Logging<S>
where
    S: Service<Request<Body>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let span = info_span!(
            "telegram_http",
            api_method = %api_method(request.url()),
            verb = %request.method(),
        );
        let url = redact_url(request.url());
        let body = body_shape(request.body());
        if self.verbose {
            debug!(parent: &span, %url, headers = ?request.headers(), %body, "sending request");
        } else {
            info!(parent: &span, %url, %body, "sending request");
        }

        // Take the service that was driven to readiness, leave a clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let started = Instant::now();
                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) if response.is_ok() => {
                        info!(elapsed_ms, bytes = response.body().len(), "response received");
                    }
                    Ok(response) => {
                        warn!(status = response.status(), elapsed_ms, "non-200 response");
                    }
                    Err(err) => warn!(error = %err, elapsed_ms, "exchange failed"),
                }
                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_levels() {
        assert!(!LoggingLayer::new().verbose);
        assert!(LoggingLayer::debug().verbose);
    }

    #[test]
    fn method_from_url() {
        let url = url::Url::parse("https://api.telegram.org/bot1:x/sendSticker").expect("url");
        assert_eq!(api_method(&url), "sendSticker");
    }

    #[test]
    fn body_shapes() {
        assert_eq!(body_shape(&Body::Empty), "empty");
        assert_eq!(body_shape(&Body::from("abc".to_string())), "3 bytes");
        let stream = Body::stream(futures_util::stream::empty());
        assert_eq!(body_shape(&stream), "streamed");
    }
}
