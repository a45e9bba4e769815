//! HTTP client trait.
//!
//! [`HttpClient`] is the transport seam of the executor: the `tgbot` crate
//! ships a hyper-based implementation, tests can plug in their own.

use std::future::Future;

use bytes::Bytes;

use crate::{Body, Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations must drive streamed request bodies to completion and
/// buffer the whole response body.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Any status code is a successful execution; interpreting it is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - A streamed request body yielding an error
    fn execute(&self, request: Request<Body>)
    -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<C: HttpClient> HttpClient for std::sync::Arc<C> {
    fn execute(
        &self,
        request: Request<Body>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}
