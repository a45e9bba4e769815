//! Outgoing HTTP requests.
//!
//! The executor builds one [`Request`] per Bot API call and hands it to an
//! [`HttpClient`](crate::HttpClient).
//!
//! # Example
//!
//! ```
//! use tgbot_core::{Body, Method, Params, Request};
//!
//! let url = "https://api.telegram.org/bot123:abc/getUpdates".parse().unwrap();
//! let params = Params::new().with("offset", "10");
//! let request = Request::<Body>::builder(Method::Get, url)
//!     .query_pairs(params.iter())
//!     .build();
//! assert_eq!(request.url().query(), Some("offset=10"));
//! ```

use std::collections::HashMap;

use url::Url;

use crate::{Body, ContentType, Method};

/// Verb, URL, headers and body of one exchange.
#[derive(Debug)]
pub struct Request<B = Body> {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: B,
}

impl<B: Default> Request<B> {
    /// Start a request with no headers and an empty body.
    #[must_use]
    pub fn builder(method: Method, url: Url) -> RequestBuilder<B> {
        RequestBuilder {
            request: Self {
                method,
                url,
                headers: HashMap::new(),
                body: B::default(),
            },
        }
    }
}

impl<B> Request<B> {
    /// HTTP verb.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Full URL, query string included.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All headers, keyed by the name they were set with.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header value, looked up by the exact name it was set with.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Split into verb, URL, headers and body, for transports.
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HashMap<String, String>, B) {
        let Self {
            method,
            url,
            headers,
            body,
        } = self;
        (method, url, headers, body)
    }
}

/// Builder returned by [`Request::builder`].
#[derive(Debug)]
pub struct RequestBuilder<B = Body> {
    request: Request<B>,
}

impl<B> RequestBuilder<B> {
    /// Set a header, replacing a previous value of the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    /// Append `application/x-www-form-urlencoded` pairs to the query string.
    ///
    /// Nothing is appended, not even a lone `?`, when `pairs` is empty.
    #[must_use]
    pub fn query_pairs<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_some() {
            self.request.url.query_pairs_mut().extend_pairs(pairs);
        }
        self
    }

    /// Replace the body.
    #[must_use]
    pub fn body(mut self, body: B) -> Self {
        self.request.body = body;
        self
    }

    /// Finish the request.
    #[must_use]
    pub fn build(self) -> Request<B> {
        self.request
    }
}

impl RequestBuilder<Body> {
    /// Encode `value` as the JSON body and set `Content-Type` accordingly.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be encoded.
    pub fn json<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        let body = crate::to_json(value)?;
        Ok(self
            .header("Content-Type", ContentType::Json.as_str())
            .body(Body::Full(body)))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::Params;

    fn url() -> Url {
        Url::parse("https://api.telegram.org/bot1:x/sendMessage").expect("valid URL")
    }

    #[test]
    fn bare_request() {
        let request = Request::<Body>::builder(Method::Get, url())
            .header("Accept", "application/json")
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.telegram.org/bot1:x/sendMessage");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn query_pairs_are_form_encoded() {
        let params = Params::new().with("chat_id", "1").with("text", "a b&c");
        let request = Request::<Body>::builder(Method::Get, url())
            .query_pairs(params.iter())
            .build();

        assert_eq!(request.url().query(), Some("chat_id=1&text=a+b%26c"));
    }

    #[test]
    fn no_pairs_no_question_mark() {
        let request = Request::<Body>::builder(Method::Get, url())
            .query_pairs(Params::new().iter())
            .build();

        assert_eq!(request.url().query(), None);
        assert!(!request.url().as_str().ends_with('?'));
    }

    #[test]
    fn json_body_sets_content_type() {
        let params = Params::new().with("chat_id", "1");
        let request = Request::<Body>::builder(Method::Post, url())
            .json(&params)
            .expect("json")
            .build();

        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(
            request.body().as_bytes(),
            Some(&Bytes::from_static(br#"{"chat_id":"1"}"#))
        );
    }
}
