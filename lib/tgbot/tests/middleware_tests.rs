//! Integration tests for middleware functionality.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use serde_json::json;
use tgbot::middleware::{Layer, LoggingLayer};
use tgbot::{Body, Bot, Error, HttpClient, HyperClient, Method, Request, Response, ServiceFuture};
use tower::Service;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Test that logging middleware doesn't break request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logged": true})))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_debug_logging().build();

    let url = url::Url::parse(&format!("{}/logged", mock_server.uri())).expect("url");
    let request = Request::<Body>::builder(Method::Get, url).build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
}

/// Counts requests passing through.
#[derive(Clone)]
struct CountingLayer(Arc<AtomicUsize>);

#[derive(Clone)]
struct Counting<S> {
    inner: S,
    count: Arc<AtomicUsize>,
}

impl<S> Layer<S> for CountingLayer {
    type Service = Counting<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Counting {
            inner,
            count: Arc::clone(&self.0),
        }
    }
}

impl<S> Service<Request<Body>> for Counting<S>
where
    S: Service<Request<Body>, Response = Response, Error = Error, Future = ServiceFuture>,
{
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<tgbot::Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inner.call(request)
    }
}

/// Test that custom layers see multipart uploads and compose with logging.
#[tokio::test]
async fn test_custom_layer_with_bot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/bot1:x/sendSticker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {
                "message_id": 1,
                "date": 0,
                "chat": {"id": 5, "type": "private"}
            }
        })))
        .mount(&mock_server)
        .await;

    let count = Arc::new(AtomicUsize::new(0));
    let client = HyperClient::builder()
        .with_logging()
        .layer(CountingLayer(Arc::clone(&count)))
        .build();

    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("s.webp");
    std::fs::write(&file, b"RIFF\0\0\0\0WEBPVP8 ").expect("write");

    let bot = Bot::builder("1:x")
        .api_url(mock_server.uri())
        .build_with(client)
        .expect("bot");
    let message = bot
        .send_sticker(5, tgbot::Attachment::from_path(&file).expect("attachment"))
        .await
        .expect("sendSticker");

    assert_eq!(message.chat.id, 5);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
