//! Single GET to the upstream, body relayed verbatim.
//!
//! No parsing or re-encoding: the upstream body is read in full, then sent
//! back with a 200 status, keeping only the upstream `Content-Type`. Reading
//! before responding lets a stalled or cut-off body still become a 500.

use std::time::Instant;

use axum::body::Body;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, USER_AGENT};
use tracing::Instrument;

use crate::error::RelayError;

/// Fetch `url` once with the given User-Agent and build the relay response.
///
/// Non-2xx statuses are failures, same as transport errors and timeouts.
/// The client timeout covers the body read as well as the headers.
/// The caller decides how a failure is rendered.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    user_agent: &str,
    request_id: &str,
) -> Result<Response, RelayError> {
    let span = relay_tracing::upstream_fetch_span!(request_id, url);
    let start = Instant::now();

    async {
        let span = tracing::Span::current();
        let result = read_upstream(client, url, user_agent).await;

        let latency = start.elapsed().as_millis() as u64;
        span.record("latency_ms", latency);

        let (status, content_type, body) = result?;
        span.record("status", status.as_u16());
        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency,
            bytes = body.len(),
            "Upstream fetch complete"
        );

        Ok::<_, RelayError>(build_response(content_type, body))
    }
    .instrument(span)
    .await
}

async fn read_upstream(
    client: &reqwest::Client,
    url: &str,
    user_agent: &str,
) -> Result<(reqwest::StatusCode, Option<HeaderValue>, Bytes), reqwest::Error> {
    let upstream_resp = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .send()
        .await?
        .error_for_status()?;

    let status = upstream_resp.status();
    let content_type = upstream_resp.headers().get(CONTENT_TYPE).cloned();
    let body = upstream_resp.bytes().await?;
    Ok((status, content_type, body))
}

fn build_response(content_type: Option<HeaderValue>, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = StatusCode::OK;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
}

#[cfg(test)]
pub(crate) mod tests {
    use std::future::IntoFuture;
    use std::sync::Arc;

    use axum::http::HeaderMap;
    use tokio::sync::Mutex;

    use super::*;

    async fn spawn_upstream(status: StatusCode) -> (String, Arc<Mutex<Vec<HeaderMap>>>) {
        let captured: Arc<Mutex<Vec<HeaderMap>>> = Arc::new(Mutex::new(Vec::new()));
        let captured_clone = captured.clone();

        let app = axum::Router::new().route(
            "/page",
            axum::routing::get(move |headers: HeaderMap| {
                let captured = captured_clone.clone();
                async move {
                    captured.lock().await.push(headers);
                    (status, [(CONTENT_TYPE, "text/html; charset=utf-8")], "<html>ok</html>")
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(axum::serve(listener, app).into_future());

        (format!("http://{addr}/page"), captured)
    }

    #[tokio::test]
    async fn test_fetch_relays_body_and_content_type() {
        let (url, captured) = spawn_upstream(StatusCode::OK).await;
        let client = reqwest::Client::new();

        let resp = fetch(&client, &url, "test-agent/1.0", "req-1").await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[CONTENT_TYPE].to_str().unwrap(),
            "text/html; charset=utf-8"
        );

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<html>ok</html>");

        let seen = captured.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][USER_AGENT].to_str().unwrap(), "test-agent/1.0");
    }

    #[tokio::test]
    async fn test_non_success_status_is_failure() {
        let (url, captured) = spawn_upstream(StatusCode::SERVICE_UNAVAILABLE).await;
        let client = reqwest::Client::new();

        let err = fetch(&client, &url, "test-agent/1.0", "req-2")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::UpstreamFailure(_)));
        // Exactly one attempt, no retry.
        assert_eq!(captured.lock().await.len(), 1);
    }

    /// Upstream that promises `content_length` bytes, sends `partial`, then
    /// holds the connection open for `stall`.
    pub(crate) async fn spawn_stalling_upstream(
        partial: &'static str,
        content_length: usize,
        stall: std::time::Duration,
    ) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let head = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: {content_length}\r\n\r\n"
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(partial.as_bytes()).await;
                    let _ = socket.flush().await;
                    tokio::time::sleep(stall).await;
                });
            }
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_stalled_body_is_failure() {
        let url = spawn_stalling_upstream("<html>partial", 1024, std::time::Duration::from_secs(3)).await;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(1))
            .build()
            .unwrap();

        let err = fetch(&client, &url, "test-agent/1.0", "req-4")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::UpstreamFailure(_)));
    }

    #[tokio::test]
    async fn test_created_status_relayed_as_ok() {
        let (url, _captured) = spawn_upstream(StatusCode::CREATED).await;
        let client = reqwest::Client::new();

        let resp = fetch(&client, &url, "test-agent/1.0", "req-3").await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
