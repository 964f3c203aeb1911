//! A stand-in for the Feldera REST API.
//!
//! It answers the ad-hoc query endpoint with canned responses, keyed by the
//! `sql` parameter, and records every request it receives.

use std::collections::HashMap;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Bytes, StreamBody};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures::stream::{self, StreamExt};
use tokio::task::JoinHandle;

/// A canned answer.
#[derive(Clone, Debug)]
pub struct MockResponse {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    truncated: bool,
}

impl MockResponse {
    /// `200 OK` with a newline-delimited JSON body.
    pub fn rows(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
            delay: None,
            truncated: false,
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body: body.into(),
            delay: None,
            truncated: false,
        }
    }

    /// Send the head and `partial_body`, announcing a longer body, then drop
    /// the connection.
    pub fn truncated(status: u16, partial_body: impl Into<String>) -> Self {
        Self {
            truncated: true,
            ..Self::status(status, partial_body)
        }
    }

    /// Wait before answering.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn respond(self) -> Response {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.truncated {
            let body = self.body;
            let announced = (body.len() + 1024).to_string();
            let partial = stream::once(async move { Ok(Bytes::from(body)) });
            let abort = stream::once(async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Err(io::Error::new(io::ErrorKind::ConnectionAborted, "connection dropped"))
            });
            return (
                self.status,
                [
                    (header::CONTENT_TYPE, "application/x-ndjson".to_string()),
                    (header::CONTENT_LENGTH, announced),
                ],
                StreamBody::new(partial.chain(abort)),
            )
                .into_response();
        }
        (
            self.status,
            [(header::CONTENT_TYPE, "application/x-ndjson")],
            self.body,
        )
            .into_response()
    }
}

/// A request as seen by the mock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub params: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
pub struct MockPipelineBuilder {
    queries: HashMap<String, MockResponse>,
    listing: Option<MockResponse>,
}

impl MockPipelineBuilder {
    /// Answer the query whose substituted SQL is exactly `sql`.
    #[must_use]
    pub fn on_query(mut self, sql: impl Into<String>, response: MockResponse) -> Self {
        self.queries.insert(sql.into(), response);
        self
    }

    /// Answer `GET /v0/pipelines`. Defaults to `200 OK` with an empty list.
    #[must_use]
    pub fn on_listing(mut self, response: MockResponse) -> Self {
        self.listing = Some(response);
        self
    }

    /// Start serving on an ephemeral local port. Must be called from within a
    /// tokio runtime.
    pub fn start(self) -> MockPipeline {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            queries: Arc::new(self.queries),
            listing: self.listing,
            requests: requests.clone(),
        };

        let router = Router::new()
            .route("/v0/pipelines", get(listing))
            .route("/v0/pipelines/:pipeline/query", get(query))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock pipeline");
        let address = listener.local_addr().expect("mock pipeline address");
        let server = axum::Server::from_tcp(listener)
            .expect("serve mock pipeline")
            .serve(router.into_make_service());
        let server = tokio::spawn(async move {
            let _ = server.await;
        });

        MockPipeline {
            address,
            requests,
            server,
        }
    }
}

/// A running mock. The server stops when this is dropped.
pub struct MockPipeline {
    address: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server: JoinHandle<()>,
}

impl MockPipeline {
    pub fn builder() -> MockPipelineBuilder {
        MockPipelineBuilder::default()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for MockPipeline {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let address = listener.local_addr().expect("ephemeral address");
    drop(listener);
    format!("http://{address}")
}

#[derive(Clone)]
struct MockState {
    queries: Arc<HashMap<String, MockResponse>>,
    listing: Option<MockResponse>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockState {
    fn record(&self, path: String, params: HashMap<String, String>, headers: &HeaderMap) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.requests
            .lock()
            .expect("requests lock")
            .push(RecordedRequest {
                path,
                params,
                authorization,
            });
    }
}

async fn listing(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.record("/v0/pipelines".to_string(), HashMap::new(), &headers);
    state
        .listing
        .clone()
        .unwrap_or_else(|| MockResponse::rows("[]"))
        .respond()
        .await
}

async fn query(
    State(state): State<MockState>,
    Path(pipeline): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record(
        format!("/v0/pipelines/{pipeline}/query"),
        params.clone(),
        &headers,
    );
    params
        .get("sql")
        .and_then(|sql| state.queries.get(sql))
        .cloned()
        .unwrap_or_else(|| MockResponse::status(400, "unknown query"))
        .respond()
        .await
}
