//! In-process stub of the produksi backend
//!
//! Serves canned responses over real HTTP on an ephemeral localhost port and
//! records every request it receives, so API and workflow code can be tested
//! end to end without a running backend.

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A canned response
#[derive(Debug, Clone)]
pub struct StubResponse {
    status: u16,
    body: String,
    content_type: &'static str,
    delay: Option<Duration>,
}

impl StubResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "application/json",
            delay: None,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "text/plain",
            delay: None,
        }
    }

    /// Hold the response back for `delay`
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as the stub received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Body parsed as JSON, if it is JSON
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

#[derive(Default)]
struct StubState {
    /// Queued responses per route; the last one repeats
    routes: HashMap<(Method, String), VecDeque<StubResponse>>,
    requests: Vec<RecordedRequest>,
}

impl StubState {
    fn next_response(&mut self, method: &Method, path: &str) -> StubResponse {
        match self.routes.get_mut(&(method.clone(), path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(not_found),
            Some(queue) => queue.front().cloned().unwrap_or_else(not_found),
            None => not_found(),
        }
    }
}

fn not_found() -> StubResponse {
    StubResponse::json(404, serde_json::json!({ "message": "no stub registered" }))
}

fn lock(state: &Mutex<StubState>) -> MutexGuard<'_, StubState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Stub backend bound to `127.0.0.1` on a free port; stops when dropped
pub struct StubBackend {
    addr: SocketAddr,
    state: Arc<Mutex<StubState>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubBackend {
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(StubState::default()));
        let (shutdown, mut stopped) = oneshot::channel();

        let server_state = state.clone();
        tokio::spawn(async move {
            loop {
                let stream = tokio::select! {
                    accepted = listener.accept() => match accepted {
                        Ok((stream, _)) => stream,
                        Err(err) => {
                            tracing::warn!(error = %err, "stub backend accept failed");
                            continue;
                        }
                    },
                    _ = &mut stopped => break,
                };

                let io = TokioIo::new(stream);
                let state = server_state.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                        let state = state.clone();
                        async move { Ok::<_, Infallible>(handle(state, req).await) }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        tracing::debug!(error = ?err, "stub backend connection closed");
                    }
                });
            }
        });

        Ok(Self {
            addr,
            state,
            shutdown: Some(shutdown),
        })
    }

    /// Base URL to point an API client at
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queue a response for `method path`
    ///
    /// Responses are served in registration order and the last one keeps
    /// being served.
    pub fn on(&self, method: Method, path: &str, response: StubResponse) {
        lock(&self.state)
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn handle(
    state: Arc<Mutex<StubState>>,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let authorization = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => Bytes::new(),
    };

    let response = {
        let mut state = lock(&state);
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            authorization,
            body,
        });
        state.next_response(&method, &path)
    };

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    let mut out = hyper::Response::new(Full::new(Bytes::from(response.body)));
    *out.status_mut() =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if let Ok(value) = http::HeaderValue::from_str(response.content_type) {
        out.headers_mut().insert(http::header::CONTENT_TYPE, value);
    }
    out
}
