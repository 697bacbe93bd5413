//! HTTP handlers for the conversation stream and auxiliary endpoints.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::adapters::rate_limiter::CONVERSATION_RESOURCE;
use crate::config::Environment;
use crate::domain::dialogue::{DialogueEngine, DialogueEvent, DEFAULT_TURN_DELAY};
use crate::ports::{AIProvider, RateLimitKey, RateLimitResult, RateLimiter};

use super::dto::{ErrorBody, HealthResponse, LandingResponse, StartConversationParams};
use super::middleware::{client_ip, rate_limit_response};

/// Caller-safe message for unexpected failures while driving a run.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error, please try again later";

/// Buffered events between the engine and the SSE writer.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Shared state for every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    /// Text-generation capability, injected into each engine.
    pub provider: Arc<dyn AIProvider>,
    /// Rate limiter backing both windows.
    pub limiter: Arc<dyn RateLimiter>,
    /// Environment reported by the health endpoint.
    pub environment: Environment,
    /// Pacing delay between dialogue turns.
    pub turn_delay: Duration,
}

impl AppState {
    /// Creates handler state with the default turn pacing.
    pub fn new(
        provider: Arc<dyn AIProvider>,
        limiter: Arc<dyn RateLimiter>,
        environment: Environment,
    ) -> Self {
        Self {
            provider,
            limiter,
            environment,
            turn_delay: DEFAULT_TURN_DELAY,
        }
    }

    /// Overrides the pacing delay (zero disables pacing; used in tests).
    pub fn with_turn_delay(mut self, turn_delay: Duration) -> Self {
        self.turn_delay = turn_delay;
        self
    }
}

/// `GET /api/start-conversation` - validate, then stream a dialogue run.
///
/// Validation failures and the conversation-start rate limit reject the
/// request before any stream is opened. Once streaming begins, every
/// failure is reported as a single terminal `error` event instead of an
/// HTTP status, because the response has already committed to SSE framing.
pub async fn start_conversation(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Query(params): Query<StartConversationParams>,
) -> Response {
    let config = match params.into_config() {
        Ok(config) => config,
        Err(err) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.to_string())))
                .into_response();
        }
    };

    // Conversation starts are far more expensive than other API calls, so
    // they get their own window on top of the general middleware limit.
    let ip = client_ip(&headers, connect_info.as_ref()).unwrap_or_else(|| "unknown".to_string());
    match state
        .limiter
        .check(RateLimitKey::ip_resource(&ip, CONVERSATION_RESOURCE))
        .await
    {
        Ok(RateLimitResult::Denied(denied)) => {
            return rate_limit_response(denied.limit, 0, denied.retry_after_secs);
        }
        Err(e) => {
            warn!("Rate limiter unavailable for conversation check: {}", e);
        }
        Ok(RateLimitResult::Allowed(_)) => {}
    }

    info!(
        role1 = config.role1(),
        role2 = config.role2(),
        rounds = config.rounds(),
        "starting dialogue run"
    );

    let engine = DialogueEngine::new(config, Arc::clone(&state.provider))
        .with_turn_delay(state.turn_delay);
    let (tx, rx) = mpsc::channel::<DialogueEvent>(EVENT_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        // Nested spawn so a panic while driving the run surfaces as one
        // synthesized error frame instead of a silently truncated stream.
        let run = tokio::spawn(engine.run(tx.clone()));
        if run.await.is_err() {
            error!("dialogue run aborted unexpectedly");
            let _ = tx
                .send(DialogueEvent::Error {
                    message: INTERNAL_ERROR_MESSAGE.to_string(),
                })
                .await;
        }
    });

    // The receiver closes once the engine has emitted its terminal event,
    // which ends the SSE stream; a disconnecting client drops this stream
    // and the engine observes the closed channel before its next call.
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (sse_frame(&event), rx))
    });

    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

/// Serializes one event into an SSE data frame.
fn sse_frame(event: &DialogueEvent) -> Result<Event, Infallible> {
    match serde_json::to_string(event) {
        Ok(json) => Ok(Event::default().data(json)),
        Err(err) => {
            error!("failed to serialize dialogue event: {}", err);
            Ok(Event::default().data(format!(
                "{{\"type\":\"error\",\"message\":\"{}\"}}",
                INTERNAL_ERROR_MESSAGE
            )))
        }
    }
}

/// `GET /api/health` - liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: state.environment.as_str(),
    })
}

/// `GET /` - landing payload.
pub async fn index() -> Json<LandingResponse> {
    Json(LandingResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        stream_endpoint: "/api/start-conversation",
    })
}

/// Fallback for unknown paths.
pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("The requested resource was not found")),
    )
}
