//! SSE streaming chat endpoint.
//!
//! POST /api/v1/chat/stream
//!
//! Validates the request, runs one exchange through the orchestrator, and
//! relays the fragment stream as Server-Sent Events. Persistence of both
//! sides of the exchange happens inside the orchestrator and its returned
//! stream; this handler only shapes the wire format.
//!
//! SSE event types:
//! - `text_delta` — incremental text: `{ "text": "..." }`
//! - `error` — mid-stream failure: `{ "message": "..." }` (stream ends)
//! - `done` — stream complete: `{}`

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;

use crate::http::error::AppError;
use crate::http::validate::{validate_messages, validate_session_id};
use crate::state::AppState;

/// Request body for the streaming chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatStreamRequest {
    /// Messages submitted for this exchange.
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
    /// Per-request system instruction, appended to the configured default.
    #[serde(rename = "systemInstruction")]
    pub system_instruction: Option<String>,
    /// Per-request context, appended to the configured default.
    pub context: Option<String>,
    /// Session identifier; the `x-session-id` header takes precedence.
    pub session_id: Option<String>,
}

/// One submitted message, pre-validation.
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    pub content: String,
}

/// POST /api/v1/chat/stream — SSE streaming chat.
pub async fn stream_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatStreamRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let header_session = headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());
    let session_id = validate_session_id(
        header_session.or(body.session_id.as_deref()),
        &state.config,
    )?;

    let messages = validate_messages(&body.messages, &state.config)?;

    let relay_stream = state
        .orchestrator
        .run(
            &session_id,
            messages,
            body.system_instruction.as_deref(),
            body.context.as_deref(),
        )
        .await?;

    let sse_stream = async_stream::stream! {
        let mut relay_stream = std::pin::pin!(relay_stream);

        while let Some(item) = relay_stream.next().await {
            match item {
                Ok(fragment) => {
                    let data = serde_json::json!({ "text": fragment });
                    yield Ok::<_, Infallible>(
                        Event::default().event("text_delta").data(data.to_string()),
                    );
                }
                Err(e) => {
                    let data = serde_json::json!({ "message": e.to_string() });
                    yield Ok(Event::default().event("error").data(data.to_string()));
                    break;
                }
            }
        }

        yield Ok(Event::default().event("done").data("{}"));
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
