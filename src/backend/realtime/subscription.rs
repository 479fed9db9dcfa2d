/**
 * Real-time Subscription Handler
 *
 * `GET /realtime` streams `RealtimeEvent`s as Server-Sent Events.
 *
 * # Opening a stream
 *
 * The request must either accept `text/event-stream` (what a browser
 * `EventSource` sends) or carry a `Subscribe` header. Anything else gets
 * 400, so a plain page load never hangs on an endless response.
 *
 * # Connection Management
 *
 * - Connections are kept alive using SSE keep-alive comments
 * - Lagged receivers skip the missed events and keep streaming
 * - The stream ends when the broadcast channel closes
 */

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream;
use std::collections::HashMap;
use tokio::sync::broadcast::error::RecvError;

use crate::backend::realtime::broadcast::RealtimeEventBroadcast;
use crate::shared::EventType;

/// Parse `?types=a,b` into a filter. `None` means every type.
pub(crate) fn parse_type_filter(query: &HashMap<String, String>) -> Option<Vec<EventType>> {
    query
        .get("types")
        .map(|types| types.split(',').filter_map(EventType::parse).collect::<Vec<_>>())
        .filter(|types| !types.is_empty())
}

pub(crate) fn wants_stream(headers: &HeaderMap) -> bool {
    if headers.contains_key("subscribe") {
        return true;
    }

    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("text/event-stream"))
}

/// Handle real-time subscription (GET /realtime)
///
/// # Query Parameters
///
/// - `types` - Comma-separated list of event types (optional)
///
/// # Errors
///
/// * `400 Bad Request` - Neither `Accept: text/event-stream` nor `Subscribe`
///
/// # Example Response
///
/// ```text
/// event: feed
/// data: {"event_type":"feed","payload":{"channel":"bugs","post_id":"...","action":"created"},...}
/// ```
pub async fn handle_realtime_subscription(
    State(broadcast_tx): State<RealtimeEventBroadcast>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>>, StatusCode> {
    if !wants_stream(&headers) {
        tracing::warn!("[Realtime] Subscription request without event-stream Accept or Subscribe header");
        return Err(StatusCode::BAD_REQUEST);
    }

    let filter = parse_type_filter(&query);
    match &filter {
        Some(types) => tracing::info!("[Realtime] Filtering events by types: {:?}", types),
        None => tracing::info!("[Realtime] Subscribing to all event types"),
    }

    let broadcast_rx = broadcast_tx.subscribe();

    let stream = stream::unfold((broadcast_rx, filter), |(mut rx, filter)| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(types) = &filter {
                        if !types.contains(&event.event_type) {
                            continue;
                        }
                    }

                    let data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[Realtime] Failed to serialize event: {:?}", e);
                            continue;
                        }
                    };

                    let sse_event = Event::default()
                        .event(event.event_type.as_str())
                        .data(data);

                    return Some((Ok(sse_event), (rx, filter)));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Receiver lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => {
                    tracing::warn!("[Realtime] Broadcast channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
