/**
 * Real-time Event Broadcasting
 *
 * Events are broadcast using `tokio::sync::broadcast`, which provides
 * a multi-producer, multi-consumer channel. All subscribers receive
 * a copy of each event.
 *
 * Handlers broadcast after their database write has committed, so a client
 * that refetches on an event always sees the change.
 */

use crate::shared::RealtimeEvent;
use tokio::sync::broadcast;

/// Real-time update event broadcast
///
/// Cloned into every handler through `AppState`.
pub type RealtimeEventBroadcast = broadcast::Sender<RealtimeEvent>;

/// Broadcast a real-time event to all subscribers
///
/// # Returns
///
/// Number of active subscribers that received the event (0 if no subscribers)
pub async fn broadcast_event(
    broadcast_tx: &RealtimeEventBroadcast,
    event: RealtimeEvent,
) -> usize {
    let event_type = event.event_type.clone();
    match broadcast_tx.send(event) {
        Ok(subscriber_count) => {
            tracing::info!(
                "[Realtime] {} event broadcast to {} subscribers",
                event_type,
                subscriber_count
            );
            subscriber_count
        }
        Err(_) => {
            // No subscribers, that's okay
            tracing::debug!("[Realtime] No subscribers to receive {} event", event_type);
            0
        }
    }
}
