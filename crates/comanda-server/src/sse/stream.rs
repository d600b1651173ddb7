use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::Stream;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::app::AppState;
use crate::sse::broadcast::{keep_alive_frame, EventBroadcaster, RegistrationHandle};

/// Deregisters its subscription when dropped. Client disconnects surface as
/// axum dropping the body stream, which takes the guard with it.
pub(crate) struct SubscriberGuard {
    broadcaster: Arc<EventBroadcaster>,
    handle: RegistrationHandle,
}

impl SubscriberGuard {
    pub(crate) fn new(broadcaster: Arc<EventBroadcaster>, handle: RegistrationHandle) -> Self {
        Self {
            broadcaster,
            handle,
        }
    }
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        self.broadcaster.deregister(self.handle);
    }
}

/// Frames for one subscriber, interleaved with keep-alives while idle.
///
/// The keep-alive timer lives inside the stream, so it is anchored to this
/// subscription and stops with it. The stream ends when the broadcaster
/// prunes the sender (channel closed) or the client goes away (stream and
/// guard dropped).
pub(crate) fn frame_stream(
    mut rx: mpsc::Receiver<String>,
    guard: SubscriberGuard,
    keep_alive: Duration,
) -> impl Stream<Item = Result<String, Infallible>> {
    async_stream::stream! {
        let _guard = guard;
        let mut tick = tokio::time::interval(keep_alive);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // an interval's first tick fires immediately; swallow it
        tick.tick().await;
        loop {
            tokio::select! {
                frame = rx.recv() => match frame {
                    Some(frame) => {
                        tick.reset();
                        yield Ok(frame);
                    }
                    None => break,
                },
                _ = tick.tick() => yield Ok(keep_alive_frame()),
            }
        }
    }
}

/// GET /events — long-lived SSE subscription.
pub async fn events_handler(State(state): State<Arc<AppState>>) -> Response {
    let (tx, rx) = mpsc::channel(state.config.events.subscriber_buffer);
    let handle = state.broadcaster.register(tx);
    let guard = SubscriberGuard::new(Arc::clone(&state.broadcaster), handle);
    let stream = frame_stream(
        rx,
        guard,
        Duration::from_secs(state.config.events.keep_alive_secs),
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
