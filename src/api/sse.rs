//! Server-Sent Events support

use crate::runtime::{SessionEvent, SessionSnapshot};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Stream the snapshot as an `init` event, then every session change
pub fn sse_stream(
    init: SessionSnapshot,
    broadcast_rx: tokio::sync::broadcast::Receiver<SessionEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::iter(to_sse_event("init", &init).map(Ok::<_, Infallible>));

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => to_sse_event(event.event_name(), &event).map(Ok),
        Err(e) => {
            // Lagged receivers skip ahead; the client can refetch the snapshot
            tracing::warn!(error = %e, "SSE subscriber lagged");
            None
        }
    });

    Sse::new(init.chain(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn to_sse_event<T: serde::Serialize>(name: &'static str, payload: &T) -> Option<Event> {
    match Event::default().event(name).json_data(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::error!(event = name, error = %e, "Failed to encode SSE event");
            None
        }
    }
}
