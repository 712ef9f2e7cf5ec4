use std::{convert::Infallible, time::Duration};

use axum::{
    extract::{Extension, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::Stream;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use crate::{models::{CurrentUser, Notification}, AppState};

/// A notification row committed to the store, published on the in-process
/// broadcast channel so connected clients and the merge task see it without
/// polling.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub user_id: ObjectId,
    pub notification: Notification,
}

impl NotificationEvent {
    pub fn new(notification: Notification) -> Self {
        Self {
            user_id: notification.user_id,
            notification,
        }
    }
}

/// Delivers the current user's notification inserts over SSE.
///
/// Best-effort: events emitted while a client is disconnected are not
/// replayed; the session-start reload backfills the log instead.
pub async fn sse_notifications(
    State(state): State<AppState>,
    Extension(u): Extension<CurrentUser>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();
    let user_id = u.id;

    let stream = futures_util::stream::unfold(rx, move |mut rx| async move {
        loop {
            let evt = match rx.recv().await {
                Ok(evt) if evt.user_id == user_id => {
                    let data = serde_json::to_string(&evt.notification)
                        .unwrap_or_else(|_| "{}".to_string());
                    Event::default().event("notification").data(data)
                }
                // other users' traffic on the shared channel
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => Event::default().event("ping").data("lagged"),
                Err(RecvError::Closed) => Event::default().event("ping").data("closed"),
            };

            return Some((Ok(evt), rx));
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(20))
            .text("keep-alive"),
    )
}

/// Routes every published insert into the owning user's in-memory log.
///
/// This is the push half of the dual-source merge: the inserting caller
/// appends its own response row, this task appends the broadcast echo, and
/// the log's id de-duplication makes the two arrivals commutative.
pub fn spawn_notification_merge(state: AppState) {
    tokio::spawn(async move {
        let mut rx = state.events_tx.subscribe();

        loop {
            match rx.recv().await {
                Ok(evt) => {
                    state.notifications.append(evt.user_id, evt.notification).await;
                }
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("notification merge lagged, {} events dropped", n);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
