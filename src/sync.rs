//! Keeps the now-playing snapshot in step with the backend.
//!
//! Every notification starts exactly one fetch. A notification that arrives
//! while a fetch is still running drops that fetch, so a slow, older response
//! can never overwrite a newer one.

use crate::api::models::{MetadataHistory, MetadataRecord};
use crate::api::notifications::Notification;
use crate::metadata::{derive_title, join_title_artist};
use futures_util::future::{select, Either};
use futures_util::stream::{Stream, StreamExt};
use std::future::Future;
use std::pin::{pin, Pin};

/// The snapshot rendered by the now-playing view. Replaced as a whole on every update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NowPlayingState {
    pub history: Option<MetadataHistory>,
    pub art_token: i64,
    pub page_title: Option<String>,
}

impl NowPlayingState {
    pub fn current(&self) -> Option<&MetadataRecord> {
        self.history.as_ref().and_then(|history| history.first())
    }

    /// Apply a fetch result. `None` means "no data": the metadata clears but the
    /// page title keeps whatever it showed last.
    pub fn apply(&mut self, outcome: Option<MetadataHistory>, art_token: i64) {
        let Some(history) = outcome else {
            self.history = None;
            return;
        };

        if let Some(record) = history.first() {
            match derive_title(record) {
                Ok(derived) => self.page_title = Some(join_title_artist(&derived)),
                Err(err) => tracing::warn!("keeping page title: {err}"),
            }
        }
        self.art_token = art_token;
        self.history = Some(history);
    }
}

enum Step<T> {
    Notified(Notification),
    Closed,
    Resolved(T),
}

/// Run the fetch loop until `notifications` ends.
///
/// `fetch` is called once per notification; `apply` receives the result of
/// every fetch that was not superseded. A fetch still running when the stream
/// ends is awaited and applied before returning.
pub async fn drive<N, F, Fut, A>(notifications: N, mut fetch: F, mut apply: A)
where
    N: Stream<Item = Notification>,
    F: FnMut(Notification) -> Fut,
    Fut: Future<Output = Option<MetadataHistory>>,
    A: FnMut(Option<MetadataHistory>),
{
    let mut notifications = pin!(notifications);
    let mut in_flight: Option<Pin<Box<Fut>>> = None;

    loop {
        let step = match in_flight.as_mut() {
            None => match notifications.next().await {
                Some(notification) => Step::Notified(notification),
                None => Step::Closed,
            },
            Some(pending) => match select(notifications.next(), pending).await {
                Either::Left((Some(notification), _)) => Step::Notified(notification),
                Either::Left((None, _)) => Step::Closed,
                Either::Right((outcome, _)) => Step::Resolved(outcome),
            },
        };

        match step {
            Step::Notified(notification) => {
                if in_flight.is_some() {
                    tracing::debug!("superseding in-flight mediainfo fetch");
                }
                tracing::debug!("fetching mediainfo after {notification:?}");
                in_flight = Some(Box::pin(fetch(notification)));
            }
            Step::Resolved(outcome) => {
                in_flight = None;
                apply(outcome);
            }
            Step::Closed => {
                if let Some(pending) = in_flight.take() {
                    apply(pending.await);
                }
                tracing::info!("notification stream ended");
                return;
            }
        }
    }
}
