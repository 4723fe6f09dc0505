use crate::api::{
    notification_stream, ConnectionStatus, MediainfoClient, Notification, ReconnectPolicy,
};
use crate::components::{ConnectionSignal, NowPlayingSignal, ResolvedOrigin};
use crate::config;
use crate::sync;
use crate::utils::cache_bust_token;
use dioxus::prelude::*;
use futures_util::stream::{self, StreamExt};

/// Runs the notification -> fetch -> state loop for as long as it is mounted.
/// Renders nothing; unmounting drops the task and closes the socket.
#[component]
pub fn MediainfoSync() -> Element {
    let origin = use_context::<ResolvedOrigin>().0;
    let mut now_playing = use_context::<NowPlayingSignal>().0;
    let mut connection = use_context::<ConnectionSignal>().0;

    use_effect(move || {
        let origin = origin.clone();
        spawn(async move {
            let Some(origin) = origin else {
                connection.set(ConnectionStatus::Disconnected);
                return;
            };

            let config = config::get();
            let client = MediainfoClient::new(origin.mediainfo_url(), config.fetch_timeout());
            let socket = notification_stream(
                origin.notifications_url(),
                ReconnectPolicy::from_config(config),
                move |status| connection.set(status),
            );
            let notifications = stream::once(async { Notification::Initial }).chain(socket);

            tracing::info!("syncing now-playing metadata from {}", client.url());
            sync::drive(
                notifications,
                move |_| {
                    let client = client.clone();
                    async move { client.fetch_mediainfo().await }
                },
                move |outcome| {
                    let art_token = cache_bust_token();
                    now_playing.write().apply(outcome, art_token);
                },
            )
            .await;
        });
    });

    rsx! {}
}
