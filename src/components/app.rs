use crate::api::{ConnectionStatus, Origin};
use crate::components::{MediainfoSync, NowPlaying, Player};
use crate::config;
use crate::sync::NowPlayingState;
use dioxus::prelude::*;

const DEFAULT_PAGE_TITLE: &str = "Radio";

/// Current now-playing snapshot, written only by [`MediainfoSync`].
#[derive(Clone, Copy)]
pub struct NowPlayingSignal(pub Signal<NowPlayingState>);

#[derive(Clone, Copy)]
pub struct ConnectionSignal(pub Signal<ConnectionStatus>);

/// Backend origin, resolved once per page load. `None` when the page location is unusable.
#[derive(Clone, PartialEq)]
pub struct ResolvedOrigin(pub Option<Origin>);

#[component]
pub fn AppShell() -> Element {
    let origin = use_hook(|| match Origin::from_window(&config::get().base_path) {
        Ok(origin) => {
            tracing::info!(
                "backend origin {}{} ({})",
                origin.authority(),
                origin.base_path(),
                origin.stream_url()
            );
            Some(origin)
        }
        Err(err) => {
            tracing::warn!("could not resolve backend origin: {err}");
            None
        }
    });
    let now_playing = use_signal(NowPlayingState::default);
    let connection = use_signal(|| ConnectionStatus::Connecting);

    use_context_provider(|| ResolvedOrigin(origin));
    use_context_provider(|| NowPlayingSignal(now_playing));
    use_context_provider(|| ConnectionSignal(connection));

    // The tab title follows the current track; it only changes when a new title is derived.
    let page_title = now_playing
        .read()
        .page_title
        .clone()
        .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string());

    rsx! {
        document::Title { "{page_title}" }
        div { id: "container",
            NowPlaying {}
            Player {}
        }

        // Metadata sync - owns the socket and fetch loop
        MediainfoSync {}
    }
}
