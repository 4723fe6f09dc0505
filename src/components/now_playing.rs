use crate::api::{search_queries, ConnectionStatus, MetadataRecord, SearchTemplates};
use crate::components::{AlbumArt, ConnectionSignal, NowPlayingSignal, ResolvedOrigin};
use crate::config;
use crate::metadata::{display_value, title_case};
use dioxus::prelude::*;

#[component]
pub fn NowPlaying() -> Element {
    let origin = use_context::<ResolvedOrigin>().0;
    let now_playing = use_context::<NowPlayingSignal>().0;
    let connection = use_context::<ConnectionSignal>().0;

    let state = now_playing.read().clone();
    let current = state.current().cloned();

    // Art is requested for this exact file, so a late response cannot show the wrong track.
    let art_src = match (&origin, current.as_ref().and_then(|r| r.field("filename"))) {
        (Some(origin), Some(filename)) => Some(origin.album_art_url(filename, state.art_token)),
        _ => None,
    };

    rsx! {
        div { id: "mediainfo",
            div { id: "image",
                AlbumArt { src: art_src }
            }
            div { id: "info",
                ConnectionBadge { status: connection() }
                match current {
                    Some(record) => rsx! {
                        MetadataList { record: record.clone() }
                        MediaSearchLinks { record }
                    },
                    None => rsx! {
                        p { class: "no-data", "No track information available" }
                    },
                }
            }
        }
    }
}

#[component]
fn ConnectionBadge(status: ConnectionStatus) -> Element {
    let label = match status {
        ConnectionStatus::Connected => return rsx! {},
        ConnectionStatus::Connecting => "Connecting to live updates...",
        ConnectionStatus::Disconnected => "Live updates disconnected",
    };

    rsx! {
        p { class: "connection-status", role: "status", "{label}" }
    }
}

#[component]
fn MetadataList(record: MetadataRecord) -> Element {
    rsx! {
        ul {
            {record.entries().map(|(name, value)| {
                let label = title_case(name);
                let shown = display_value(name, Some(value));
                rsx! {
                    li { key: "{name}",
                        span { class: "mediainfo-key", "{label}: " }
                        span { class: "mediainfo-value", "{shown}" }
                    }
                }
            })}
        }
    }
}

#[component]
fn MediaSearchLinks(record: MetadataRecord) -> Element {
    let templates = SearchTemplates::from_config(config::get());
    let queries = match search_queries(&record, templates) {
        Ok(queries) => queries,
        Err(err) => {
            tracing::debug!("no search links: {err}");
            return rsx! {};
        }
    };

    let youtube_url = queries.youtube.url;
    let youtube_tooltip = format!("Search YouTube for \"{}\"", queries.youtube.query);
    let song_db_url = queries.song_db.url;
    let song_db_tooltip = format!("Search the song database for \"{}\"", queries.song_db.query);

    rsx! {
        div { id: "media-search",
            a {
                href: "{youtube_url}",
                target: "_blank",
                rel: "noopener noreferrer",
                title: "{youtube_tooltip}",
                "YouTube"
            }
            a {
                href: "{song_db_url}",
                target: "_blank",
                rel: "noopener noreferrer",
                title: "{song_db_tooltip}",
                "Song database"
            }
        }
    }
}
