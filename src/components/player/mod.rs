use crate::api::Origin;
use crate::components::{find_audio_element, ResolvedOrigin, AUDIO_ELEMENT_ID};
use crate::config;
use crate::playback::PlaybackController;
use dioxus::prelude::*;

mod controls;

use controls::{PlayPauseButton, VolumeSlider};

/// Playback state for the stream. Lives as long as the player is mounted and is
/// never touched by metadata updates.
#[derive(Clone, Copy)]
pub struct PlaybackSignal(pub Signal<PlaybackController>);

/// Last failed playback command, shown under the controls.
#[derive(Clone, Copy)]
pub struct PlaybackErrorSignal(pub Signal<Option<String>>);

#[component]
pub fn Player() -> Element {
    let origin = use_context::<ResolvedOrigin>().0;
    let controller =
        use_signal(|| PlaybackController::new(config::get().default_volume_percent));
    let playback_error = use_signal(|| None::<String>);

    use_context_provider(|| PlaybackSignal(controller));
    use_context_provider(|| PlaybackErrorSignal(playback_error));

    let stream_url = origin.as_ref().map(Origin::stream_url);

    // Push the initial volume once the element is in the DOM.
    use_effect(move || {
        if let Some(audio) = find_audio_element() {
            controller.peek().sync_element(&audio);
        }
    });

    use_drop(move || {
        if let Some(audio) = find_audio_element() {
            tracing::debug!("player unmounted; releasing stream");
            audio.release();
        }
    });

    rsx! {
        div { id: "player",
            div { id: "controls",
                PlayPauseButton {}
                span { "Volume:" }
                VolumeSlider {}
                if let Some(url) = stream_url {
                    audio { id: AUDIO_ELEMENT_ID, src: "{url}", preload: "none" }
                } else {
                    audio { id: AUDIO_ELEMENT_ID, preload: "none" }
                }
            }
            if let Some(message) = playback_error() {
                p { class: "playback-error", "{message}" }
            }
        }
    }
}
