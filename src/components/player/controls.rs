use crate::components::{find_audio_element, PlaybackErrorSignal, PlaybackSignal};
use dioxus::prelude::*;

/// Play/Pause button - joins the stream near its live edge when starting
#[component]
pub(super) fn PlayPauseButton() -> Element {
    let mut controller = use_context::<PlaybackSignal>().0;
    let mut playback_error = use_context::<PlaybackErrorSignal>().0;
    let playing = controller.read().state().is_playing();

    rsx! {
        button {
            id: "play",
            r#type: "button",
            onclick: move |_| {
                let audio = find_audio_element();
                let result = controller.write().toggle_play(audio.as_ref());
                match result {
                    Ok(status) => {
                        tracing::info!("playback {status:?}");
                        playback_error.set(None);
                    }
                    Err(err) => {
                        tracing::warn!("play/pause ignored: {err}");
                        playback_error.set(Some(err.to_string()));
                    }
                }
            },
            if playing {
                "Pause"
            } else {
                "Play"
            }
        }
    }
}

#[component]
pub(super) fn VolumeSlider() -> Element {
    let mut controller = use_context::<PlaybackSignal>().0;
    let volume = controller.read().state().volume_percent();

    rsx! {
        input {
            id: "volume",
            r#type: "range",
            min: "0",
            max: "100",
            step: "1",
            value: "{volume}",
            oninput: move |e: Event<FormData>| {
                if let Ok(percent) = e.value().parse::<f64>() {
                    let audio = find_audio_element();
                    controller.write().change_volume(audio.as_ref(), percent);
                }
            },
        }
    }
}
