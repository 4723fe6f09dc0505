// Browser audio element adapter for the playback controller.
use crate::playback::{MediaElement, PlaybackError};
#[cfg(target_arch = "wasm32")]
use dioxus::prelude::spawn;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

pub const AUDIO_ELEMENT_ID: &str = "radio-audio";

#[cfg(target_arch = "wasm32")]
pub struct AudioHandle(HtmlAudioElement);

/// Look up the stream's audio element, if it is mounted.
#[cfg(target_arch = "wasm32")]
pub fn find_audio_element() -> Option<AudioHandle> {
    let document = window()?.document()?;
    let element = document.get_element_by_id(AUDIO_ELEMENT_ID)?;
    element.dyn_into::<HtmlAudioElement>().ok().map(AudioHandle)
}

#[cfg(target_arch = "wasm32")]
impl AudioHandle {
    /// Stop playback and drop the stream connection.
    pub fn release(&self) {
        let _ = self.0.pause();
        let _ = self.0.remove_attribute("src");
        self.0.load();
    }
}

#[cfg(target_arch = "wasm32")]
impl MediaElement for AudioHandle {
    fn duration(&self) -> f64 {
        self.0.duration()
    }

    fn set_current_time(&self, seconds: f64) {
        self.0.set_current_time(seconds);
    }

    fn play(&self) -> Result<(), PlaybackError> {
        let promise = self
            .0
            .play()
            .map_err(|err| PlaybackError::Rejected(format!("{err:?}")))?;
        spawn(async move {
            if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                tracing::warn!("audio play() was rejected: {err:?}");
            }
        });
        Ok(())
    }

    fn pause(&self) -> Result<(), PlaybackError> {
        self.0
            .pause()
            .map_err(|err| PlaybackError::Rejected(format!("{err:?}")))
    }

    fn set_volume(&self, fraction: f64) {
        self.0.set_volume(fraction);
    }

    fn has_source(&self) -> bool {
        self.0
            .get_attribute("src")
            .is_some_and(|src| !src.trim().is_empty())
    }
}

/// Native builds render no browser audio element.
#[cfg(not(target_arch = "wasm32"))]
pub struct AudioHandle;

#[cfg(not(target_arch = "wasm32"))]
pub fn find_audio_element() -> Option<AudioHandle> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioHandle {
    pub fn release(&self) {}
}

#[cfg(not(target_arch = "wasm32"))]
impl MediaElement for AudioHandle {
    fn duration(&self) -> f64 {
        f64::NAN
    }

    fn set_current_time(&self, _seconds: f64) {}

    fn play(&self) -> Result<(), PlaybackError> {
        Err(PlaybackError::MediaUnavailable)
    }

    fn pause(&self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn set_volume(&self, _fraction: f64) {}

    fn has_source(&self) -> bool {
        false
    }
}
