//! Play/pause and volume for the stream's audio element.
//! Independent of metadata: nothing here is reset when the track changes.

/// The parts of an audio element the controller drives.
pub trait MediaElement {
    /// Media duration in seconds; `NaN` or infinite while unknown.
    fn duration(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
    fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self) -> Result<(), PlaybackError>;
    fn set_volume(&self, fraction: f64);
    /// Whether a stream URL has been attached.
    fn has_source(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("audio element is not mounted yet")]
    MediaUnavailable,
    #[error("stream URL has not been resolved")]
    StreamUnresolved,
    #[error("playback request was rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub volume_fraction: f64,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn volume_percent(&self) -> u8 {
        (self.volume_fraction * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Seek target that joins a live stream one second before its edge.
pub fn live_edge(duration: f64) -> Option<f64> {
    duration.is_finite().then(|| (duration - 1.0).max(0.0))
}

pub fn percent_to_fraction(percent: f64) -> f64 {
    if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackController {
    state: PlaybackState,
}

impl PlaybackController {
    pub fn new(default_volume_percent: u8) -> Self {
        Self {
            state: PlaybackState {
                status: PlaybackStatus::Stopped,
                volume_fraction: percent_to_fraction(f64::from(default_volume_percent)),
            },
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Stopped -> Playing seeks near the live edge and plays; Playing -> Stopped pauses.
    /// State only changes when the element accepted the command.
    pub fn toggle_play<M: MediaElement>(
        &mut self,
        element: Option<&M>,
    ) -> Result<PlaybackStatus, PlaybackError> {
        let element = element.ok_or(PlaybackError::MediaUnavailable)?;
        if !element.has_source() {
            return Err(PlaybackError::StreamUnresolved);
        }

        match self.state.status {
            PlaybackStatus::Stopped => {
                if let Some(target) = live_edge(element.duration()) {
                    element.set_current_time(target);
                }
                element.play()?;
                self.state.status = PlaybackStatus::Playing;
            }
            PlaybackStatus::Playing => {
                element.pause()?;
                self.state.status = PlaybackStatus::Stopped;
            }
        }

        tracing::debug!("playback is now {:?}", self.state.status);
        Ok(self.state.status)
    }

    /// Map a 0..=100 slider value onto the element volume.
    /// The value is kept even without an element and applied once one mounts.
    pub fn change_volume<M: MediaElement>(&mut self, element: Option<&M>, percent: f64) -> f64 {
        self.state.volume_fraction = percent_to_fraction(percent);
        if let Some(element) = element {
            element.set_volume(self.state.volume_fraction);
        }
        self.state.volume_fraction
    }

    /// Push the stored volume onto a freshly mounted element.
    pub fn sync_element<M: MediaElement>(&self, element: &M) {
        element.set_volume(self.state.volume_fraction);
    }
}
