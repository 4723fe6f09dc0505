//! The components module contains all shared components for our app.

mod album_art;
mod app;
mod audio_element;
mod mediainfo_sync;
mod now_playing;
mod player;

pub use album_art::*;
pub use app::*;
pub use audio_element::*;
pub use mediainfo_sync::*;
pub use now_playing::*;
pub use player::*;
