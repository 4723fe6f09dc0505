//! Display helpers derived from a [`MetadataRecord`]. Everything here is pure.

use crate::api::models::{DerivedTitle, MetadataRecord};

pub const NOT_AVAILABLE: &str = "N/A";

const TITLE_KEYS: [&str; 3] = ["title", "publisher", "filename"];
const ARTIST_KEYS: [&str; 2] = ["album_artist", "artist"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerivationError {
    #[error("record has no title, publisher or filename")]
    MissingTitle,
}

fn first_field<'a>(record: &'a MetadataRecord, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| record.field(key))
}

/// Title, falling back to the publisher and then the file name.
pub fn best_title(record: &MetadataRecord) -> Result<String, DerivationError> {
    first_field(record, &TITLE_KEYS)
        .map(str::to_string)
        .ok_or(DerivationError::MissingTitle)
}

/// Album artist, falling back to the track artist.
pub fn best_artist(record: &MetadataRecord) -> Option<String> {
    first_field(record, &ARTIST_KEYS).map(str::to_string)
}

pub fn derive_title(record: &MetadataRecord) -> Result<DerivedTitle, DerivationError> {
    Ok(DerivedTitle {
        title: best_title(record)?,
        artist: best_artist(record),
    })
}

/// `"<artist> - <title>"`, or just the title when there is no artist.
pub fn join_title_artist(derived: &DerivedTitle) -> String {
    match &derived.artist {
        Some(artist) => format!("{artist} - {}", derived.title),
        None => derived.title.clone(),
    }
}

/// Text shown for one metadata entry.
pub fn display_value(key: &str, raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };

    if key == "bitrate" {
        if let Ok(bits_per_second) = raw.trim().parse::<u64>() {
            return format!("{}kbps", bits_per_second / 1000);
        }
    }

    raw.to_string()
}

/// `album_artist` -> `Album Artist`.
pub fn title_case(snake_key: &str) -> String {
    snake_key
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
