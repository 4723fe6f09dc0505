use crate::api::models::MetadataRecord;
use crate::metadata::{best_title, derive_title, join_title_artist, DerivationError};

const QUERY_PLACEHOLDER: &str = "{query}";

/// An outbound search link and the exact query it searches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLink {
    pub url: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQueries {
    pub youtube: SearchLink,
    pub song_db: SearchLink,
}

/// Search templates with a `{query}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTemplates<'a> {
    pub youtube: &'a str,
    pub song_db: &'a str,
}

impl<'a> SearchTemplates<'a> {
    pub fn from_config(config: &'a crate::config::AppConfig) -> Self {
        Self {
            youtube: &config.youtube_search_url,
            song_db: &config.song_db_search_url,
        }
    }
}

/// Fill `template` with the percent-encoded query. Templates without a
/// placeholder get the query appended.
pub fn build_search_url(template: &str, query: &str) -> String {
    let encoded = urlencoding::encode(query);
    if template.contains(QUERY_PLACEHOLDER) {
        template.replace(QUERY_PLACEHOLDER, &encoded)
    } else {
        format!("{template}{encoded}")
    }
}

/// Video search uses "artist - title"; the song database only gets the title.
pub fn search_queries(
    record: &MetadataRecord,
    templates: SearchTemplates<'_>,
) -> Result<SearchQueries, DerivationError> {
    let video_query = join_title_artist(&derive_title(record)?);
    let song_query = best_title(record)?;

    Ok(SearchQueries {
        youtube: SearchLink {
            url: build_search_url(templates.youtube, &video_query),
            query: video_query,
        },
        song_db: SearchLink {
            url: build_search_url(templates.song_db, &song_query),
            query: song_query,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATES: SearchTemplates<'static> = SearchTemplates {
        youtube: "https://video.example/results?search_query={query}",
        song_db: "https://songs.example/search?q={query}&type=song",
    };

    #[test]
    fn builds_both_queries() {
        let record: MetadataRecord = [("title", "Song & Dance"), ("artist", "The Band")]
            .into_iter()
            .collect();
        let queries = search_queries(&record, TEMPLATES).unwrap();

        assert_eq!(queries.youtube.query, "The Band - Song & Dance");
        assert_eq!(
            queries.youtube.url,
            "https://video.example/results?search_query=The%20Band%20-%20Song%20%26%20Dance"
        );
        assert_eq!(queries.song_db.query, "Song & Dance");
        assert_eq!(
            queries.song_db.url,
            "https://songs.example/search?q=Song%20%26%20Dance&type=song"
        );
    }

    #[test]
    fn untitled_record_has_no_queries() {
        let record: MetadataRecord = [("artist", "The Band")].into_iter().collect();
        assert_eq!(
            search_queries(&record, TEMPLATES),
            Err(DerivationError::MissingTitle)
        );
    }

    #[test]
    fn template_without_placeholder_appends_query() {
        assert_eq!(
            build_search_url("https://songs.example/?q=", "a b"),
            "https://songs.example/?q=a%20b"
        );
    }

    #[test]
    fn default_templates_are_usable() {
        let config = crate::config::AppConfig::default();
        let record: MetadataRecord = [("filename", "track.mp3")].into_iter().collect();
        let queries = search_queries(&record, SearchTemplates::from_config(&config)).unwrap();
        assert!(queries.youtube.url.starts_with("https://www.youtube.com/results?"));
        assert!(queries.song_db.url.ends_with("query=track.mp3"));
    }
}
