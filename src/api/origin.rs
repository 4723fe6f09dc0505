use url::Url;

/// Which kind of URL to build on the backend origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Http,
    Ws,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginError {
    #[error("page location {0:?} is not a valid URL")]
    InvalidLocation(String),
    #[error("base path {0:?} cannot be resolved against the page origin")]
    InvalidBasePath(String),
    #[error("page scheme {0:?} is neither http nor https")]
    UnsupportedScheme(String),
    #[error("page location has no host")]
    MissingHost,
}

/// The backend origin, derived from the page location and the configured base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    secure: bool,
    /// `host[:port]`
    authority: String,
    /// Always starts and ends with a single `/`.
    base_path: String,
}

impl Origin {
    /// Resolve against a page URL such as `https://radio.example/listen?x=1`.
    ///
    /// The base path is applied to the page's origin, not the page's own path,
    /// so it may be absolute (`/radio/`) or relative (`radio`).
    pub fn resolve(page_href: &str, base_path: &str) -> Result<Self, OriginError> {
        let page =
            Url::parse(page_href).map_err(|_| OriginError::InvalidLocation(page_href.to_string()))?;

        let secure = match page.scheme() {
            "http" => false,
            "https" => true,
            other => return Err(OriginError::UnsupportedScheme(other.to_string())),
        };

        let host = page.host_str().ok_or(OriginError::MissingHost)?;
        let authority = match page.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let mut root = page.clone();
        root.set_query(None);
        root.set_fragment(None);
        root.set_path("/");
        let base = root
            .join(base_path.trim())
            .map_err(|_| OriginError::InvalidBasePath(base_path.to_string()))?;

        Ok(Self {
            secure,
            authority,
            base_path: normalize_base_path(base.path()),
        })
    }

    /// Resolve from the browser's current location.
    #[cfg(target_arch = "wasm32")]
    pub fn from_window(base_path: &str) -> Result<Self, OriginError> {
        let href = web_sys::window()
            .and_then(|window| window.location().href().ok())
            .ok_or_else(|| OriginError::InvalidLocation(String::new()))?;
        Self::resolve(&href, base_path)
    }

    /// Native builds have no page; the configured server URL stands in for it.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_window(base_path: &str) -> Result<Self, OriginError> {
        Self::resolve(&crate::config::get().server_url, base_path)
    }

    pub fn scheme(&self, kind: UrlKind) -> &'static str {
        match (kind, self.secure) {
            (UrlKind::Http, false) => "http",
            (UrlKind::Http, true) => "https",
            (UrlKind::Ws, false) => "ws",
            (UrlKind::Ws, true) => "wss",
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Absolute URL for `path` on this origin. A single leading `/` on `path` is ignored.
    pub fn make_url(&self, kind: UrlKind, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!(
            "{}://{}{}{}",
            self.scheme(kind),
            self.authority,
            self.base_path,
            path
        )
    }

    pub fn mediainfo_url(&self) -> String {
        self.make_url(UrlKind::Http, "/mediainfo")
    }

    pub fn notifications_url(&self) -> String {
        self.make_url(UrlKind::Ws, "/mediainfo/ws")
    }

    pub fn stream_url(&self) -> String {
        self.make_url(UrlKind::Http, "/stream")
    }

    /// Album art for a specific file. `cache_token` forces the browser past any cached copy.
    pub fn album_art_url(&self, filename: &str, cache_token: i64) -> String {
        format!(
            "{}?n={}&t={cache_token}",
            self.make_url(UrlKind::Http, "/album_art"),
            urlencoding::encode(filename)
        )
    }
}

fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn websocket_scheme_follows_page_security() {
        let secure = Origin::resolve("https://host/base/", "/base/").unwrap();
        let plain = Origin::resolve("http://host/base/", "/base/").unwrap();

        assert_eq!(
            secure.make_url(UrlKind::Ws, "/mediainfo/ws"),
            "wss://host/base/mediainfo/ws"
        );
        assert_eq!(
            plain.make_url(UrlKind::Ws, "/mediainfo/ws"),
            "ws://host/base/mediainfo/ws"
        );
        assert_eq!(secure.make_url(UrlKind::Http, "stream"), "https://host/base/stream");
        assert_eq!(plain.make_url(UrlKind::Http, "stream"), "http://host/base/stream");
    }

    #[test]
    fn leading_slash_on_path_is_optional() {
        let origin = Origin::resolve("http://host/", "/").unwrap();
        assert_eq!(
            origin.make_url(UrlKind::Http, "/x"),
            origin.make_url(UrlKind::Http, "x")
        );
        assert_eq!(origin.make_url(UrlKind::Http, "/x"), "http://host/x");
    }

    #[test]
    fn base_path_is_normalized() {
        for base in ["radio", "/radio", "/radio/", "radio//", "/radio///"] {
            let origin = Origin::resolve("http://host/page.html", base).unwrap();
            assert_eq!(origin.base_path(), "/radio/", "base {base:?}");
            assert_eq!(origin.mediainfo_url(), "http://host/radio/mediainfo");
        }
        let root = Origin::resolve("http://host/deep/page", "").unwrap();
        assert_eq!(root.base_path(), "/");
    }

    #[test]
    fn keeps_port_and_ignores_query() {
        let origin = Origin::resolve("http://localhost:9005/?foo=bar#top", "/").unwrap();
        assert_eq!(origin.authority(), "localhost:9005");
        assert_eq!(origin.notifications_url(), "ws://localhost:9005/mediainfo/ws");
    }

    #[test]
    fn album_art_url_encodes_filename() {
        let origin = Origin::resolve("https://radio.example/", "/").unwrap();
        assert_eq!(
            origin.album_art_url("AC/DC - T.N.T.mp3", 42),
            "https://radio.example/album_art?n=AC%2FDC%20-%20T.N.T.mp3&t=42"
        );
    }

    #[test]
    fn rejects_unusable_locations() {
        assert_eq!(
            Origin::resolve("file:///tmp/index.html", "/"),
            Err(OriginError::UnsupportedScheme("file".to_string()))
        );
        assert!(matches!(
            Origin::resolve("not a url", "/"),
            Err(OriginError::InvalidLocation(_))
        ));
    }
}
