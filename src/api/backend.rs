//! Backend origin and media locator normalization
//!
//! Every catalog and stream URL is built from one origin, resolved once at
//! startup and handed around by value.

/// Origin used when no page origin is known or it is a local file
pub const LOOPBACK_ORIGIN: &str = "http://127.0.0.1:8000";

/// Path root that streaming locators live under
pub const STREAM_ROOT: &str = "/hls";

/// Catalog document path, relative to the origin
pub const CATALOG_PATH: &str = "/hls/movies.json";

/// Resolved backend origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    origin: String,
}

impl Backend {
    /// Resolve the origin from an optional configured page origin
    ///
    /// `None`, an empty string or a `file:` origin fall back to the loopback
    /// address; anything else is used as-is minus trailing slashes.
    pub fn resolve(page_origin: Option<&str>) -> Self {
        let origin = match page_origin.map(str::trim) {
            None | Some("") => LOOPBACK_ORIGIN.to_string(),
            Some(o) if o.to_ascii_lowercase().starts_with("file:") => LOOPBACK_ORIGIN.to_string(),
            Some(o) => o.trim_end_matches('/').to_string(),
        };
        tracing::debug!(%origin, "resolved backend origin");
        Self { origin }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn catalog_url(&self) -> String {
        format!("{}{}", self.origin, CATALOG_PATH)
    }

    /// Turn a catalog locator into a playable URL
    ///
    /// Absolute `http…` locators pass through. Relative ones get a leading
    /// slash and the `/hls` root when missing, then the origin in front.
    pub fn media_url(&self, locator: &str) -> Option<String> {
        if locator.is_empty() {
            return None;
        }
        if locator.starts_with("http") {
            return Some(locator.to_string());
        }

        let mut path = if locator.starts_with('/') {
            locator.to_string()
        } else {
            format!("/{}", locator)
        };
        if !path.starts_with(STREAM_ROOT) {
            path = format!("{}{}", STREAM_ROOT, path);
        }
        Some(format!("{}{}", self.origin, path))
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::resolve(None)
    }
}
