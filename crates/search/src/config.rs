//! Provider configuration.
//!
//! API keys and base URLs are read once into [`SearchConfig`] and handed to
//! adapter constructors; no adapter reads the environment itself.

use std::time::Duration;

pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BULK_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URLs of the upstream services, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub openlibrary: String,
    pub googlebooks: String,
    pub tmdb: String,
    pub omdb: String,
    pub rawg: String,
    pub steam: String,
    pub neodb: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openlibrary: "https://openlibrary.org".into(),
            googlebooks: "https://www.googleapis.com".into(),
            tmdb: "https://api.themoviedb.org".into(),
            omdb: "https://www.omdbapi.com".into(),
            rawg: "https://api.rawg.io".into(),
            steam: "https://store.steampowered.com".into(),
            neodb: "https://neodb.social/api".into(),
        }
    }
}

impl Endpoints {
    /// Every endpoint pointed at the same base, for local stubs.
    pub fn all(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            openlibrary: base.clone(),
            googlebooks: base.clone(),
            tmdb: base.clone(),
            omdb: base.clone(),
            rawg: base.clone(),
            steam: base.clone(),
            neodb: base,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub tmdb_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub rawg_api_key: Option<String>,
    /// Per-request deadline for interactive search calls.
    pub search_timeout: Duration,
    /// Per-request deadline for slower detail/import-style calls.
    pub bulk_timeout: Duration,
    pub endpoints: Endpoints,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            omdb_api_key: None,
            rawg_api_key: None,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            bulk_timeout: DEFAULT_BULK_TIMEOUT,
            endpoints: Endpoints::default(),
        }
    }
}

impl SearchConfig {
    /// Read keys and timeouts from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let secs = |name: &str, default: Duration| {
            non_blank(name)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            tmdb_api_key: non_blank("TMDB_API_KEY"),
            omdb_api_key: non_blank("OMDB_API_KEY"),
            rawg_api_key: non_blank("RAWG_API_KEY"),
            search_timeout: secs("ENJOYRECORD_SEARCH_TIMEOUT_SECS", DEFAULT_SEARCH_TIMEOUT),
            bulk_timeout: secs("ENJOYRECORD_BULK_TIMEOUT_SECS", DEFAULT_BULK_TIMEOUT),
            endpoints: Endpoints::default(),
        }
    }
}
