use enjoyrecord_core::MediaType;

use crate::{SearchError, SearchItem, Source};

/// Upper bound on items any single adapter returns.
pub const MAX_ITEMS_PER_PROVIDER: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Standard,
    /// Trending titles regardless of query. Only RAWG honors it.
    Popular,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(Self::Popular),
            "standard" => Ok(Self::Standard),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub mode: SearchMode,
}

/// One adapter invocation.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub media_type: MediaType,
    pub query: String,
    pub mode: SearchMode,
}

impl SearchRequest {
    pub fn new(media_type: MediaType, query: impl Into<String>) -> Self {
        Self {
            media_type,
            query: query.into(),
            mode: SearchMode::Standard,
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A catalog that can be searched for media items.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    fn source(&self) -> Source;

    /// Search the catalog. Zero hits is `Ok(vec![])`, never an error.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, SearchError>;
}
