//! RAWG video game database.
//!
//! Standard mode searches by title; popular mode lists the most-added games
//! and ignores the query. RAWG enforces the page size server-side.

use enjoyrecord_core::MediaType;
use serde_json::Value;

use crate::field::{first_text, first_year, https_url, id, joined, text};
use crate::http::ProviderHttp;
use crate::provider::{MAX_ITEMS_PER_PROVIDER, SearchMode, SearchProvider, SearchRequest};
use crate::{SearchError, SearchItem, Source};

pub struct RawgClient {
    api_key: String,
    http: ProviderHttp,
    base_url: String,
}

impl RawgClient {
    /// Fails when no API key is configured.
    pub fn new(
        http: ProviderHttp,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, SearchError> {
        let api_key = api_key.ok_or(SearchError::MissingApiKey {
            provider: Source::Rawg,
            var: "RAWG_API_KEY",
        })?;
        Ok(Self {
            api_key,
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for RawgClient {
    fn source(&self) -> Source {
        Source::Rawg
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, SearchError> {
        let page_size = MAX_ITEMS_PER_PROVIDER.to_string();
        let filter = match request.mode {
            SearchMode::Standard => ("search", request.query.as_str()),
            SearchMode::Popular => ("ordering", "-added"),
        };
        let url = ProviderHttp::url(
            Source::Rawg,
            &self.base_url,
            "/api/games",
            &[
                filter,
                ("page_size", page_size.as_str()),
                ("key", self.api_key.as_str()),
            ],
        )?;
        let data = self.http.get_json(Source::Rawg, url, None).await?;
        parse_games(&data)
    }
}

pub(crate) fn parse_games(data: &Value) -> Result<Vec<SearchItem>, SearchError> {
    let results = data["results"]
        .as_array()
        .ok_or_else(|| SearchError::parse(Source::Rawg, "missing `results` array"))?;

    Ok(results
        .iter()
        .filter_map(|g| {
            let game_id = id(g, "id")?;
            let title = first_text(g, &["name"])?;
            let mut item = SearchItem::new(Source::Rawg, game_id, MediaType::Game, title);
            item.year = first_year(g, &["released"]);
            item.summary = joined(g, "genres", Some("name"));
            item.cover_url = text(g, "background_image").map(https_url);
            Some(item)
        })
        .collect())
}
