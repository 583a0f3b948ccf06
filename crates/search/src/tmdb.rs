//! TMDB (The Movie Database) provider client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use enjoyrecord_core::MediaType;
use serde_json::Value;

use crate::field::{first_text, first_year, id, text};
use crate::http::ProviderHttp;
use crate::provider::{MAX_ITEMS_PER_PROVIDER, SearchProvider, SearchRequest};
use crate::{SearchError, SearchItem, Source};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub struct TmdbClient {
    api_key: String,
    http: ProviderHttp,
    base_url: String,
}

/// TMDB search endpoint flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TmdbKind {
    Movie,
    Tv,
}

impl TmdbKind {
    fn for_media(media_type: MediaType) -> Option<Self> {
        match media_type {
            MediaType::Film => Some(Self::Movie),
            MediaType::Series => Some(Self::Tv),
            MediaType::Book | MediaType::Game => None,
        }
    }

    fn path(self) -> &'static str {
        match self {
            Self::Movie => "/3/search/movie",
            Self::Tv => "/3/search/tv",
        }
    }
}

impl TmdbClient {
    /// Fails when no API key is configured.
    pub fn new(
        http: ProviderHttp,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, SearchError> {
        let api_key = api_key.ok_or(SearchError::MissingApiKey {
            provider: Source::Tmdb,
            var: "TMDB_API_KEY",
        })?;
        Ok(Self {
            api_key,
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for TmdbClient {
    fn source(&self) -> Source {
        Source::Tmdb
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, SearchError> {
        let kind = TmdbKind::for_media(request.media_type).ok_or_else(|| {
            SearchError::parse(
                Source::Tmdb,
                format!("unsupported media type: {}", request.media_type),
            )
        })?;
        let url = ProviderHttp::url(
            Source::Tmdb,
            &self.base_url,
            kind.path(),
            &[
                ("query", request.query.as_str()),
                ("language", "zh-CN"),
                ("api_key", self.api_key.as_str()),
            ],
        )?;
        let data = self.http.get_json(Source::Tmdb, url, None).await?;
        parse_search(&data, kind)
    }
}

pub(crate) fn parse_search(data: &Value, kind: TmdbKind) -> Result<Vec<SearchItem>, SearchError> {
    let results = data["results"]
        .as_array()
        .ok_or_else(|| SearchError::parse(Source::Tmdb, "missing `results` array"))?;

    let (media_type, date_key) = match kind {
        TmdbKind::Movie => (MediaType::Film, "release_date"),
        TmdbKind::Tv => (MediaType::Series, "first_air_date"),
    };

    Ok(results
        .iter()
        .take(MAX_ITEMS_PER_PROVIDER)
        .filter_map(|r| {
            let tmdb_id = id(r, "id")?;
            let title = first_text(r, &["title", "name"])?;
            let mut item = SearchItem::new(Source::Tmdb, tmdb_id, media_type, title);
            item.original_title = first_text(r, &["original_title", "original_name"]);
            item.year = first_year(r, &[date_key]);
            item.summary = first_text(r, &["overview"]);
            item.cover_url = text(r, "poster_path").map(|p| format!("{IMAGE_BASE}/w500{p}"));
            Some(item)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parse_movie_results_from_json() {
        let json = serde_json::json!({
            "page": 1,
            "results": [
                {
                    "id": 27205,
                    "title": "盗梦空间",
                    "original_title": "Inception",
                    "overview": "道姆·柯布与同事阿瑟和纳什在一次针对日本能源大亨齐藤的盗梦行动中失败……",
                    "release_date": "2010-07-15",
                    "poster_path": "/poster.jpg"
                },
                {
                    "id": 64956,
                    "title": "Inception: The Cobol Job",
                    "release_date": "",
                    "poster_path": null
                }
            ]
        });

        let items = parse_search(&json, TmdbKind::Movie).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].media_type, MediaType::Film);
        assert_eq!(items[0].source_ids[&Source::Tmdb], "27205");
        assert_eq!(items[0].original_title.as_deref(), Some("Inception"));
        assert_eq!(items[0].year, Some(2010));
        assert_eq!(
            items[0].cover_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert_eq!(items[1].year, None);
        assert_eq!(items[1].cover_url, None);
        assert_eq!(items[1].summary, None);
    }

    #[test]
    fn parse_tv_results_use_name_and_first_air_date() {
        let json = serde_json::json!({
            "results": [
                {
                    "id": 1396,
                    "name": "绝命毒师",
                    "original_name": "Breaking Bad",
                    "first_air_date": "2008-01-20",
                    "release_date": "1999-01-01"
                }
            ]
        });

        let items = parse_search(&json, TmdbKind::Tv).unwrap();
        assert_eq!(items[0].media_type, MediaType::Series);
        assert_eq!(items[0].title, "绝命毒师");
        assert_eq!(items[0].original_title.as_deref(), Some("Breaking Bad"));
        assert_eq!(items[0].year, Some(2008));
    }

    #[test]
    fn results_are_capped_at_three() {
        let results: Vec<_> = (1..=8)
            .map(|i| serde_json::json!({ "id": i, "title": format!("T{i}") }))
            .collect();
        let items = parse_search(&serde_json::json!({ "results": results }), TmdbKind::Movie).unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn missing_results_is_a_parse_error() {
        let err = parse_search(&serde_json::json!({ "status_code": 7 }), TmdbKind::Movie).unwrap_err();
        assert!(matches!(err, SearchError::Parse { provider: Source::Tmdb, .. }));
    }

    #[test]
    fn missing_key_fails_at_construction() {
        let http = ProviderHttp::new(reqwest::Client::new(), Duration::from_secs(1));
        let err = TmdbClient::new(http, "http://localhost", None).err().unwrap();
        assert_eq!(err.to_string(), "缺少 TMDB_API_KEY");
    }
}
