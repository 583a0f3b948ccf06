//! OMDb (Open Movie Database) title search.

use enjoyrecord_core::MediaType;
use serde_json::Value;

use crate::field::{first_text, first_year, https_url, id, text};
use crate::http::ProviderHttp;
use crate::provider::{MAX_ITEMS_PER_PROVIDER, SearchProvider, SearchRequest};
use crate::{SearchError, SearchItem, Source};

pub struct OmdbClient {
    api_key: String,
    http: ProviderHttp,
    base_url: String,
}

impl OmdbClient {
    /// Fails when no API key is configured.
    pub fn new(
        http: ProviderHttp,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, SearchError> {
        let api_key = api_key.ok_or(SearchError::MissingApiKey {
            provider: Source::Omdb,
            var: "OMDB_API_KEY",
        })?;
        Ok(Self {
            api_key,
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for OmdbClient {
    fn source(&self) -> Source {
        Source::Omdb
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, SearchError> {
        let kind = match request.media_type {
            MediaType::Film => "movie",
            MediaType::Series => "series",
            other => {
                return Err(SearchError::parse(
                    Source::Omdb,
                    format!("unsupported media type: {other}"),
                ));
            }
        };
        let url = ProviderHttp::url(
            Source::Omdb,
            &self.base_url,
            "/",
            &[
                ("apikey", self.api_key.as_str()),
                ("s", request.query.as_str()),
                ("type", kind),
            ],
        )?;
        let data = self.http.get_json(Source::Omdb, url, None).await?;
        Ok(parse_search(&data, request.media_type))
    }
}

/// OMDb reports "no match" as `{"Response": "False", "Error": "Movie not found!"}`.
pub(crate) fn parse_search(data: &Value, media_type: MediaType) -> Vec<SearchItem> {
    if data["Response"].as_str() == Some("False") {
        return Vec::new();
    }
    let Some(results) = data["Search"].as_array() else {
        return Vec::new();
    };

    results
        .iter()
        .take(MAX_ITEMS_PER_PROVIDER)
        .filter_map(|r| {
            let imdb_id = id(r, "imdbID")?;
            let title = first_text(r, &["Title"])?;
            let mut item = SearchItem::new(Source::Omdb, imdb_id, media_type, title);
            item.year = first_year(r, &["Year"]);
            item.cover_url = text(r, "Poster")
                .filter(|p| *p != "N/A")
                .map(https_url);
            Some(item)
        })
        .collect()
}
