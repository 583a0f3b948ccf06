//! NeoDB catalog client.
//!
//! Search works anonymously; a user's bearer token is forwarded when given.
//! API docs: https://neodb.social/developer/

use enjoyrecord_core::MediaType;
use reqwest::Url;
use serde_json::Value;
use tracing::{info, warn};

use crate::field::{first_id, first_text, first_year, text};
use crate::http::ProviderHttp;
use crate::provider::MAX_ITEMS_PER_PROVIDER;
use crate::{SearchError, SearchItem, Source};

pub struct NeoDbClient {
    http: ProviderHttp,
    detail_http: ProviderHttp,
    base_url: String,
}

/// NeoDB category / detail path segment for a media type.
pub fn category(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Book => "book",
        MediaType::Film => "movie",
        MediaType::Series => "tv",
        MediaType::Game => "game",
    }
}

fn media_type_for_category(category: &str) -> MediaType {
    match category {
        "movie" => MediaType::Film,
        "tv" => MediaType::Series,
        "game" => MediaType::Game,
        _ => MediaType::Book,
    }
}

fn bearer(token: Option<&str>) -> Option<&str> {
    token.map(str::trim).filter(|t| !t.is_empty())
}

impl NeoDbClient {
    /// `http` serves searches; `detail_http` serves item lookups, which get
    /// the longer bulk deadline.
    pub fn new(http: ProviderHttp, detail_http: ProviderHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            detail_http,
            base_url: base_url.into(),
        }
    }

    /// Search the catalog, optionally restricted to one category.
    pub async fn search(
        &self,
        media_type: Option<MediaType>,
        query: &str,
        token: Option<&str>,
    ) -> Result<Vec<SearchItem>, SearchError> {
        let mut params = vec![("query", query)];
        if let Some(t) = media_type {
            params.push(("category", category(t)));
        }
        let url = ProviderHttp::url(Source::NeoDb, &self.base_url, "/catalog/search", &params)?;
        let token = bearer(token);
        info!(query, media_type = ?media_type, has_token = token.is_some(), "neodb search");

        let data = self
            .http
            .get_json(Source::NeoDb, url, token)
            .await
            .map_err(unauthorized_on_401)?;
        let items = parse_search(&data, media_type);
        info!(query, result_count = items.len(), "neodb search results");
        Ok(items)
    }

    /// `{base}/{category}/{id}` with the id encoded as exactly one path segment.
    fn item_url(&self, media_type: MediaType, item_id: &str) -> Result<Url, SearchError> {
        let item_id = item_id.trim();
        if matches!(item_id, "" | "." | "..") {
            return Err(SearchError::parse(
                Source::NeoDb,
                format!("invalid catalog item id: {item_id:?}"),
            ));
        }
        let mut url = ProviderHttp::url(Source::NeoDb, &self.base_url, "", &[])?;
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| SearchError::parse(Source::NeoDb, "base URL cannot take a path"))?
            .pop_if_empty()
            .push(category(media_type))
            .push(item_id);
        Ok(url)
    }

    /// Fetch a single catalog entry. Failures are logged and yield `None`.
    pub async fn get_item(
        &self,
        item_id: &str,
        media_type: MediaType,
        token: Option<&str>,
    ) -> Option<SearchItem> {
        let result = async {
            let url = self.item_url(media_type, item_id)?;
            let data = self
                .detail_http
                .get_json(Source::NeoDb, url, bearer(token))
                .await
                .map_err(unauthorized_on_401)?;
            map_item(&data, media_type).ok_or_else(|| {
                SearchError::parse(Source::NeoDb, "catalog item has no title")
            })
        }
        .await;

        match result {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(item_id, media_type = %media_type, error = %e, "neodb get item failed");
                None
            }
        }
    }
}

fn unauthorized_on_401(e: SearchError) -> SearchError {
    match e {
        SearchError::UpstreamStatus {
            provider,
            status: 401,
        } => SearchError::Unauthorized { provider },
        other => other,
    }
}

pub(crate) fn parse_search(data: &Value, media_type: Option<MediaType>) -> Vec<SearchItem> {
    let Some(entries) = data["data"].as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .take(MAX_ITEMS_PER_PROVIDER)
        .filter_map(|entry| {
            let media_type = media_type.unwrap_or_else(|| {
                media_type_for_category(text(entry, "category").unwrap_or_default())
            });
            map_item(entry, media_type)
        })
        .collect()
}

fn map_item(entry: &Value, media_type: MediaType) -> Option<SearchItem> {
    let item_id = first_id(entry, &["uuid", "id"])?;
    let title = first_text(entry, &["title", "display_title"])?;
    let mut item = SearchItem::new(Source::NeoDb, item_id, media_type, title);
    item.original_title = first_text(entry, &["original_title", "orig_title"]);
    item.year = first_year(entry, &["year", "pub_year"]);
    item.summary = first_text(entry, &["brief", "description"]);
    item.cover_url = first_text(entry, &["cover_image_url"]);
    Some(item)
}
