//! Steam store search (China region, Simplified Chinese names).

use enjoyrecord_core::MediaType;
use serde_json::Value;

use crate::field::{first_text, https_url, id, text};
use crate::http::ProviderHttp;
use crate::provider::{MAX_ITEMS_PER_PROVIDER, SearchProvider, SearchRequest};
use crate::{SearchError, SearchItem, Source};

const ATTRIBUTION: &str = "来源：Steam";

pub struct SteamClient {
    http: ProviderHttp,
    base_url: String,
}

impl SteamClient {
    pub fn new(http: ProviderHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for SteamClient {
    fn source(&self) -> Source {
        Source::Steam
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, SearchError> {
        let url = ProviderHttp::url(
            Source::Steam,
            &self.base_url,
            "/api/storesearch",
            &[
                ("term", request.query.as_str()),
                ("l", "schinese"),
                ("cc", "cn"),
            ],
        )?;
        let data = self.http.get_json(Source::Steam, url, None).await?;
        Ok(parse_store_search(&data))
    }
}

pub(crate) fn parse_store_search(data: &Value) -> Vec<SearchItem> {
    let Some(apps) = data["items"].as_array() else {
        return Vec::new();
    };

    apps.iter()
        .take(MAX_ITEMS_PER_PROVIDER)
        .filter_map(|app| {
            let app_id = id(app, "id")?;
            let title = first_text(app, &["name"])?;
            let mut item = SearchItem::new(Source::Steam, app_id, MediaType::Game, title);
            item.summary = Some(ATTRIBUTION.to_string());
            item.cover_url = text(app, "tiny_image").map(https_url);
            Some(item)
        })
        .collect()
}
