//! Google Books volume search, restricted to Chinese-language editions.

use enjoyrecord_core::MediaType;
use serde_json::Value;

use crate::field::{first_text, first_year, https_url, id, joined, text};
use crate::http::ProviderHttp;
use crate::provider::{MAX_ITEMS_PER_PROVIDER, SearchProvider, SearchRequest};
use crate::{SearchError, SearchItem, Source};

pub struct GoogleBooksClient {
    http: ProviderHttp,
    base_url: String,
}

impl GoogleBooksClient {
    pub fn new(http: ProviderHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for GoogleBooksClient {
    fn source(&self) -> Source {
        Source::GoogleBooks
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, SearchError> {
        let max = MAX_ITEMS_PER_PROVIDER.to_string();
        let url = ProviderHttp::url(
            Source::GoogleBooks,
            &self.base_url,
            "/books/v1/volumes",
            &[
                ("q", request.query.as_str()),
                ("maxResults", max.as_str()),
                ("langRestrict", "zh"),
            ],
        )?;
        let data = self.http.get_json(Source::GoogleBooks, url, None).await?;
        Ok(parse_volumes(&data))
    }
}

/// `items` is omitted entirely when nothing matches.
pub(crate) fn parse_volumes(data: &Value) -> Vec<SearchItem> {
    let Some(volumes) = data["items"].as_array() else {
        return Vec::new();
    };

    volumes
        .iter()
        .take(MAX_ITEMS_PER_PROVIDER)
        .filter_map(|vol| {
            let volume_id = id(vol, "id")?;
            let title = first_text(vol, &["/volumeInfo/title"])?;
            let mut item = SearchItem::new(Source::GoogleBooks, volume_id, MediaType::Book, title);
            item.original_title = first_text(vol, &["/volumeInfo/subtitle"]);
            item.year = first_year(vol, &["/volumeInfo/publishedDate"]);
            item.summary = first_text(vol, &["/volumeInfo/description"]).or_else(|| {
                joined(&vol["volumeInfo"], "authors", None).map(|a| format!("作者：{a}"))
            });
            item.cover_url = text(vol, "/volumeInfo/imageLinks/thumbnail").map(https_url);
            Some(item)
        })
        .collect()
}
