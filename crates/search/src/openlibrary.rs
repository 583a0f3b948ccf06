//! Open Library book search.
//!
//! Uses the public search API: https://openlibrary.org/dev/docs/api/search
//! The index is Latin-script, so Han queries are sent as pinyin.

use enjoyrecord_core::MediaType;
use serde_json::Value;

use crate::field::{first_text, first_year, joined, text};
use crate::http::ProviderHttp;
use crate::provider::{MAX_ITEMS_PER_PROVIDER, SearchProvider, SearchRequest};
use crate::transliterate::to_pinyin_query;
use crate::{SearchError, SearchItem, Source};

const COVER_BASE: &str = "https://covers.openlibrary.org/b/id";

pub struct OpenLibraryClient {
    http: ProviderHttp,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(http: ProviderHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for OpenLibraryClient {
    fn source(&self) -> Source {
        Source::OpenLibrary
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchItem>, SearchError> {
        let query = to_pinyin_query(&request.query);
        let url = ProviderHttp::url(
            Source::OpenLibrary,
            &self.base_url,
            "/search.json",
            &[("q", query.as_str())],
        )?;
        let data = self.http.get_json(Source::OpenLibrary, url, None).await?;
        parse_search(&data)
    }
}

pub(crate) fn parse_search(data: &Value) -> Result<Vec<SearchItem>, SearchError> {
    let docs = data["docs"]
        .as_array()
        .ok_or_else(|| SearchError::parse(Source::OpenLibrary, "missing `docs` array"))?;

    Ok(docs
        .iter()
        .take(MAX_ITEMS_PER_PROVIDER)
        .filter_map(|doc| {
            let id = text(doc, "key")?;
            let title = first_text(doc, &["title"])?;
            let mut item = SearchItem::new(Source::OpenLibrary, id, MediaType::Book, title);
            item.original_title = first_text(doc, &["subtitle"]);
            item.year = first_year(doc, &["first_publish_year"]);
            item.summary = joined(doc, "author_name", None).map(|a| format!("作者：{a}"));
            item.cover_url = doc["cover_i"]
                .as_i64()
                .filter(|id| *id > 0)
                .map(|id| format!("{COVER_BASE}/{id}-L.jpg"));
            Some(item)
        })
        .collect())
}
