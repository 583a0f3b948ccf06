//! Type-scoped fan-out across provider adapters.
//!
//! Each media type maps to a fixed, ordered list of lanes. All lanes run
//! concurrently and settle independently; their items are concatenated in
//! lane order (not completion order) before merging, so identical upstream
//! responses always produce identical output.

use std::collections::HashMap;
use std::sync::Arc;

use enjoyrecord_core::MediaType;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::googlebooks::GoogleBooksClient;
use crate::http::ProviderHttp;
use crate::merge::merge_results;
use crate::neodb::NeoDbClient;
use crate::omdb::OmdbClient;
use crate::openlibrary::OpenLibraryClient;
use crate::provider::{SearchMode, SearchOptions, SearchProvider, SearchRequest};
use crate::rawg::RawgClient;
use crate::steam::SteamClient;
use crate::tmdb::TmdbClient;
use crate::{SearchError, SearchItem, Source};

/// A constructed adapter, or the reason it could not be constructed.
pub type ProviderSlot = Result<Arc<dyn SearchProvider>, SearchError>;

fn slot<P: SearchProvider + 'static>(built: Result<P, SearchError>) -> ProviderSlot {
    built.map(|p| Arc::new(p) as Arc<dyn SearchProvider>)
}

/// Adapters queried for a media type, in merge order.
pub fn lanes(media_type: MediaType, mode: SearchMode) -> &'static [Source] {
    match (media_type, mode) {
        (MediaType::Book, _) => &[Source::OpenLibrary],
        (MediaType::Film | MediaType::Series, _) => &[Source::Tmdb, Source::Omdb],
        (MediaType::Game, SearchMode::Popular) => &[Source::Rawg],
        (MediaType::Game, SearchMode::Standard) => &[Source::Rawg, Source::Steam],
    }
}

pub struct Catalog {
    providers: HashMap<Source, ProviderSlot>,
    neodb: NeoDbClient,
}

impl Catalog {
    pub fn new(config: &SearchConfig) -> Self {
        let http = ProviderHttp::new(reqwest::Client::new(), config.search_timeout);
        let bulk = http.with_timeout(config.bulk_timeout);
        let ep = &config.endpoints;

        let slots = [
            (
                Source::OpenLibrary,
                slot(Ok(OpenLibraryClient::new(http.clone(), &ep.openlibrary))),
            ),
            (
                Source::GoogleBooks,
                slot(Ok(GoogleBooksClient::new(http.clone(), &ep.googlebooks))),
            ),
            (
                Source::Tmdb,
                slot(TmdbClient::new(http.clone(), &ep.tmdb, config.tmdb_api_key.clone())),
            ),
            (
                Source::Omdb,
                slot(OmdbClient::new(http.clone(), &ep.omdb, config.omdb_api_key.clone())),
            ),
            (
                Source::Rawg,
                slot(RawgClient::new(http.clone(), &ep.rawg, config.rawg_api_key.clone())),
            ),
            (
                Source::Steam,
                slot(Ok(SteamClient::new(http.clone(), &ep.steam))),
            ),
        ];

        for (source, built) in &slots {
            if let Err(e) = built {
                warn!(provider = source.as_str(), error = %e, "provider unavailable");
            }
        }

        Self {
            providers: slots.into_iter().collect(),
            neodb: NeoDbClient::new(http, bulk, &ep.neodb),
        }
    }

    /// Replace the adapter serving `provider.source()`.
    pub fn with_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.providers.insert(provider.source(), Ok(provider));
        self
    }

    /// Mark a source as unavailable; every call to it fails with `error`.
    pub fn with_unavailable(mut self, source: Source, error: SearchError) -> Self {
        self.providers.insert(source, Err(error));
        self
    }

    pub fn neodb(&self) -> &NeoDbClient {
        &self.neodb
    }

    async fn run(&self, source: Source, request: &SearchRequest) -> Result<Vec<SearchItem>, SearchError> {
        match self.providers.get(&source) {
            Some(Ok(provider)) => provider.search(request).await,
            Some(Err(e)) => Err(e.clone()),
            None => Err(SearchError::UnsupportedSource(source.as_str().to_string())),
        }
    }

    /// Search every catalog that covers `media_type` and merge the results.
    ///
    /// Books have a single lane whose error propagates unchanged. Other
    /// types fail only when every lane fails, with the first lane's error.
    pub async fn search_by_type(
        &self,
        media_type: MediaType,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchItem>, SearchError> {
        let request = SearchRequest::new(media_type, query).with_mode(options.mode);
        let lanes = lanes(media_type, options.mode);

        if media_type == MediaType::Book {
            let items = self.run(Source::OpenLibrary, &request).await?;
            return Ok(merge_results(items));
        }

        let settled = join_all(lanes.iter().map(|&source| self.run(source, &request))).await;

        let mut items = Vec::new();
        let mut errors = Vec::new();
        for (source, outcome) in lanes.iter().zip(settled) {
            match outcome {
                Ok(found) => {
                    debug!(provider = source.as_str(), count = found.len(), "provider returned results");
                    items.push(found);
                }
                Err(e) => {
                    warn!(provider = source.as_str(), error = %e, "provider search failed");
                    errors.push(e);
                }
            }
        }

        if items.is_empty() {
            let failed = errors.len();
            if let Some(first) = errors.into_iter().next() {
                return Err(SearchError::AllProvidersFailed {
                    first: Box::new(first),
                    failed,
                });
            }
        }

        Ok(merge_results(items.into_iter().flatten().collect()))
    }

    /// Query exactly one adapter, bypassing lane selection.
    pub async fn search_source(
        &self,
        source: Source,
        request: &SearchRequest,
    ) -> Result<Vec<SearchItem>, SearchError> {
        self.run(source, request).await.map(merge_results)
    }
}
