pub mod catalog;
pub mod config;
pub mod fallback;
pub mod field;
pub mod googlebooks;
pub mod http;
pub mod merge;
pub mod neodb;
pub mod omdb;
pub mod openlibrary;
pub mod provider;
pub mod rawg;
pub mod steam;
pub mod tmdb;
pub mod transliterate;

use std::collections::BTreeMap;

use enjoyrecord_core::MediaType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::Catalog;
pub use config::{Endpoints, SearchConfig};
pub use fallback::basic_search;
pub use merge::merge_results;
pub use provider::{SearchMode, SearchOptions, SearchProvider, SearchRequest};
pub use transliterate::to_pinyin_query;

/// Error produced by a provider or by the fan-out.
///
/// Messages are user-facing and displayed without further wrapping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("缺少 {var}")]
    MissingApiKey { provider: Source, var: &'static str },
    #[error("{provider} 请求失败 (HTTP {status})")]
    UpstreamStatus { provider: Source, status: u16 },
    #[error("{provider} 请求超时，请稍后重试")]
    Timeout { provider: Source },
    #[error("{provider} 网络错误: {message}")]
    Network { provider: Source, message: String },
    #[error("{provider} 响应解析失败: {message}")]
    Parse { provider: Source, message: String },
    #[error("{provider} API Token 无效，请检查设置")]
    Unauthorized { provider: Source },
    #[error("不支持的搜索来源: {0}")]
    UnsupportedSource(String),
    /// Every lane of a fan-out failed; carries the first lane's error.
    #[error("{first}")]
    AllProvidersFailed { first: Box<SearchError>, failed: usize },
}

impl SearchError {
    pub fn parse(provider: Source, message: impl Into<String>) -> Self {
        Self::Parse {
            provider,
            message: message.into(),
        }
    }

    /// The error a caller should classify on, looking through a fan-out wrapper.
    pub fn representative(&self) -> &SearchError {
        match self {
            Self::AllProvidersFailed { first, .. } => first.representative(),
            other => other,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.representative(), Self::Timeout { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.representative(), Self::Unauthorized { .. })
    }
}

/// Identifier of the catalog an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    OpenLibrary,
    GoogleBooks,
    Tmdb,
    Omdb,
    Rawg,
    Steam,
    NeoDb,
    Manual,
}

impl Source {
    pub const ALL: [Source; 8] = [
        Self::OpenLibrary,
        Self::GoogleBooks,
        Self::Tmdb,
        Self::Omdb,
        Self::Rawg,
        Self::Steam,
        Self::NeoDb,
        Self::Manual,
    ];

    /// Stable identifier used in `sources`/`sourceIds` and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenLibrary => "openlibrary",
            Self::GoogleBooks => "googlebooks",
            Self::Tmdb => "tmdb",
            Self::Omdb => "omdb",
            Self::Rawg => "rawg",
            Self::Steam => "steam",
            Self::NeoDb => "neodb",
            Self::Manual => "manual",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::OpenLibrary => "Open Library",
            Self::GoogleBooks => "Google Books",
            Self::Tmdb => "TMDB",
            Self::Omdb => "OMDb",
            Self::Rawg => "RAWG",
            Self::Steam => "Steam",
            Self::NeoDb => "NeoDB",
            Self::Manual => "Manual",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Source {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|src| src.as_str() == s)
            .ok_or_else(|| SearchError::UnsupportedSource(s.to_string()))
    }
}

/// A normalized search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub sources: Vec<Source>,
    pub source_ids: BTreeMap<Source, String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl SearchItem {
    /// Item attributed to a single source; optional fields start empty.
    pub fn new(
        source: Source,
        source_id: impl Into<String>,
        media_type: MediaType,
        title: impl Into<String>,
    ) -> Self {
        Self {
            sources: vec![source],
            source_ids: BTreeMap::from([(source, source_id.into())]),
            media_type,
            title: title.into(),
            original_title: None,
            year: None,
            summary: None,
            cover_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_serializes_camel_case_and_omits_absent_fields() {
        let mut item = SearchItem::new(Source::Tmdb, "27205", MediaType::Film, "盗梦空间");
        item.year = Some(2010);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sources": ["tmdb"],
                "sourceIds": { "tmdb": "27205" },
                "type": "film",
                "title": "盗梦空间",
                "year": 2010
            })
        );
    }

    #[test]
    fn all_providers_failed_reports_first_message() {
        let first = SearchError::MissingApiKey {
            provider: Source::Tmdb,
            var: "TMDB_API_KEY",
        };
        let err = SearchError::AllProvidersFailed {
            first: Box::new(first.clone()),
            failed: 2,
        };
        assert_eq!(err.to_string(), first.to_string());
        assert_eq!(err.to_string(), "缺少 TMDB_API_KEY");
    }

    #[test]
    fn classification_looks_through_fan_out_wrapper() {
        let err = SearchError::AllProvidersFailed {
            first: Box::new(SearchError::Timeout {
                provider: Source::Rawg,
            }),
            failed: 2,
        };
        assert!(err.is_timeout());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn source_round_trips_through_identifier() {
        for src in Source::ALL {
            assert_eq!(src.as_str().parse::<Source>().unwrap(), src);
            assert_eq!(
                serde_json::to_value(src).unwrap(),
                serde_json::Value::String(src.as_str().to_string())
            );
        }
        assert!("bing".parse::<Source>().is_err());
    }
}
