//! Shared HTTP plumbing for provider adapters.
//!
//! Every request is logged before it is sent and again when it settles.
//! URLs are redacted first, so API keys never reach the log.

use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{SearchError, Source};

/// Query parameters whose values are credentials.
const SECRET_PARAMS: &[&str] = &["api_key", "key", "apikey"];

/// Client handle plus the deadline applied to each request.
#[derive(Debug, Clone)]
pub struct ProviderHttp {
    client: reqwest::Client,
    timeout: Duration,
}

impl ProviderHttp {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Same client, different deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            client: self.client.clone(),
            timeout,
        }
    }

    /// Build `{base}{path}?params`, percent-encoding the parameters.
    pub fn url(
        provider: Source,
        base: &str,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, SearchError> {
        Url::parse_with_params(&format!("{base}{path}"), params).map_err(|e| {
            SearchError::Network {
                provider,
                message: format!("invalid URL: {e}"),
            }
        })
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// Non-2xx responses become [`SearchError::UpstreamStatus`]; the body is
    /// not read in that case.
    pub async fn get_json(
        &self,
        provider: Source,
        url: Url,
        bearer: Option<&str>,
    ) -> Result<Value, SearchError> {
        let safe_url = redact_url(&url);
        info!(provider = provider.as_str(), url = %safe_url, "provider request");

        let mut req = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| {
            let e = e.without_url();
            error!(
                provider = provider.as_str(),
                url = %safe_url,
                error = %e,
                timeout = e.is_timeout(),
                "provider fetch failed"
            );
            transport_error(provider, &e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(
                provider = provider.as_str(),
                url = %safe_url,
                status = status.as_u16(),
                "provider response"
            );
            return Err(SearchError::UpstreamStatus {
                provider,
                status: status.as_u16(),
            });
        }
        info!(
            provider = provider.as_str(),
            url = %safe_url,
            status = status.as_u16(),
            "provider response"
        );

        resp.json::<Value>().await.map_err(|e| {
            let e = e.without_url();
            error!(provider = provider.as_str(), url = %safe_url, error = %e, "provider body unreadable");
            if e.is_timeout() {
                SearchError::Timeout { provider }
            } else {
                SearchError::parse(provider, e.to_string())
            }
        })
    }
}

/// `e` must already be stripped of its URL; reqwest's `Display` prints the
/// full query string, credentials included.
fn transport_error(provider: Source, e: &reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout { provider }
    } else {
        SearchError::Network {
            provider,
            message: e.to_string(),
        }
    }
}

/// Render `url` with credential query parameters replaced by `REDACTED`.
pub fn redact_url(url: &Url) -> String {
    let is_secret = |k: &str| SECRET_PARAMS.contains(&k);
    if !url.query_pairs().any(|(k, _)| is_secret(&k)) {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_secret(&k) {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut safe = url.clone();
    safe.query_pairs_mut().clear().extend_pairs(pairs);
    safe.to_string()
}

/// String form of [`redact_url`]; unparseable input is returned as is.
pub fn redact_url_str(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => redact_url(&url),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_every_credential_param() {
        let tmdb = redact_url_str(
            "https://api.themoviedb.org/3/search/movie?query=dune&language=zh-CN&api_key=s3cret",
        );
        assert!(!tmdb.contains("s3cret"));
        assert!(tmdb.contains("api_key=REDACTED"));
        assert!(tmdb.contains("query=dune"));

        let rawg = redact_url_str("https://api.rawg.io/api/games?search=zelda&key=abc");
        assert!(rawg.ends_with("key=REDACTED"));

        let omdb = redact_url_str("https://www.omdbapi.com/?apikey=xyz&s=alien&type=movie");
        assert!(!omdb.contains("xyz"));
    }

    #[test]
    fn leaves_urls_without_credentials_untouched() {
        let url = "https://openlibrary.org/search.json?q=san+ti";
        assert_eq!(redact_url_str(url), url);
        assert_eq!(redact_url_str("not a url"), "not a url");
    }

    #[test]
    fn url_builder_encodes_parameters() {
        let url = ProviderHttp::url(
            Source::Steam,
            "https://store.steampowered.com",
            "/api/storesearch",
            &[("term", "艾尔登法环 & co"), ("cc", "cn")],
        )
        .unwrap();
        assert_eq!(url.path(), "/api/storesearch");
        let term = url
            .query_pairs()
            .find(|(k, _)| k == "term")
            .map(|(_, v)| v.into_owned());
        assert_eq!(term.as_deref(), Some("艾尔登法环 & co"));
    }

    #[tokio::test]
    async fn transport_errors_carry_no_credentials() {
        let http = ProviderHttp::new(reqwest::Client::new(), Duration::from_secs(2));
        let url = ProviderHttp::url(
            Source::Tmdb,
            "http://127.0.0.1:9",
            "/3/search/movie",
            &[("query", "dune"), ("api_key", "SUPERSECRET")],
        )
        .unwrap();

        let err = http.get_json(Source::Tmdb, url, None).await.unwrap_err();
        assert!(matches!(err, SearchError::Network { .. }), "{err:?}");
        assert!(!err.to_string().contains("SUPERSECRET"), "{err}");
        assert!(!format!("{err:?}").contains("SUPERSECRET"));
    }
}
