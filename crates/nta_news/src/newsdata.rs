use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{error, info};
use url::Url;

use nta_core::{Article, NewsQuery, NewsSource, Result};

/// Client for the newsdata.io `news` endpoint.
pub struct NewsDataClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl NewsDataClient {
    pub fn new(api_key: String, base_url: Url) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    pub fn from_settings(settings: &nta_core::Settings) -> Self {
        Self::new(settings.news_api_key.clone(), settings.news_api_url.clone())
    }
}

impl fmt::Debug for NewsDataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsDataClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// Extracts the article list from a provider response body.
///
/// Returns the provider's message when the body is not a successful result page.
pub(crate) fn parse_response(body: &Value) -> std::result::Result<Vec<Article>, String> {
    let status = body.get("status").and_then(Value::as_str);
    let results = body.get("results");

    match (status, results) {
        (Some("success"), Some(Value::Array(items))) => Ok(items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value::<Article>(item.clone()).ok())
            .collect()),
        _ => Err(body
            .get("message")
            .or_else(|| results.and_then(|r| r.get("message")))
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string()),
    }
}

#[async_trait]
impl NewsSource for NewsDataClient {
    fn name(&self) -> &str {
        "newsdata.io"
    }

    async fn fetch(&self, query: &NewsQuery) -> Result<Vec<Article>> {
        let size = query.count.to_string();
        let params = [
            ("country", query.country.as_str()),
            ("category", query.category.as_str()),
            ("apiKey", self.api_key.as_str()),
            ("size", size.as_str()),
        ];

        let response = match self.client.get(self.base_url.clone()).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("❌ Request error: {}", e);
                return Ok(Vec::new());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ News provider returned {}: {}", status, body);
            return Ok(Vec::new());
        }

        let body = match response.json::<Value>().await {
            Ok(body) => body,
            Err(e) => {
                error!("❌ Could not decode news response: {}", e);
                return Ok(Vec::new());
            }
        };

        match parse_response(&body) {
            Ok(articles) => {
                info!("📰 Fetched {} {} articles from {}", articles.len(), query.category, self.name());
                Ok(articles)
            }
            Err(message) => {
                error!("❌ Error fetching news: {}", message);
                Ok(Vec::new())
            }
        }
    }
}
