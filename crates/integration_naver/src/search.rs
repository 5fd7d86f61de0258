//! Local and blog search client
//!
//! Both endpoints share the search credential pair and return items
//! verbatim; decoding fixed-point positions and stripping markup is left
//! to the caller.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::NaverConfig;
use crate::error::NaverError;
use crate::http::{self, CLIENT_ID_HEADER, CLIENT_SECRET_HEADER};
use crate::models::{BlogItem, BlogSearchResponse, LocalSearchItem, LocalSearchResponse};

const LOCAL_SEARCH_PATH: &str = "/v1/search/local.json";
const BLOG_SEARCH_PATH: &str = "/v1/search/blog.json";

/// Trait for place search clients
#[async_trait]
pub trait LocalSearchClient: Send + Sync {
    /// Search places by keyword
    async fn search_local(&self, query: &str) -> Result<Vec<LocalSearchItem>, NaverError>;
}

/// Trait for blog search clients
#[async_trait]
pub trait BlogSearchClient: Send + Sync {
    /// Search blog posts by keyword
    async fn search_blogs(&self, query: &str) -> Result<Vec<BlogItem>, NaverError>;
}

/// Naver search API client
#[derive(Debug)]
pub struct NaverSearchClient {
    client: Client,
    config: NaverConfig,
}

impl NaverSearchClient {
    /// Create a new search client
    ///
    /// # Errors
    ///
    /// Returns an error if the search credentials are missing or the HTTP
    /// client cannot be initialized.
    pub fn new(config: &NaverConfig) -> Result<Self, NaverError> {
        if !config.search.is_complete() {
            return Err(NaverError::ConfigurationError(
                "search client id and secret are required".to_string(),
            ));
        }

        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            config: config.clone(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
    ) -> Result<T, NaverError> {
        let url = format!("{}{path}", self.config.search_base_url);
        let display = self.config.display.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("display", display.as_str())])
            .header(CLIENT_ID_HEADER, &self.config.search.id)
            .header(CLIENT_SECRET_HEADER, self.config.search.secret.expose_secret())
            .send()
            .await
            .map_err(|e| http::send_error(&e, self.config.timeout_secs))?;

        http::read_json(response, self.config.timeout_secs).await
    }
}

#[async_trait]
impl LocalSearchClient for NaverSearchClient {
    #[instrument(skip(self))]
    async fn search_local(&self, query: &str) -> Result<Vec<LocalSearchItem>, NaverError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response: LocalSearchResponse = self.get(LOCAL_SEARCH_PATH, query).await?;
        debug!(count = response.items.len(), total = response.total, "Local search completed");
        Ok(response.items)
    }
}

#[async_trait]
impl BlogSearchClient for NaverSearchClient {
    #[instrument(skip(self))]
    async fn search_blogs(&self, query: &str) -> Result<Vec<BlogItem>, NaverError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response: BlogSearchResponse = self.get(BLOG_SEARCH_PATH, query).await?;
        debug!(count = response.items.len(), total = response.total, "Blog search completed");
        Ok(response.items)
    }
}
