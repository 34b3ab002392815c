//! services/api/src/adapters/web_search.rs
//!
//! This module contains the adapter for the Google Custom Search JSON API.
//! It implements the `ReferenceSearchService` port from the `core` crate.

use async_trait::async_trait;
use lesson_planner_core::{
    domain::SearchHit,
    ports::{PortError, PortResult, ReferenceSearchService},
};
use serde::Deserialize;

const SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct Item {
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

impl From<Item> for SearchHit {
    fn from(item: Item) -> Self {
        SearchHit {
            url: item.link,
            title: item.title,
            snippet: item.snippet,
        }
    }
}

/// An adapter that implements `ReferenceSearchService` using Google Custom Search.
#[derive(Clone)]
pub struct GoogleSearchAdapter {
    http: reqwest::Client,
    api_key: Option<String>,
    engine_id: Option<String>,
}

impl GoogleSearchAdapter {
    pub fn new(http: reqwest::Client, api_key: Option<String>, engine_id: Option<String>) -> Self {
        Self {
            http,
            api_key,
            engine_id,
        }
    }
}

#[async_trait]
impl ReferenceSearchService for GoogleSearchAdapter {
    async fn search_web(&self, query: &str, count: u32) -> PortResult<Vec<SearchHit>> {
        let (Some(api_key), Some(engine_id)) = (self.api_key.as_deref(), self.engine_id.as_deref())
        else {
            return Err(PortError::NotConfigured(
                "GOOGLE_API_KEY and SEARCH_ENGINE_ID".to_string(),
            ));
        };

        let count = count.to_string();
        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("q", query),
                ("key", api_key),
                ("cx", engine_id),
                ("num", count.as_str()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PortError::Malformed(e.to_string()))?;

        Ok(body.items.into_iter().map(SearchHit::from).collect())
    }
}
