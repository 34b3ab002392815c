//! services/api/src/adapters/unsplash.rs
//!
//! This module contains the adapter for the Unsplash photo search API.
//! It implements the `ImageSearchService` port from the `core` crate.

use async_trait::async_trait;
use lesson_planner_core::{
    domain::MediaCandidate,
    ports::{ImageOrientation, ImageSearchService, PortError, PortResult},
};
use serde::Deserialize;

const SEARCH_URL: &str = "https://api.unsplash.com/search/photos";

//=========================================================================================
// Wire Format
//=========================================================================================

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
    user: Photographer,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Deserialize)]
struct Photographer {
    name: String,
    links: PhotographerLinks,
}

#[derive(Deserialize)]
struct PhotographerLinks {
    html: String,
}

impl Photo {
    fn into_candidate(self) -> MediaCandidate {
        MediaCandidate {
            url: self.urls.regular,
            credit: self.user.name,
            profile: self.user.links.html,
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ImageSearchService` using Unsplash.
#[derive(Clone)]
pub struct UnsplashAdapter {
    http: reqwest::Client,
    access_key: Option<String>,
}

impl UnsplashAdapter {
    /// Creates a new `UnsplashAdapter`. Without an access key every search
    /// fails with `NotConfigured`.
    pub fn new(http: reqwest::Client, access_key: Option<String>) -> Self {
        Self { http, access_key }
    }
}

#[async_trait]
impl ImageSearchService for UnsplashAdapter {
    async fn search_images(
        &self,
        query: &str,
        per_page: u32,
        orientation: ImageOrientation,
    ) -> PortResult<Vec<MediaCandidate>> {
        let access_key = self
            .access_key
            .as_deref()
            .ok_or_else(|| PortError::NotConfigured("UNSPLASH_ACCESS_KEY".to_string()))?;

        let per_page = per_page.to_string();
        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", orientation.as_str()),
                ("client_id", access_key),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PortError::Malformed(e.to_string()))?;

        Ok(body.results.into_iter().map(Photo::into_candidate).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_maps_to_candidates() {
        let body = r#"{
            "total": 2,
            "results": [
                {"id": "a", "urls": {"regular": "https://images.unsplash.com/a", "small": "s"},
                 "user": {"name": "Ada", "links": {"html": "https://unsplash.com/@ada"}}},
                {"id": "b", "urls": {"regular": "https://images.unsplash.com/b"},
                 "user": {"name": "Bo", "links": {"html": "https://unsplash.com/@bo"}}}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let candidates: Vec<MediaCandidate> =
            parsed.results.into_iter().map(Photo::into_candidate).collect();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].url, "https://images.unsplash.com/b");
        assert_eq!(candidates[1].credit, "Bo");
        assert_eq!(candidates[0].profile, "https://unsplash.com/@ada");
    }

    #[tokio::test]
    async fn missing_access_key_is_not_configured() {
        let adapter = UnsplashAdapter::new(reqwest::Client::new(), None);
        let err = adapter
            .search_images("cells", 30, ImageOrientation::Landscape)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotConfigured(_)));
    }
}
