//! Star resource client

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::{Star, StarId, StarPayload};
use tracing::debug;

/// Client for `/api/stars`
#[derive(Debug, Clone)]
pub struct StarsClient {
    http: HttpClient,
}

impl StarsClient {
    /// Create a stars client over a shared HTTP client
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List stars, optionally filtered by a search term
    ///
    /// An empty or whitespace-only term is treated as no filter. Matching
    /// semantics belong to the backend.
    pub async fn list_stars(&self, search: Option<&str>) -> Result<Vec<Star>> {
        let mut config = RequestConfig::new();
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            config = config.query("search", term);
        }

        let stars: Vec<Star> = self
            .http
            .get_json_with_config(self.http.endpoint(&["api", "stars"]), config)
            .await?;
        debug!("Loaded {} stars", stars.len());
        Ok(stars)
    }

    /// Fetch one star
    pub async fn get_star(&self, id: &StarId) -> Result<Star> {
        self.http
            .get_json(self.http.endpoint(&["api", "stars", id.as_str()]))
            .await
    }

    /// Create a star; the backend assigns the id
    pub async fn create_star(&self, name: &str) -> Result<Star> {
        let payload = star_payload(name)?;
        self.http
            .post_json(
                self.http.endpoint(&["api", "stars"]),
                serde_json::to_value(payload)?,
            )
            .await
    }

    /// Replace a star's name
    pub async fn update_star(&self, id: &StarId, name: &str) -> Result<Star> {
        let payload = star_payload(name)?;
        self.http
            .put_json(
                self.http.endpoint(&["api", "stars", id.as_str()]),
                serde_json::to_value(payload)?,
            )
            .await
    }

    /// Delete a star. The backend removes its images as well.
    pub async fn delete_star(&self, id: &StarId) -> Result<()> {
        self.http
            .delete(self.http.endpoint(&["api", "stars", id.as_str()]))
            .await
    }
}

fn star_payload(name: &str) -> Result<StarPayload> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("star name must not be empty"));
    }
    Ok(StarPayload::new(name))
}
