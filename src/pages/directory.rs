//! Stars list page state

use crate::api::StarsClient;
use crate::error::Result;
use crate::types::{Star, StarId};
use tracing::warn;

/// The list of stars with optimistic local updates
///
/// After a successful create, update or delete the local list is patched
/// instead of reloaded.
#[derive(Debug)]
pub struct StarDirectory {
    client: StarsClient,
    stars: Vec<Star>,
    search: Option<String>,
    notice: Option<String>,
}

impl StarDirectory {
    pub fn new(client: StarsClient) -> Self {
        Self {
            client,
            stars: Vec::new(),
            search: None,
            notice: None,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn find(&self, id: &StarId) -> Option<&Star> {
        self.stars.iter().find(|star| &star.id == id)
    }

    /// Current search term, if any
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Dismissible message from the last failed operation
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Reload the list with the current search term
    ///
    /// On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<()> {
        self.notice = None;
        let result = self.client.list_stars(self.search.as_deref()).await;
        let stars = self.note(result)?;
        self.stars = stars;
        Ok(())
    }

    /// Change the search term and reload. A blank term clears the filter.
    pub async fn search(&mut self, term: &str) -> Result<()> {
        let term = term.trim();
        self.search = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        self.load().await
    }

    /// Create a star and put it at the front of the list
    pub async fn create(&mut self, name: &str) -> Result<Star> {
        let result = self.client.create_star(name).await;
        let star = self.note(result)?;
        self.stars.insert(0, star.clone());
        Ok(star)
    }

    /// Rename a star and replace its entry in place
    pub async fn update(&mut self, id: &StarId, name: &str) -> Result<Star> {
        let result = self.client.update_star(id, name).await;
        let star = self.note(result)?;
        if let Some(slot) = self.stars.iter_mut().find(|s| &s.id == id) {
            *slot = star.clone();
        }
        Ok(star)
    }

    /// Delete a star and drop it from the list
    pub async fn delete(&mut self, id: &StarId) -> Result<()> {
        let result = self.client.delete_star(id).await;
        self.note(result)?;
        self.stars.retain(|star| &star.id != id);
        Ok(())
    }

    fn note<T>(&mut self, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            warn!("Star operation failed: {e}");
            self.notice = Some(e.user_message());
            e
        })
    }
}
