//! Async gallery session
//!
//! Shares a [`GalleryState`] between tasks and drives fetches against an
//! [`ImageSource`]. The state lock is only held for transitions, never
//! across the network call, so the loading flag alone decides whether a
//! fetch may start.

use super::state::{FetchOutcome, FetchTicket, GallerySnapshot, GalleryState};
use crate::api::ImageSource;
use crate::error::Result;
use crate::types::{ImageId, StarId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Infinite-scroll loader for one star's images
pub struct GallerySession<S: ImageSource + ?Sized> {
    source: Arc<S>,
    state: Arc<RwLock<GalleryState>>,
}

impl<S: ImageSource + ?Sized> Clone for GallerySession<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: ImageSource + ?Sized> std::fmt::Debug for GallerySession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GallerySession").finish_non_exhaustive()
    }
}

impl<S: ImageSource + ?Sized> GallerySession<S> {
    /// Create a session for `star_id`; nothing is fetched yet
    pub fn new(source: Arc<S>, star_id: StarId, page_size: u32) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(GalleryState::new(star_id, page_size))),
        }
    }

    /// Clear the sequence and start a new session
    pub async fn reset(&self) {
        self.state.write().await.reset();
    }

    /// Point the session at another star; in-flight responses are dropped
    pub async fn switch_star(&self, star_id: StarId) {
        self.state.write().await.switch_star(star_id);
    }

    /// Reset, then load page 1 in place of whatever was there
    pub async fn load_initial(&self) -> Result<FetchOutcome> {
        let ticket = {
            let mut state = self.state.write().await;
            state.check_fetch(1)?;
            state.reset();
            state.begin_fetch(1, false)
        };
        let outcome = self.run(ticket).await?;
        if let FetchOutcome::Applied { received, .. } = outcome {
            let star_id = self.state.read().await.star_id().clone();
            info!("Loaded first page of star {} ({} images)", star_id, received);
        }
        Ok(outcome)
    }

    /// Fetch `page`, appending to or replacing the sequence
    ///
    /// Does nothing while another fetch is outstanding. Page 0 is a
    /// validation error and leaves the state untouched.
    pub async fn fetch_page(&self, page: u32, append: bool) -> Result<FetchOutcome> {
        let ticket = {
            let mut state = self.state.write().await;
            state.check_fetch(page)?;
            state.begin_fetch(page, append)
        };
        self.run(ticket).await
    }

    /// Proximity signal: load the next page if there is one and nothing is loading
    pub async fn request_more(&self) -> Result<FetchOutcome> {
        let ticket = {
            let mut state = self.state.write().await;
            state.check_fetch(state.cursor().saturating_add(1))?;
            state.begin_more()
        };
        self.run(ticket).await
    }

    /// Remove a deleted image locally without refetching
    pub async fn remove_by_id(&self, id: &ImageId) -> bool {
        self.state.write().await.remove_by_id(id)
    }

    pub async fn snapshot(&self) -> GallerySnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn star_id(&self) -> StarId {
        self.state.read().await.star_id().clone()
    }

    async fn run(&self, ticket: Option<FetchTicket>) -> Result<FetchOutcome> {
        let Some(ticket) = ticket else {
            debug!("Fetch skipped: already loading or no more pages");
            return Ok(FetchOutcome::Skipped);
        };

        let result = self
            .source
            .list_images(&ticket.star_id, ticket.page, ticket.limit)
            .await;
        self.state.write().await.complete_fetch(ticket, result)
    }
}
