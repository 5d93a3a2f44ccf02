//! Gallery loader state machine
//!
//! Every transition is synchronous. A fetch is split in two halves:
//! [`GalleryState::begin_fetch`] marks the state as loading and hands out a
//! [`FetchTicket`], and [`GalleryState::complete_fetch`] applies the result
//! carried back with that ticket. The network call happens in between,
//! outside of any lock.

use crate::error::{Error, Result};
use crate::types::{Image, ImageId, StarId};
use tracing::{info, warn};

/// Proof that a fetch was started, tagged with the session it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub star_id: StarId,
    pub page: u32,
    pub limit: u32,
    pub append: bool,
    /// Move the cursor to `page` when the fetch succeeds
    advance_cursor: bool,
    generation: u64,
}

/// What happened to a fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged into the sequence
    Applied {
        page: u32,
        received: usize,
        has_more: bool,
    },
    /// Nothing was requested (already loading, or no more pages)
    Skipped,
    /// The response belonged to an earlier session and was dropped
    Discarded,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }
}

/// Read-only copy of a gallery for presentation layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySnapshot {
    pub star_id: StarId,
    pub images: Vec<Image>,
    pub cursor: u32,
    pub has_more: bool,
    pub loading: bool,
    pub page_size: u32,
}

impl GallerySnapshot {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Ids in display order
    pub fn ids(&self) -> Vec<&ImageId> {
        self.images.iter().map(|image| &image.id).collect()
    }

    pub fn get(&self, id: &ImageId) -> Option<&Image> {
        self.images.iter().find(|image| &image.id == id)
    }
}

/// Incrementally loaded image sequence for one star
#[derive(Debug, Clone)]
pub struct GalleryState {
    star_id: StarId,
    images: Vec<Image>,
    cursor: u32,
    has_more: bool,
    loading: bool,
    page_size: u32,
    generation: u64,
}

impl GalleryState {
    /// Fresh state for a star
    ///
    /// A `page_size` of 0 is kept as given; every fetch is then refused by
    /// [`GalleryState::check_fetch`].
    pub fn new(star_id: StarId, page_size: u32) -> Self {
        Self {
            star_id,
            images: Vec::new(),
            cursor: 1,
            has_more: true,
            loading: false,
            page_size,
            generation: 0,
        }
    }

    pub fn star_id(&self) -> &StarId {
        &self.star_id
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Clear everything and start a new session
    ///
    /// Responses to fetches started before the reset are discarded.
    pub fn reset(&mut self) {
        self.images.clear();
        self.cursor = 1;
        self.has_more = true;
        self.loading = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Point the gallery at another star, starting a new session
    pub fn switch_star(&mut self, star_id: StarId) {
        self.star_id = star_id;
        self.reset();
    }

    /// Reject a fetch of `page` that the backend would never accept
    pub fn check_fetch(&self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(Error::validation("page numbers start at 1"));
        }
        if self.page_size == 0 {
            return Err(Error::validation("page size must be at least 1"));
        }
        Ok(())
    }

    /// Start fetching `page`; `None` while another fetch is outstanding
    ///
    /// `page` is passed through as given; see [`GalleryState::check_fetch`].
    pub fn begin_fetch(&mut self, page: u32, append: bool) -> Option<FetchTicket> {
        self.start(page, append, false)
    }

    /// Start fetching the page after the cursor
    ///
    /// `None` unless more pages are expected and nothing is loading.
    pub fn begin_more(&mut self) -> Option<FetchTicket> {
        if !self.has_more {
            return None;
        }
        let next = self.cursor.saturating_add(1);
        self.start(next, true, true)
    }

    fn start(&mut self, page: u32, append: bool, advance_cursor: bool) -> Option<FetchTicket> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(FetchTicket {
            star_id: self.star_id.clone(),
            page,
            limit: self.page_size,
            append,
            advance_cursor,
            generation: self.generation,
        })
    }

    /// Apply the result of a fetch started with `ticket`
    ///
    /// On failure the sequence, cursor and has-more flag are left as they
    /// were and the error is returned, so the same fetch can be retried.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Image>>,
    ) -> Result<FetchOutcome> {
        if ticket.generation != self.generation || ticket.star_id != self.star_id {
            warn!(
                "Discarding stale page {} for star {} (session moved on)",
                ticket.page, ticket.star_id
            );
            return Ok(FetchOutcome::Discarded);
        }

        self.loading = false;
        let page = result?;

        let received = page.len();
        if ticket.append {
            self.images.extend(page);
        } else {
            self.images = page;
        }
        if ticket.advance_cursor {
            self.cursor = ticket.page;
        }
        self.has_more = received >= ticket.limit as usize;

        if !self.has_more {
            info!(
                "Gallery for star {} exhausted at page {} ({} images)",
                self.star_id,
                ticket.page,
                self.images.len()
            );
        }

        Ok(FetchOutcome::Applied {
            page: ticket.page,
            received,
            has_more: self.has_more,
        })
    }

    /// Drop the first image with `id`; cursor and has-more stay as they are
    pub fn remove_by_id(&mut self, id: &ImageId) -> bool {
        match self.images.iter().position(|image| &image.id == id) {
            Some(index) => {
                self.images.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            star_id: self.star_id.clone(),
            images: self.images.clone(),
            cursor: self.cursor,
            has_more: self.has_more,
            loading: self.loading,
            page_size: self.page_size,
        }
    }
}
