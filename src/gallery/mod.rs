//! Incremental gallery loader
//!
//! Loads a star's images page by page for infinite scrolling.
//!
//! # Overview
//!
//! The loader keeps an ordered sequence of images, a page cursor, a
//! has-more flag and a loading flag. A proximity signal (a scroll sentinel
//! coming into view) calls [`GallerySession::request_more`], which fetches
//! the next page and appends it. A page shorter than the page size marks
//! the gallery as exhausted.
//!
//! At most one page fetch is outstanding per session. Fetches are tagged
//! with the session they were started in, and responses that arrive after
//! a reset (or a switch to another star) are dropped.

mod session;
mod state;

pub use session::GallerySession;
pub use state::{FetchOutcome, FetchTicket, GallerySnapshot, GalleryState};
