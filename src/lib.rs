#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # Star Gallery
//!
//! Typed client for the Star Gallery REST API, plus the incremental
//! (infinite-scroll) loader used to browse a star's images.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use star_gallery::{ClientConfig, GalleryClient, GallerySession, StarId, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let client = GalleryClient::new(&config)?;
//!
//!     let stars = client.stars.list_stars(Some("iu")).await?;
//!
//!     let gallery = GallerySession::new(
//!         Arc::new(client.images.clone()),
//!         stars[0].id.clone(),
//!         config.page_size,
//!     );
//!     gallery.load_initial().await?;
//!     while gallery.snapshot().await.has_more {
//!         gallery.request_more().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Page state (pages, cli)                     │
//! │      StarDirectory            GalleryPage                    │
//! └──────────────────────────────────────────────────────────────┘
//!                │                       │
//!                │              ┌────────┴────────┐
//!                │              │  GallerySession │  cursor / has_more
//!                │              │  (gallery)      │  loading guard
//!                │              └────────┬────────┘
//!                │                       │ ImageSource
//! ┌──────────────┴───────────────────────┴───────────────────────┐
//! │          StarsClient            ImagesClient   (api)         │
//! ├──────────────────────────────────────────────────────────────┤
//! │          HttpClient: JSON / multipart, error mapping (http)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Domain types
pub mod types;

/// Client configuration
pub mod config;

/// HTTP client
pub mod http;

/// Resource clients
pub mod api;

/// Incremental gallery loader
pub mod gallery;

/// Page-level state
pub mod pages;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use api::{GalleryClient, ImageSource, ImagesClient, StarsClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use gallery::{FetchOutcome, GallerySession, GallerySnapshot, GalleryState};
pub use pages::{GalleryPage, StarDirectory, UploadReport};
pub use types::{Image, ImageId, Star, StarId, UploadFile};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
