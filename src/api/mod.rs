//! Resource clients for the Star Gallery REST API
//!
//! # Endpoints
//!
//! | Operation        | Request                                         |
//! |------------------|-------------------------------------------------|
//! | `list_stars`     | `GET /api/stars?search=`                        |
//! | `get_star`       | `GET /api/stars/{id}`                           |
//! | `create_star`    | `POST /api/stars`                               |
//! | `update_star`    | `PUT /api/stars/{id}`                           |
//! | `delete_star`    | `DELETE /api/stars/{id}`                        |
//! | `list_images`    | `GET /api/stars/{star_id}/images?page=&limit=`  |
//! | `get_image`      | `GET /api/stars/images/{id}`                    |
//! | `upload_images`  | `POST /api/stars/{star_id}/images/upload`       |
//! | `delete_image`   | `DELETE /api/stars/images/{id}`                 |

mod images;
mod stars;
mod upload;

pub use images::{ImagesClient, DEFAULT_LIMIT};
pub use stars::StarsClient;
pub use upload::{
    validate_uploads, RejectReason, Rejection, ValidatedBatch, ALLOWED_MIME_TYPES, MAX_FILE_SIZE,
};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::types::{Image, StarId};
use async_trait::async_trait;

/// Anything that can serve pages of a star's images
///
/// The gallery loader only depends on this trait, so it can run against the
/// live backend or an in-memory source.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch page `page` (1-indexed) of at most `limit` images
    async fn list_images(&self, star_id: &StarId, page: u32, limit: u32) -> Result<Vec<Image>>;
}

/// Both resource clients over one connection pool
#[derive(Debug, Clone)]
pub struct GalleryClient {
    pub stars: StarsClient,
    pub images: ImagesClient,
}

impl GalleryClient {
    /// Build both clients from the crate configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::from_http(HttpClient::from_client_config(config)?))
    }

    /// Build both clients over an existing HTTP client
    pub fn from_http(http: HttpClient) -> Self {
        Self {
            stars: StarsClient::new(http.clone()),
            images: ImagesClient::new(http),
        }
    }
}
