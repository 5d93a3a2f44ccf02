//! Image resource client

use super::ImageSource;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::{Image, ImageId, StarId, UploadFile};
use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, info};

/// Page size used when a caller does not pick one
pub const DEFAULT_LIMIT: u32 = 20;

/// Multipart field every uploaded file is sent under
const UPLOAD_FIELD: &str = "files";

/// Client for the image endpoints under `/api/stars`
#[derive(Debug, Clone)]
pub struct ImagesClient {
    http: HttpClient,
}

impl ImagesClient {
    /// Create an images client over a shared HTTP client
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List one page of a star's images
    ///
    /// `page` is 1-indexed. At most `limit` records come back.
    pub async fn list_images(&self, star_id: &StarId, page: u32, limit: u32) -> Result<Vec<Image>> {
        if page == 0 {
            return Err(Error::validation("page numbers start at 1"));
        }
        if limit == 0 {
            return Err(Error::validation("limit must be at least 1"));
        }

        let config = RequestConfig::new().query("page", page).query("limit", limit);
        let images: Vec<Image> = self
            .http
            .get_json_with_config(
                self.http.endpoint(&["api", "stars", star_id.as_str(), "images"]),
                config,
            )
            .await?;
        debug!(
            "Star {} page {} (limit {}) returned {} images",
            star_id,
            page,
            limit,
            images.len()
        );
        Ok(images)
    }

    /// Fetch one image
    pub async fn get_image(&self, id: &ImageId) -> Result<Image> {
        self.http
            .get_json(self.http.endpoint(&["api", "stars", "images", id.as_str()]))
            .await
    }

    /// Upload a batch of files to a star
    ///
    /// One record comes back per accepted file. A non-2xx response fails the
    /// whole batch.
    pub async fn upload_images(&self, star_id: &StarId, files: Vec<UploadFile>) -> Result<Vec<Image>> {
        if files.is_empty() {
            return Err(Error::validation("no files to upload"));
        }

        let count = files.len();
        let config = RequestConfig::new().multipart(UPLOAD_FIELD, files);
        let images: Vec<Image> = self
            .http
            .request_json(
                Method::POST,
                self.http
                    .endpoint(&["api", "stars", star_id.as_str(), "images", "upload"]),
                config,
            )
            .await?;
        info!("Uploaded {}/{} images to star {}", images.len(), count, star_id);
        Ok(images)
    }

    /// Delete one image
    pub async fn delete_image(&self, id: &ImageId) -> Result<()> {
        self.http
            .delete(self.http.endpoint(&["api", "stars", "images", id.as_str()]))
            .await
    }
}

#[async_trait]
impl ImageSource for ImagesClient {
    async fn list_images(&self, star_id: &StarId, page: u32, limit: u32) -> Result<Vec<Image>> {
        ImagesClient::list_images(self, star_id, page, limit).await
    }
}
