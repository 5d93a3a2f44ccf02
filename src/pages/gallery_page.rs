//! Star gallery page state

use crate::api::{validate_uploads, GalleryClient, ImagesClient, Rejection};
use crate::error::{Error, Result};
use crate::gallery::{FetchOutcome, GallerySession, GallerySnapshot};
use crate::types::{Image, ImageId, Star, StarId, UploadFile};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of an upload from the gallery page
#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    /// Records created by the backend, one per accepted file
    pub uploaded: Vec<Image>,
    /// Files left out by client-side validation
    pub rejected: Vec<Rejection>,
}

/// One star's gallery: header info, the loader, selection and notices
#[derive(Debug)]
pub struct GalleryPage {
    client: GalleryClient,
    star_id: StarId,
    star: Option<Star>,
    session: GallerySession<ImagesClient>,
    selected: Option<ImageId>,
    notice: Option<String>,
}

impl GalleryPage {
    pub fn new(client: GalleryClient, star_id: StarId, page_size: u32) -> Self {
        let session = GallerySession::new(
            Arc::new(client.images.clone()),
            star_id.clone(),
            page_size,
        );
        Self {
            client,
            star_id,
            star: None,
            session,
            selected: None,
            notice: None,
        }
    }

    pub fn star_id(&self) -> &StarId {
        &self.star_id
    }

    /// Star details, once loaded
    pub fn star(&self) -> Option<&Star> {
        self.star.as_ref()
    }

    /// The loader behind this page
    pub fn session(&self) -> &GallerySession<ImagesClient> {
        &self.session
    }

    pub async fn snapshot(&self) -> GallerySnapshot {
        self.session.snapshot().await
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Load the star details and the first page of images
    ///
    /// The two loads are independent; a failed star lookup does not stop
    /// the images from loading.
    pub async fn open(&mut self) -> Result<()> {
        self.notice = None;

        let star_result = self.client.stars.get_star(&self.star_id).await;
        let star_error = match star_result {
            Ok(star) => {
                self.star = Some(star);
                None
            }
            Err(e) => {
                self.record(&e);
                Some(e)
            }
        };

        let load_result = self.session.load_initial().await;
        self.note(load_result)?;

        match star_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Scroll proximity signal
    pub async fn load_more(&mut self) -> Result<FetchOutcome> {
        let result = self.session.request_more().await;
        self.note(result)
    }

    /// Validate and upload files, then reload the gallery from page 1
    ///
    /// New images are never spliced into the loaded sequence; the whole
    /// sequence is reloaded so pagination restarts from a known point.
    pub async fn upload(&mut self, files: Vec<UploadFile>) -> Result<UploadReport> {
        let batch = validate_uploads(files);
        for rejection in &batch.rejected {
            warn!("Skipping upload: {rejection}");
        }

        if batch.accepted.is_empty() {
            let message = batch
                .rejected
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            let err = if message.is_empty() {
                Error::validation("no files to upload")
            } else {
                Error::validation(message)
            };
            self.record(&err);
            return Err(err);
        }

        let result = self
            .client
            .images
            .upload_images(&self.star_id, batch.accepted)
            .await;
        let uploaded = self.note(result)?;

        if let Err(e) = self.session.load_initial().await {
            // The upload itself went through; only the refresh failed
            self.record(&e);
        } else if let Some(rejection) = batch.rejected.last() {
            self.notice = Some(rejection.to_string());
        }

        info!("Uploaded {} images to star {}", uploaded.len(), self.star_id);
        Ok(UploadReport {
            uploaded,
            rejected: batch.rejected,
        })
    }

    /// Delete an image and drop it from the loaded sequence
    pub async fn delete_image(&mut self, id: &ImageId) -> Result<()> {
        let result = self.client.images.delete_image(id).await;
        self.note(result)?;

        self.session.remove_by_id(id).await;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    /// Select a loaded image for the detail view
    ///
    /// Returns false (and keeps the old selection) if the id is not loaded.
    pub async fn select(&mut self, id: &ImageId) -> bool {
        if self.session.snapshot().await.get(id).is_some() {
            self.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&ImageId> {
        self.selected.as_ref()
    }

    /// The selected image, if it is still loaded
    pub async fn selected(&self) -> Option<Image> {
        let id = self.selected.as_ref()?;
        self.session.snapshot().await.get(id).cloned()
    }

    fn record(&mut self, error: &Error) {
        warn!("Gallery operation failed: {error}");
        self.notice = Some(error.user_message());
    }

    fn note<T>(&mut self, result: Result<T>) -> Result<T> {
        result.map_err(|e| {
            self.record(&e);
            e
        })
    }
}
