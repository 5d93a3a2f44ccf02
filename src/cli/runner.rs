//! CLI runner - executes commands

use crate::api::{validate_uploads, GalleryClient};
use crate::cli::commands::{Cli, Commands, ImageCommands, OutputFormat, StarCommands};
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::gallery::{FetchOutcome, GallerySession};
use crate::types::{mime_for_filename, Image, ImageId, Star, StarId, UploadFile};
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = GalleryClient::new(&config)?;
        debug!("Using backend at {}", config.base_url);

        match &self.cli.command {
            Commands::Stars(command) => self.stars(&client, command).await,
            Commands::Images(command) => self.images(&client, command).await,
            Commands::Browse { star_id, pages, .. } => {
                self.browse(
                    &client,
                    StarId::new(star_id.as_str()),
                    *pages,
                    config.page_size,
                )
                .await
            }
        }
    }

    /// Resolve configuration: file, then environment, then command-line flags
    fn load_config(&self) -> Result<ClientConfig> {
        let base = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        let mut config = base.with_env_overrides()?;
        if let Some(url) = &self.cli.api_url {
            config.base_url = url.clone();
        }
        if let Commands::Browse {
            page_size: Some(page_size),
            ..
        } = &self.cli.command
        {
            config.page_size = *page_size;
        }
        config.validate()?;
        Ok(config)
    }

    async fn stars(&self, client: &GalleryClient, command: &StarCommands) -> Result<()> {
        match command {
            StarCommands::List { search } => {
                let stars = client.stars.list_stars(search.as_deref()).await?;
                self.emit_stars(&stars);
            }
            StarCommands::Get { id } => {
                let star = client.stars.get_star(&StarId::new(id.as_str())).await?;
                self.emit_stars(std::slice::from_ref(&star));
            }
            StarCommands::Create { name } => {
                let star = client.stars.create_star(name).await?;
                self.emit_stars(std::slice::from_ref(&star));
            }
            StarCommands::Update { id, name } => {
                let star = client
                    .stars
                    .update_star(&StarId::new(id.as_str()), name)
                    .await?;
                self.emit_stars(std::slice::from_ref(&star));
            }
            StarCommands::Delete { id } => {
                client.stars.delete_star(&StarId::new(id.as_str())).await?;
                self.emit_deleted("star", id);
            }
        }
        Ok(())
    }

    async fn images(&self, client: &GalleryClient, command: &ImageCommands) -> Result<()> {
        match command {
            ImageCommands::List {
                star_id,
                page,
                limit,
            } => {
                let images = client
                    .images
                    .list_images(&StarId::new(star_id.as_str()), *page, *limit)
                    .await?;
                self.emit_images(&images);
            }
            ImageCommands::Get { id } => {
                let image = client.images.get_image(&ImageId::new(id.as_str())).await?;
                self.emit_images(std::slice::from_ref(&image));
            }
            ImageCommands::Upload { star_id, files } => {
                let mut batch = Vec::with_capacity(files.len());
                for path in files {
                    batch.push(read_upload(path).await?);
                }

                let validated = validate_uploads(batch);
                for rejection in &validated.rejected {
                    warn!("Skipping {rejection}");
                }
                if validated.is_empty() {
                    return Err(Error::validation("none of the files can be uploaded"));
                }

                let images = client
                    .images
                    .upload_images(&StarId::new(star_id.as_str()), validated.accepted)
                    .await?;
                self.emit_images(&images);
            }
            ImageCommands::Delete { id } => {
                client
                    .images
                    .delete_image(&ImageId::new(id.as_str()))
                    .await?;
                self.emit_deleted("image", id);
            }
        }
        Ok(())
    }

    /// Load pages until the gallery is exhausted or `max_pages` is reached
    async fn browse(
        &self,
        client: &GalleryClient,
        star_id: StarId,
        max_pages: Option<u32>,
        page_size: u32,
    ) -> Result<()> {
        let session = GallerySession::new(Arc::new(client.images.clone()), star_id, page_size);

        let mut shown = 0;
        let mut pages = 0;
        let mut outcome = session.load_initial().await?;

        loop {
            if let FetchOutcome::Applied { page, .. } = outcome {
                pages += 1;
                let snapshot = session.snapshot().await;
                let fresh = &snapshot.images[shown..];
                shown = snapshot.len();
                self.emit_page(page, fresh, snapshot.has_more);
            }

            if max_pages.is_some_and(|max| pages >= max) {
                break;
            }
            outcome = session.request_more().await?;
            if outcome.is_skipped() {
                break;
            }
        }

        debug!("Browsed {pages} pages, {shown} images");
        Ok(())
    }

    fn emit_stars(&self, stars: &[Star]) {
        match self.cli.format {
            OutputFormat::Json => emit_json(&stars),
            OutputFormat::Pretty => {
                for star in stars {
                    println!("{}", render_star(star));
                }
            }
        }
    }

    fn emit_images(&self, images: &[Image]) {
        match self.cli.format {
            OutputFormat::Json => emit_json(&images),
            OutputFormat::Pretty => {
                for image in images {
                    println!("{}", render_image(image));
                }
            }
        }
    }

    fn emit_page(&self, page: u32, images: &[Image], has_more: bool) {
        match self.cli.format {
            OutputFormat::Json => emit_json(&json!({
                "page": page,
                "images": images,
                "has_more": has_more,
            })),
            OutputFormat::Pretty => {
                println!("-- page {page} ({} images) --", images.len());
                for image in images {
                    println!("{}", render_image(image));
                }
                if !has_more {
                    println!("-- end of gallery --");
                }
            }
        }
    }

    fn emit_deleted(&self, kind: &str, id: &str) {
        match self.cli.format {
            OutputFormat::Json => emit_json(&json!({ "deleted": kind, "id": id })),
            OutputFormat::Pretty => println!("Deleted {kind} {id}"),
        }
    }
}

fn emit_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!("Failed to serialize output: {e}"),
    }
}

/// One-line summary of a star
pub fn render_star(star: &Star) -> String {
    format!(
        "{}  {}  (created {})",
        star.id,
        star.name,
        star.created_at.format("%Y-%m-%d %H:%M")
    )
}

/// One-line summary of an image
pub fn render_image(image: &Image) -> String {
    format!(
        "{}  {}  {}  {}  {}",
        image.id,
        image.filename,
        human_size(image.file_size),
        image.uploaded_at.format("%Y-%m-%d %H:%M"),
        image.url
    )
}

/// Byte count in B / KB / MB
pub fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    if bytes >= MB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes}B")
    }
}

/// Read a file from disk into an upload part
async fn read_upload(path: &Path) -> Result<UploadFile> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| Error::validation(format!("{} is not a file", path.display())))?;
    let mime_type = mime_for_filename(&filename).unwrap_or("application/octet-stream");
    Ok(UploadFile::new(filename, mime_type, content))
}
