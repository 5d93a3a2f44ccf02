//! Page-level state
//!
//! Glue between the resource clients, the gallery loader and whatever
//! renders them: the stars list and a single star's gallery. Failures are
//! returned to the caller and also kept as a dismissible notice.

mod directory;
mod gallery_page;

pub use directory::StarDirectory;
pub use gallery_page::{GalleryPage, UploadReport};
