//! Client-side checks applied to an upload batch before it is sent

use crate::types::UploadFile;
use std::fmt;

/// MIME types the backend accepts
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Per-file size limit (10 MiB)
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Why a file was left out of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedType { mime_type: String },
    TooLarge { size: u64 },
}

/// A file that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub filename: String,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            RejectReason::UnsupportedType { mime_type } => write!(
                f,
                "{} is not a supported image format ({mime_type})",
                self.filename
            ),
            RejectReason::TooLarge { size } => write!(
                f,
                "{} exceeds the 10MB size limit ({size} bytes)",
                self.filename
            ),
        }
    }
}

/// Result of validating a batch
#[derive(Debug, Clone, Default)]
pub struct ValidatedBatch {
    pub accepted: Vec<UploadFile>,
    pub rejected: Vec<Rejection>,
}

impl ValidatedBatch {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Split a batch into files that may be uploaded and those that may not
///
/// Order within each half follows the input order.
pub fn validate_uploads(files: Vec<UploadFile>) -> ValidatedBatch {
    let mut batch = ValidatedBatch::default();
    for file in files {
        match check_file(&file) {
            Some(reason) => batch.rejected.push(Rejection {
                filename: file.filename,
                reason,
            }),
            None => batch.accepted.push(file),
        }
    }
    batch
}

fn check_file(file: &UploadFile) -> Option<RejectReason> {
    let mime = file.mime_type.to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Some(RejectReason::UnsupportedType {
            mime_type: file.mime_type.clone(),
        });
    }
    if file.size() > MAX_FILE_SIZE {
        return Some(RejectReason::TooLarge { size: file.size() });
    }
    None
}
