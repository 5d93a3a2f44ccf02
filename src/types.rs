//! Domain types shared across the crate
//!
//! Stars, images and the payloads exchanged with the backend.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque star identifier assigned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarId(String);

/// Opaque image identifier assigned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Wrap a raw id
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

impl_id!(StarId);
impl_id!(ImageId);

// ============================================================================
// Records
// ============================================================================

/// A named entity that owns a collection of images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub id: StarId,
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A stored photo belonging to exactly one star
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub star_id: StarId,
    /// External object-storage URL
    #[serde(rename = "s3_url")]
    pub url: String,
    pub filename: String,
    /// Size in bytes
    pub file_size: u64,
    pub mime_type: String,
    #[serde(with = "timestamp")]
    pub uploaded_at: DateTime<Utc>,
}

/// Body of `POST /api/stars` and `PUT /api/stars/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarPayload {
    pub name: String,
}

impl StarPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ============================================================================
// Uploads
// ============================================================================

/// One file of an upload batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub mime_type: String,
    pub content: Bytes,
}

impl UploadFile {
    /// Create an upload file from in-memory content
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Size of the content in bytes
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// MIME type for an image filename, judged by extension
pub fn mime_for_filename(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// Serde adapter for backend timestamps
///
/// The backend emits naive UTC timestamps (`2024-05-01T10:00:00.123456`);
/// RFC 3339 values with an offset are accepted too.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    /// Parse an RFC 3339 or naive UTC timestamp
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_star_from_backend_json() {
        let star: Star = serde_json::from_value(json!({
            "id": "65f1c0ffee",
            "name": "IU",
            "created_at": "2024-03-01T08:30:00.250000"
        }))
        .unwrap();

        assert_eq!(star.id, StarId::new("65f1c0ffee"));
        assert_eq!(star.name, "IU");
        assert_eq!(
            star.created_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
                + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_image_wire_field_names() {
        let image: Image = serde_json::from_value(json!({
            "id": "img1",
            "star_id": "star1",
            "s3_url": "https://cdn.example.com/star1/a.jpg",
            "filename": "a.jpg",
            "file_size": 2048,
            "mime_type": "image/jpeg",
            "uploaded_at": "2024-03-01T08:30:00Z"
        }))
        .unwrap();

        assert_eq!(image.url, "https://cdn.example.com/star1/a.jpg");
        assert_eq!(image.star_id.as_str(), "star1");
        assert_eq!(image.file_size, 2048);

        let back = serde_json::to_value(&image).unwrap();
        assert_eq!(back["s3_url"], "https://cdn.example.com/star1/a.jpg");
        assert_eq!(back["id"], "img1");
    }

    #[test_case("2024-03-01T08:30:00" ; "naive without fraction")]
    #[test_case("2024-03-01T08:30:00.000000" ; "naive with micros")]
    #[test_case("2024-03-01T08:30:00Z" ; "rfc3339 utc")]
    #[test_case("2024-03-01T10:30:00+02:00" ; "rfc3339 offset")]
    fn test_timestamp_parse(raw: &str) {
        assert_eq!(
            timestamp::parse(raw),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_timestamp_parse_rejects_garbage() {
        assert_eq!(timestamp::parse("yesterday"), None);
    }

    #[test_case("photo.JPG", Some("image/jpeg"))]
    #[test_case("photo.jpeg", Some("image/jpeg"))]
    #[test_case("a.b.png", Some("image/png"))]
    #[test_case("anim.gif", Some("image/gif"))]
    #[test_case("x.webp", Some("image/webp"))]
    #[test_case("notes.txt", None)]
    #[test_case("noext", None)]
    fn test_mime_for_filename(name: &str, expected: Option<&str>) {
        assert_eq!(mime_for_filename(name), expected);
    }
}
