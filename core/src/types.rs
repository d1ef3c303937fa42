//! Domain DTOs for the alumni API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two crates. Post bodies are
//! typed per endpoint instead of free-form JSON so a malformed payload fails
//! at compile time or at decode time, never silently on the server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A hashtag a post can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hashtag {
    pub id: u64,
    pub tag: String,
}

impl Hashtag {
    pub fn new(id: u64, tag: impl Into<String>) -> Self {
        Self { id, tag: tag.into() }
    }
}

/// Success body of `GET /hashtags/trending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingHashtags {
    pub hashtags: Vec<Hashtag>,
}

/// Who can see a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    Public,
    Connections,
    Private,
}

/// Media type tag sent alongside an upload and stored on a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl AsRef<str> for MediaKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Other => "other",
        }
    }

    /// Anything other than `image` or `video` is `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "image" => MediaKind::Image,
            "video" => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }
}

/// A previously uploaded file attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub kind: MediaKind,
}

/// Request payload for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<Hashtag>,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
}

impl PostPayload {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            hashtags: Vec::new(),
            audience: Audience::default(),
            media: None,
        }
    }

    pub fn with_hashtags(mut self, hashtags: Vec<Hashtag>) -> Self {
        self.hashtags = hashtags;
        self
    }

    pub fn with_audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_media(mut self, media: MediaRef) -> Self {
        self.media = Some(media);
        self
    }
}

/// The post resource echoed back by `POST /posts`.
///
/// Backends differ in the echo's shape: numeric, UUID or ObjectId ids, and a
/// bare resource or one wrapped in `post`/`data`. The body is kept exactly as
/// received and read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Post(Value);

const POST_WRAPPER_KEYS: [&str; 2] = ["post", "data"];
const POST_MARKER_KEYS: [&str; 3] = ["id", "_id", "caption"];

impl Post {
    pub fn from_json(value: Value) -> Self {
        Self(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }

    /// The post object, looking through one `post` or `data` wrapper.
    pub fn resource(&self) -> &Value {
        if POST_MARKER_KEYS.iter().any(|k| self.0.get(k).is_some()) {
            return &self.0;
        }
        POST_WRAPPER_KEYS
            .iter()
            .find_map(|k| self.0.get(k).filter(|v| v.is_object()))
            .unwrap_or(&self.0)
    }

    /// `id` or `_id` as text; numeric ids are rendered in decimal.
    pub fn id(&self) -> Option<String> {
        let resource = self.resource();
        match resource.get("id").or_else(|| resource.get("_id"))? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        self.resource().get("caption")?.as_str()
    }

    /// The echoed fields as a payload, when they decode as one.
    pub fn payload(&self) -> Option<PostPayload> {
        PostPayload::deserialize(self.resource()).ok()
    }
}

/// Success body of `POST /media/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_url: String,
}

/// Structured error body a backend may attach to a failure status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Uniform outcome envelope for write operations.
///
/// A failure always has a non-empty `message` and never carries `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            crate::error::GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            success: false,
            message,
            data: None,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.message),
        }
    }
}
