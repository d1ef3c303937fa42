//! Stateless HTTP request builder and response parser for the alumni API.
//!
//! # Design
//! `AlumniClient` holds only configuration and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the round-trip.
//!
//! The three parsers encode the three outcome contracts:
//! - trending hashtags: `Result`, with the fallback applied by the caller;
//! - create post: always an `ApiResponse` envelope, never an error;
//! - upload media: the `fileUrl` on exactly HTTP 200, an error otherwise.

use crate::auth::AuthToken;
use crate::config::ClientConfig;
use crate::error::{ApiError, GENERIC_FAILURE_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::media::MediaFile;
use crate::multipart::MultipartForm;
use crate::types::{ApiResponse, ErrorBody, Hashtag, MediaKind, Post, PostPayload, TrendingHashtags, UploadResult};

pub const TRENDING_HASHTAGS_PATH: &str = "/hashtags/trending";
pub const POSTS_PATH: &str = "/posts";
pub const MEDIA_UPLOAD_PATH: &str = "/media/upload";

/// Synchronous, stateless client for the alumni API.
#[derive(Debug, Clone)]
pub struct AlumniClient {
    config: ClientConfig,
}

impl AlumniClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    pub fn build_fetch_trending_hashtags(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(TRENDING_HASHTAGS_PATH),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
            timeout: self.config.request_timeout,
        }
    }

    pub fn build_create_post(&self, payload: &PostPayload, token: &AuthToken) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.url(POSTS_PATH),
            headers: vec![
                ("authorization".to_string(), token.bearer()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
            timeout: self.config.request_timeout,
        })
    }

    /// `media_type` is sent verbatim as the `type` field; it also selects the
    /// MIME family (`image`, `video`, anything else).
    pub fn build_upload_media(&self, file: &MediaFile, media_type: impl AsRef<str>, token: &AuthToken) -> HttpRequest {
        self.build_upload_media_with_form(file, media_type, token, MultipartForm::new())
    }

    /// Same as [`build_upload_media`](Self::build_upload_media) with a
    /// caller-chosen form, so the encoded body is reproducible.
    pub fn build_upload_media_with_form(
        &self,
        file: &MediaFile,
        media_type: impl AsRef<str>,
        token: &AuthToken,
        form: MultipartForm,
    ) -> HttpRequest {
        let media_type = media_type.as_ref().trim();
        let kind = MediaKind::from_tag(media_type);
        let type_tag = if media_type.is_empty() { kind.as_str() } else { media_type };
        let mime = file.mime_type(kind);
        let content_type = form.content_type();
        let body = form
            .file("file", &file.file_name, mime.essence_str(), &file.bytes)
            .text("type", type_tag)
            .finish();
        HttpRequest {
            method: HttpMethod::Post,
            path: self.url(MEDIA_UPLOAD_PATH),
            headers: vec![
                ("authorization".to_string(), token.bearer()),
                ("content-type".to_string(), content_type),
            ],
            body: Some(body),
            timeout: self.config.upload_timeout,
        }
    }

    pub fn parse_fetch_trending_hashtags(&self, response: HttpResponse) -> Result<Vec<Hashtag>, ApiError> {
        check_success(&response)?;
        let trending: TrendingHashtags =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(trending.hashtags)
    }

    /// Any 2xx whose body is JSON is a success carrying that JSON; a non-JSON
    /// 2xx body or a failure status becomes a failure envelope.
    pub fn parse_create_post(&self, response: HttpResponse) -> ApiResponse<Post> {
        if let Err(e) = check_success(&response) {
            return ApiResponse::failure(e.user_message());
        }
        match serde_json::from_str::<serde_json::Value>(&response.body) {
            Ok(echo) => ApiResponse::ok(Post::from_json(echo)),
            Err(e) => {
                log::warn!("create post: undecodable success body: {e}");
                ApiResponse::failure(GENERIC_FAILURE_MESSAGE)
            }
        }
    }

    pub fn parse_upload_media(&self, response: HttpResponse) -> Result<String, ApiError> {
        if response.status != 200 {
            return Err(http_error(&response));
        }
        let result: UploadResult =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(result.file_url)
    }
}

/// Map non-2xx status codes to `ApiError::Http`.
fn check_success(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(http_error(response))
}

fn http_error(response: &HttpResponse) -> ApiError {
    ApiError::Http {
        status: response.status,
        message: error_message(&response.body),
    }
}

/// The `message` of a JSON error body, or the generic fallback.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}
