//! Backend boundary of the alumni network app.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `AlumniApi` layers a
//! `Transport`, a `CredentialProvider`, deadlines and cancellation on top and
//! applies the outcome contract of each endpoint:
//!
//! | Endpoint | On failure |
//! |---|---|
//! | `GET /hashtags/trending` | eight fallback hashtags |
//! | `POST /posts` | `ApiResponse { success: false, message }` |
//! | `POST /media/upload` | `Err(ApiError)` carrying a display message |
//!
//! # Design
//! - `AlumniClient` is stateless; it holds only `ClientConfig`.
//! - Each endpoint is split into `build_*` and `parse_*`, so the I/O boundary
//!   is explicit and the FFI crate can expose it 1:1.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod http;
pub mod media;
pub mod multipart;
pub mod transport;
pub mod types;

pub use api::{AlumniApi, CallOptions};
pub use auth::{AuthToken, CredentialProvider, SessionCredentials, StaticCredentials};
pub use client::AlumniClient;
pub use config::ClientConfig;
pub use error::{ApiError, AuthError, ConfigError};
pub use fallback::default_hashtags;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use media::MediaFile;
pub use transport::{CancelToken, Transport, UploadProgress, UreqTransport};
pub use types::{ApiResponse, Audience, Hashtag, MediaKind, MediaRef, Post, PostPayload, UploadResult};
