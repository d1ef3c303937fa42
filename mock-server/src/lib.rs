use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag {
    pub id: u64,
    pub tag: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    Public,
    Connections,
    Private,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub kind: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub caption: String,
    pub hashtags: Vec<Hashtag>,
    pub audience: Audience,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
}

#[derive(Deserialize)]
pub struct CreatePost {
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<Hashtag>,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub media: Option<MediaRef>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendingHashtags {
    pub hashtags: Vec<Hashtag>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct StoredMedia {
    pub content_type: String,
    pub kind: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct AppState {
    pub posts: Arc<RwLock<Vec<Post>>>,
    pub media: Arc<RwLock<HashMap<String, StoredMedia>>>,
}

type Failure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, message: impl Into<String>) -> Failure {
    (
        status,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/hashtags/trending", get(trending_hashtags))
        .route("/posts", get(list_posts).post(create_post))
        .route("/media/upload", post(upload_media))
        .route("/media/{name}", get(get_media))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The list served by `GET /hashtags/trending`.
pub fn trending() -> Vec<Hashtag> {
    [(101, "Homecoming"), (102, "ClassOf2015"), (103, "AlumniMeetup"), (104, "Referrals"), (105, "GivingDay")]
        .into_iter()
        .map(|(id, tag)| Hashtag {
            id,
            tag: tag.to_string(),
        })
        .collect()
}

/// Any non-empty bearer token is accepted.
fn require_bearer(headers: &HeaderMap) -> Result<(), Failure> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();
    if token.is_empty() {
        return Err(failure(StatusCode::UNAUTHORIZED, "Missing or invalid bearer token"));
    }
    Ok(())
}

async fn trending_hashtags() -> Json<TrendingHashtags> {
    Json(TrendingHashtags {
        hashtags: trending(),
    })
}

/// Posts created so far, oldest first.
async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.posts.read().await.clone())
}

async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    input: Result<Json<CreatePost>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), Failure> {
    require_bearer(&headers)?;
    let Json(input) = input.map_err(|e| failure(StatusCode::BAD_REQUEST, e.body_text()))?;
    if input.caption.trim().is_empty() {
        return Err(failure(StatusCode::UNPROCESSABLE_ENTITY, "Caption must not be empty"));
    }
    let post = Post {
        id: Uuid::new_v4(),
        caption: input.caption,
        hashtags: input.hashtags,
        audience: input.audience,
        media: input.media,
    };
    log::info!("created post {}", post.id);
    state.posts.write().await.push(post.clone());
    Ok((StatusCode::CREATED, Json(post)))
}

async fn upload_media(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResult>, Failure> {
    require_bearer(&headers)?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut kind = "other".to_string();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| failure(StatusCode::BAD_REQUEST, e.body_text()))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| failure(StatusCode::BAD_REQUEST, e.body_text()))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            Some("type") => {
                kind = field
                    .text()
                    .await
                    .map_err(|e| failure(StatusCode::BAD_REQUEST, e.body_text()))?;
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| failure(StatusCode::BAD_REQUEST, "Missing `file` field"))?;
    let name = match std::path::Path::new(&file_name).extension() {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_string_lossy().to_ascii_lowercase()),
        None => Uuid::new_v4().to_string(),
    };
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let file_url = format!("http://{host}/media/{name}");

    log::info!("stored {kind} upload {name} ({} bytes)", bytes.len());
    state.media.write().await.insert(
        name,
        StoredMedia {
            content_type,
            kind,
            bytes,
        },
    );
    Ok(Json(UploadResult { file_url }))
}

async fn get_media(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let media = state.media.read().await;
    let stored = media.get(&name).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, stored.content_type)], stored.bytes))
}
