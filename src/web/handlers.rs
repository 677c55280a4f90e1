//! Front-end HTTP Handlers
//!
//! Upload and playback surface. Uploads stream through the transcoder
//! and land in the content service segment by segment; playback resolves
//! each manifest or media segment through the same service.
//!
//! Status mapping: missing content is 404, a pre-existing video id on
//! upload is 409, malformed multipart is 400, anything else is 500.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Extension, Multipart, Path};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use chrono::Utc;

use super::pages;
use crate::catalog::VideoCatalog;
use crate::content::ContentService;
use crate::error::ContentError;
use crate::transcode::DashTranscoder;

/// Maximum accepted upload size.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Everything the front-end handlers need.
pub struct WebContext {
    pub catalog: VideoCatalog,
    pub content: Arc<dyn ContentService>,
    pub transcoder: DashTranscoder,
    /// Scratch space for uploads awaiting transcode.
    pub scratch_dir: PathBuf,
}

/// Builds the front-end HTTP router.
pub fn router(ctx: Arc<WebContext>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/upload", post(handle_upload))
        .route("/videos/{video_id}", get(handle_video_page))
        .route("/content/{video_id}/{filename}", get(handle_video_content))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(Extension(ctx))
}

async fn handle_index(Extension(ctx): Extension<Arc<WebContext>>) -> Response {
    match ctx.catalog.list().await {
        Ok(videos) => Html(pages::render_index(&videos)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list videos: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

async fn handle_video_page(
    Extension(ctx): Extension<Arc<WebContext>>,
    Path(video_id): Path<String>,
) -> Response {
    match ctx.catalog.read(&video_id).await {
        Ok(Some(video)) => Html(pages::render_video(&video)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No such video").into_response(),
        Err(e) => {
            tracing::error!("Failed to read video {video_id}: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

async fn handle_video_content(
    Extension(ctx): Extension<Arc<WebContext>>,
    Path((video_id, filename)): Path<(String, String)>,
) -> Response {
    match ctx.content.read(&video_id, &filename).await {
        Ok(data) => {
            let content_type = content_type_for(&filename);
            ([(header::CONTENT_TYPE, content_type)], data).into_response()
        }
        Err(ContentError::NotFound(_)) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Err(e) => {
            tracing::error!("Failed to read {video_id}/{filename}: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

async fn handle_upload(
    Extension(ctx): Extension<Arc<WebContext>>,
    multipart: Multipart,
) -> Response {
    let (filename, data) = match read_upload_field(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    let video_id = match filename.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem.to_string(),
        _ => filename.clone(),
    };
    if video_id.is_empty() {
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    match ctx.catalog.read(&video_id).await {
        Ok(Some(_)) => return (StatusCode::CONFLICT, "Video already exists").into_response(),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Metadata lookup for {video_id} failed: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    }

    if let Err(e) = ctx.catalog.create(&video_id, Utc::now()).await {
        tracing::error!("Failed to record video {video_id}: {e}");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
    }

    match ingest(&ctx, &video_id, &filename, data).await {
        Ok(segment_count) => {
            tracing::info!("Ingested {video_id}: {segment_count} file(s)");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::error!("Ingest of {video_id} failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Pulls the `file` field out of the multipart body.
async fn read_upload_field(mut multipart: Multipart) -> Result<(String, Bytes), Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err((StatusCode::BAD_REQUEST, "Missing file field").into_response());
            }
            Err(_) => return Err((StatusCode::BAD_REQUEST, "Bad request").into_response()),
        };

        if field.name() != Some("file") {
            continue;
        }

        let Some(filename) = field.file_name().map(str::to_string) else {
            return Err((StatusCode::BAD_REQUEST, "Missing filename").into_response());
        };
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(_) => return Err((StatusCode::BAD_REQUEST, "Bad request").into_response()),
        };

        return Ok((filename, data));
    }
}

/// Saves the upload, transcodes it to DASH, and writes every produced
/// file through the content service. Returns the number of files stored.
async fn ingest(
    ctx: &WebContext,
    video_id: &str,
    filename: &str,
    data: Bytes,
) -> crate::error::Result<usize> {
    tokio::fs::create_dir_all(&ctx.scratch_dir).await?;
    let workspace = tempfile::tempdir_in(&ctx.scratch_dir)?;

    let input_path = workspace.path().join(filename);
    tokio::fs::write(&input_path, &data).await?;

    let output_dir = workspace.path().join("dash");
    ctx.transcoder.transcode(&input_path, &output_dir).await?;

    let mut stored = 0usize;
    let mut entries = tokio::fs::read_dir(&output_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };

        let bytes = tokio::fs::read(entry.path()).await?;
        ctx.content
            .write(video_id, &name, Bytes::from(bytes))
            .await?;
        stored += 1;
    }

    Ok(stored)
}

fn content_type_for(filename: &str) -> &'static str {
    match FsPath::new(filename).extension().and_then(|e| e.to_str()) {
        Some("mpd") => "application/dash+xml",
        Some("m4s") => "video/mp4",
        _ => "application/octet-stream",
    }
}
