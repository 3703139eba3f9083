//! Image lookup endpoint.
//!
//! A key resolves either through the `images` table or by probing the upload
//! directory for `<key>.<ext>`. Paths that leave the upload root are refused
//! before any file is opened.

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    extract::{Path as UrlPath, Request, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::errors::AppError;
use crate::AppState;

/// Extensions probed, in order, when a key has no stored path.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "svg"];

/// GET /api/images/{key} - Stream an uploaded image (range requests supported).
pub async fn get_image(
    State(state): State<AppState>,
    UrlPath(key): UrlPath<String>,
    request: Request,
) -> Result<Response, AppError> {
    let root = &state.config.upload_path;

    let candidates: Vec<String> = match state.repo.image_path(&key).await? {
        Some(stored) => vec![strip_uploads_prefix(&stored).to_string()],
        None => IMAGE_EXTENSIONS
            .iter()
            .map(|ext| format!("{key}.{ext}"))
            .collect(),
    };

    for relative in candidates {
        let Some(path) = resolve_within(root, &relative) else {
            tracing::warn!("Image key {} resolves outside the upload directory", key);
            return Err(forbidden());
        };

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            _ => continue,
        }

        // Symlinks can still point outside the root.
        let canonical_root = tokio::fs::canonicalize(root).await?;
        let canonical = tokio::fs::canonicalize(&path).await?;
        if !canonical.starts_with(&canonical_root) {
            tracing::warn!("Image {} links outside the upload directory", key);
            return Err(forbidden());
        }

        let content_type = content_type_for(&canonical);
        let mut response = match ServeFile::new(&canonical).oneshot(request).await {
            Ok(response) => response.map(Body::new).into_response(),
            Err(never) => match never {},
        };
        if response.status().is_success() {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        return Ok(response);
    }

    Err(AppError::NotFound(format!("Image {} not found", key)))
}

fn forbidden() -> AppError {
    AppError::Forbidden("Access denied".to_string())
}

/// Stored paths are sometimes written as `/uploads/...`.
fn strip_uploads_prefix(stored: &str) -> &str {
    stored
        .strip_prefix("/uploads/")
        .or_else(|| stored.strip_prefix("uploads/"))
        .unwrap_or(stored)
}

/// Join `relative` onto `root` lexically. `None` if it is absolute or climbs above `root`.
pub fn resolve_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(parts);
    Some(resolved)
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
