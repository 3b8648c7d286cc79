use actix_files::NamedFile;
use actix_web::web;
use std::path::PathBuf;

use crate::error::AppError;

/// Directory holding `index.html` and the `/static` assets
#[derive(Debug, Clone)]
pub struct StaticDir(pub PathBuf);

/// GET /
pub async fn index(static_dir: web::Data<StaticDir>) -> Result<NamedFile, AppError> {
    NamedFile::open_async(static_dir.0.join("index.html"))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "index.html is not available");
            AppError::not_found("Page")
        })
}
