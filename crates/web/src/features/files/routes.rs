use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    delete_file, download_file, get_file, get_file_content, list_files, upload_file,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_files))
        .route("/upload", post(upload_file))
        .route("/:id", get(get_file).delete(delete_file))
        .route("/:id/content", get(get_file_content))
        .route("/:id/download", get(download_file))
}
