use axum::{Router, extract::DefaultBodyLimit};

use crate::features::{files, hackathons, submissions};
use crate::state::AppState;

pub fn configure(state: AppState, max_upload_bytes: usize) -> Router {
    let api = Router::new()
        .nest("/hackathons", hackathons::routes::routes())
        .nest("/submissions", submissions::routes::routes())
        .nest("/files", files::routes::routes());

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
