use axum::{Router, routing::get};

use super::handlers::{
    delete_submission, get_submission, get_submission_analysis, update_submission,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:id",
            get(get_submission)
                .patch(update_submission)
                .delete(delete_submission),
        )
        .route("/:id/analysis", get(get_submission_analysis))
}
