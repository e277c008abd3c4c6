use axum::{
    Router,
    routing::{get, patch, post},
};

use super::handlers::{
    create_hackathon, delete_hackathon, evaluate_hackathon, export_hackathon_results,
    get_hackathon, get_hackathon_analytics, get_leaderboard, list_hackathons, list_submissions,
    rank_hackathon, update_hackathon_status, upload_submission,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_hackathons).post(create_hackathon))
        .route("/:id", get(get_hackathon).delete(delete_hackathon))
        .route("/:id/status", patch(update_hackathon_status))
        .route("/:id/evaluate", post(evaluate_hackathon))
        .route("/:id/rank", post(rank_hackathon))
        .route(
            "/:id/submissions",
            get(list_submissions).post(upload_submission),
        )
        .route("/:id/leaderboard", get(get_leaderboard))
        .route("/:id/analytics", get(get_hackathon_analytics))
        .route("/:id/results.csv", get(export_hackathon_results))
}
