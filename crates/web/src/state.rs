use std::sync::Arc;

use axum::extract::FromRef;
use evaluator::SubmissionEvaluator;
use storage::Database;

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub evaluator: Arc<dyn SubmissionEvaluator>,
}

impl AppState {
    pub fn new(db: Database, evaluator: Arc<dyn SubmissionEvaluator>) -> Self {
        Self { db, evaluator }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<dyn SubmissionEvaluator> {
    fn from_ref(state: &AppState) -> Self {
        state.evaluator.clone()
    }
}
