use storage::dto::submission::{SubmissionAnalysis, SubmissionEvaluation};

use crate::Result;
use crate::models::{AnalysisRequest, EvaluationRequest};

/// The external capability that scores and analyses submissions.
#[async_trait::async_trait]
pub trait SubmissionEvaluator: Send + Sync {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<SubmissionEvaluation>;

    async fn analyze(&self, request: &AnalysisRequest) -> Result<SubmissionAnalysis>;

    async fn health_check(&self) -> Result<bool>;
}
