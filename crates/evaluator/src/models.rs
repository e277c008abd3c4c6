use serde::{Deserialize, Serialize};
use storage::models::Criterion;

/// What the evaluation service receives for one submission.
///
/// Text submissions travel as `content`; every other format is sent as
/// base64 in `file_base64`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub submission_id: i32,
    pub team_name: String,
    pub hackathon_name: String,
    pub theme: String,
    pub criteria: Vec<Criterion>,
    pub file_type: String,
    pub original_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_base64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub submission_id: i32,
    pub team_name: String,
    pub file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
}
