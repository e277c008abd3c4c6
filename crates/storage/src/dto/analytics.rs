use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aggregate view over the evaluated submissions of a hackathon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HackathonAnalytics {
    pub hackathon_id: i32,
    pub total_submissions: usize,
    pub evaluated_submissions: usize,
    /// Mean score of evaluated submissions; null when none are scored
    pub average_score: Option<f64>,
    pub score_distribution: Vec<ScoreBucket>,
    pub criteria_averages: Vec<CriterionAverage>,
    /// Most frequent keywords, at most five
    pub top_keywords: Vec<KeywordCount>,
    pub strengths_count: usize,
    pub weaknesses_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoreBucket {
    #[schema(example = "80-89")]
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CriterionAverage {
    pub criterion: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}
