use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct Hackathon {
    pub id: i32,
    pub name: String,
    pub theme: String,
    pub description: String,
    pub criteria: Json<Vec<Criterion>>,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
}

/// A weighted evaluation dimension, scored 0-10 per submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Criterion {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Criterion name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,

    #[validate(range(
        min = 0.0,
        max = 100.0,
        message = "Criterion weightage must be between 0 and 100"
    ))]
    pub weightage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HackathonStatus {
    NotStarted,
    InProgress,
    Evaluating,
    Completed,
}

impl HackathonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Evaluating => "evaluating",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for HackathonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HackathonStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "evaluating" => Ok(Self::Evaluating),
            "completed" => Ok(Self::Completed),
            other => Err(format!("Invalid status value '{}'", other)),
        }
    }
}

impl Hackathon {
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("in_progress".parse(), Ok(HackathonStatus::InProgress));
        assert_eq!(HackathonStatus::Completed.to_string(), "completed");
        assert!("done".parse::<HackathonStatus>().is_err());
    }

    #[test]
    fn test_criterion_weightage_range() {
        let criterion = Criterion {
            name: "Innovation".to_string(),
            description: String::new(),
            weightage: 140.0,
        };
        assert!(criterion.validate().is_err());
    }
}
