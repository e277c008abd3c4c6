use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Criterion, Hackathon, HackathonStatus};

/// Request payload for creating a hackathon
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateHackathonRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Theme must be between 1 and 255 characters"
    ))]
    pub theme: String,

    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,

    #[validate(nested)]
    #[validate(custom(function = "validate_unique_criteria"))]
    #[serde(default)]
    pub criteria: Vec<Criterion>,

    #[serde(default)]
    pub status: Option<HackathonStatus>,
}

/// Request payload for moving a hackathon to another status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateHackathonStatusRequest {
    pub status: String,
}

impl UpdateHackathonStatusRequest {
    pub fn parse_status(&self) -> Result<HackathonStatus, String> {
        self.status.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HackathonResponse {
    pub id: i32,
    pub name: String,
    pub theme: String,
    pub description: String,
    pub criteria: Vec<Criterion>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<Hackathon> for HackathonResponse {
    fn from(hackathon: Hackathon) -> Self {
        Self {
            id: hackathon.id,
            name: hackathon.name,
            theme: hackathon.theme,
            description: hackathon.description,
            criteria: hackathon.criteria.0,
            status: hackathon.status,
            created_at: hackathon.created_at,
        }
    }
}

fn validate_unique_criteria(criteria: &[Criterion]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if criteria.iter().all(|c| seen.insert(c.name.to_lowercase())) {
        Ok(())
    } else {
        let mut error = ValidationError::new("duplicate_criterion");
        error.message = Some("Criterion names must be unique".into());
        Err(error)
    }
}
