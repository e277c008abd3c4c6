use std::collections::HashSet;

use storage::dto::submission::SubmissionEvaluation;
use storage::models::Criterion;
use tracing::warn;
use validator::Validate;

use crate::{EvaluatorError, Result};

/// Checks an evaluation returned by the service before it is written back.
pub struct EvaluationValidator;

impl EvaluationValidator {
    pub fn validate(
        evaluation: &SubmissionEvaluation,
        criteria: &[Criterion],
    ) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if !evaluation.score.is_finite() {
            report
                .errors
                .push(format!("Score is not a number: {}", evaluation.score));
        }

        if let Err(errors) = evaluation.validate() {
            for (field, field_errors) in errors.field_errors() {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    report.errors.push(format!("{}: {}", field, message));
                }
            }
        }

        let expected: HashSet<&str> = criteria.iter().map(|c| c.name.as_str()).collect();

        for name in evaluation.criteria_scores.keys() {
            if !expected.contains(name.as_str()) {
                report
                    .warnings
                    .push(format!("Score given for unknown criterion '{}'", name));
            }
        }

        for criterion in criteria {
            if !evaluation.criteria_scores.contains_key(&criterion.name) {
                report
                    .warnings
                    .push(format!("No score for criterion '{}'", criterion.name));
            }
        }

        if evaluation
            .justification
            .as_deref()
            .is_none_or(|j| j.trim().is_empty())
        {
            report
                .warnings
                .push("Evaluation has no justification".to_string());
        }

        if !report.errors.is_empty() {
            Err(EvaluatorError::InvalidResult(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self, submission_id: i32) {
        for warning in &self.warnings {
            warn!("Submission {}: {}", submission_id, warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn criteria() -> Vec<Criterion> {
        ["Innovation", "Feasibility"]
            .into_iter()
            .map(|name| Criterion {
                name: name.to_string(),
                description: String::new(),
                weightage: 50.0,
            })
            .collect()
    }

    fn evaluation(score: f64, scores: &[(&str, f64)]) -> SubmissionEvaluation {
        SubmissionEvaluation {
            score,
            justification: Some("Clear problem definition".to_string()),
            criteria_scores: scores
                .iter()
                .map(|&(name, score)| (name.to_string(), score))
                .collect::<BTreeMap<_, _>>(),
            summary: None,
            keywords: vec![],
            strengths: vec![],
            weaknesses: vec![],
        }
    }

    #[test]
    fn test_complete_evaluation_has_no_warnings() {
        let report = EvaluationValidator::validate(
            &evaluation(87.0, &[("Innovation", 9.0), ("Feasibility", 8.0)]),
            &criteria(),
        )
        .unwrap();
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_and_unknown_criteria_warn() {
        let report = EvaluationValidator::validate(
            &evaluation(60.0, &[("Innovation", 6.0), ("Design", 7.0)]),
            &criteria(),
        )
        .unwrap();
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings.iter().any(|w| w.contains("Design")));
        assert!(report.warnings.iter().any(|w| w.contains("Feasibility")));
    }

    #[test]
    fn test_out_of_range_score_is_error() {
        let result = EvaluationValidator::validate(&evaluation(130.0, &[]), &criteria());
        assert!(matches!(result, Err(EvaluatorError::InvalidResult(_))));

        let result =
            EvaluationValidator::validate(&evaluation(50.0, &[("Innovation", -1.0)]), &criteria());
        assert!(result.is_err());
    }

    #[test]
    fn test_nan_score_is_error() {
        let result = EvaluationValidator::validate(&evaluation(f64::NAN, &[]), &criteria());
        assert!(result.is_err());
    }
}
