pub mod client;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod traits;
pub mod validator;

pub use client::HttpEvaluator;
pub use error::{EvaluatorError, Result};
pub use models::{AnalysisRequest, EvaluationRequest};
pub use pipeline::EvaluationPipeline;
pub use traits::SubmissionEvaluator;
