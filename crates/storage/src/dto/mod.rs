pub mod analytics;
pub mod common;
pub mod file;
pub mod hackathon;
pub mod ranking;
pub mod submission;
