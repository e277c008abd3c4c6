pub mod file;
pub mod hackathon;
pub mod object;
pub mod ranking;
pub mod submission;
