pub mod analytics;
pub mod export;
pub mod ingest;
pub mod leaderboard;
pub mod ranking;
