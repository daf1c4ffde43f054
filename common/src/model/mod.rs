pub mod cafe;
pub mod insights;
pub mod leaderboard;
