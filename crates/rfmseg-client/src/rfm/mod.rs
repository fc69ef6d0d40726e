pub mod aggregate;
pub mod date;
pub mod filters;
pub mod policy;
pub mod recency;
pub mod score;
pub mod segment;
pub mod segment_stats;
pub mod trend;
pub mod types;
