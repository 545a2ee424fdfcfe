pub mod client;
pub mod download;
pub mod error;
pub mod latency;
pub mod runner;
pub mod types;
pub mod upload;
