pub mod config;
pub mod feedback;
pub mod progress;
pub mod time;
