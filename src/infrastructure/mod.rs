// Infrastructure layer module
// Database adapters and process-level setup
// Follows Hexagonal Architecture

pub mod logging;
pub mod repositories;
