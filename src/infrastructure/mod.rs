// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_log;
pub mod svg_chart;
pub mod twilio;
pub mod watchdog_store;
