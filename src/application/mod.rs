// Application layer - Use cases over repository traits
pub mod chart_service;
pub mod notifier;
pub mod sample_log;
pub mod series_builder;
pub mod watchdog_repository;
pub mod watchdog_service;
