// Presentation layer - HTTP handlers and page builders
pub mod app_state;
pub mod handlers;
pub mod pages;
