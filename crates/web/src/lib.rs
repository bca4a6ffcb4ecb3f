//! HTTP host: serves navigation decisions, the session and UI state.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
