//! Career Path: client for the career-roadmap backend.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod guard;
pub mod onboarding;
pub mod profile;
pub mod roadmap;
pub mod session;
pub mod store;
