//! Core domain logic (adapter-agnostic)
//!
//! This module contains all scanning logic that is independent
//! of how results are presented.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Queries, events, skip records and outcomes
//! - **xdg**: XDG directory handling
//! - **scanner**: Walking, extraction, matching and orchestration
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod scanner;
pub mod services;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DocseekError, Result};
pub use services::Services;
