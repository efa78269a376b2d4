//! Morshed Common Library
//!
//! Shared code for the Morshed professor review service including:
//! - Database models and repository patterns
//! - Error types and handling
//! - Configuration management
//! - Tag vocabulary and content moderation
//! - Static university registry
//! - Metrics and observability

pub mod cache;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod moderation;
pub mod tags;
pub mod universities;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{Repository, ReviewRow};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum review/reply content length in characters
pub const MAX_CONTENT_LENGTH: usize = 500;

/// Duplicate submissions required before a professor is auto-approved
pub const DEFAULT_APPROVAL_THRESHOLD: u32 = 3;

/// Maximum nesting depth of a reply thread. Deeper chains are rejected
/// at submission so threads stay renderable and serializable.
pub const MAX_REPLY_DEPTH: usize = 5;

/// Top-K tags surfaced in professor summaries
pub const DEFAULT_TOP_TAGS: usize = 3;
