//! Core persistence logic for the feed reader.
//! This crate owns article storage and its soft-delete invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::session::{with_session, Session};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::{Article, ArticleId, ArticleSummary, NewArticle};
pub use repo::article_criteria::{ArticleCriteria, WhereClause};
pub use repo::article_repo::{ArticleRepository, RepoError, RepoResult, SqliteArticleRepository};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
