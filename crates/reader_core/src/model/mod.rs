//! Domain model for stored feed articles.
//!
//! # Responsibility
//! - Define the article record, its create input and its search projection.
//!
//! # Invariants
//! - Every stored article is identified by a stable `ArticleId`.
//! - Deletion is represented by a `delete_date` tombstone, not hard delete.

pub mod article;
