//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for articles.
//! - Isolate SQLite query details from callers.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Soft-deleted rows never leave this layer.

pub mod article_criteria;
pub mod article_mapper;
pub mod article_repo;
