//! Article domain model.
//!
//! # Responsibility
//! - Define the stored article record and the shapes derived from it.
//! - Provide lifecycle helpers for soft-delete semantics.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused.
//! - `delete_date` is the source of truth for tombstone state.
//! - Timestamps are Unix epoch milliseconds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a stored article.
pub type ArticleId = Uuid;

/// Create input: an article before the repository assigns identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    /// Key of the owning feed.
    pub feed_id: String,
    pub url: String,
    /// Base URI used to resolve relative links in `description`.
    pub base_uri: String,
    /// De-duplication key within a feed.
    pub guid: String,
    pub title: String,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub comment_url: Option<String>,
    /// `None` persists as NULL, never as `0`.
    pub comment_count: Option<i64>,
    pub enclosure_url: Option<String>,
    /// `None` persists as NULL, never as `0`.
    pub enclosure_length: Option<i64>,
    pub enclosure_type: Option<String>,
    pub publication_date: Option<i64>,
}

impl NewArticle {
    /// Creates a create input with every optional field unset.
    pub fn new(
        feed_id: impl Into<String>,
        url: impl Into<String>,
        base_uri: impl Into<String>,
        guid: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            feed_id: feed_id.into(),
            url: url.into(),
            base_uri: base_uri.into(),
            guid: guid.into(),
            title: title.into(),
            creator: None,
            description: None,
            comment_url: None,
            comment_count: None,
            enclosure_url: None,
            enclosure_length: None,
            enclosure_type: None,
            publication_date: None,
        }
    }

    /// Attaches the identity the repository assigned on insert.
    pub fn into_article(self, id: ArticleId, create_date: i64) -> Article {
        Article {
            id,
            feed_id: self.feed_id,
            url: self.url,
            base_uri: self.base_uri,
            guid: self.guid,
            title: self.title,
            creator: self.creator,
            description: self.description,
            comment_url: self.comment_url,
            comment_count: self.comment_count,
            enclosure_url: self.enclosure_url,
            enclosure_length: self.enclosure_length,
            enclosure_type: self.enclosure_type,
            publication_date: self.publication_date,
            create_date,
            delete_date: None,
        }
    }
}

/// Full stored article record.
///
/// `feed_id`, `guid`, `base_uri`, `publication_date` and `create_date` are
/// fixed at creation; updates only rewrite the remaining content fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub feed_id: String,
    pub url: String,
    pub base_uri: String,
    pub guid: String,
    pub title: String,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub comment_url: Option<String>,
    pub comment_count: Option<i64>,
    pub enclosure_url: Option<String>,
    pub enclosure_length: Option<i64>,
    pub enclosure_type: Option<String>,
    pub publication_date: Option<i64>,
    /// Set by the repository at insert time.
    pub create_date: i64,
    /// Soft-delete tombstone.
    pub delete_date: Option<i64>,
}

impl Article {
    /// Stamps the soft-delete tombstone.
    pub fn soft_delete(&mut self, now: i64) {
        self.delete_date = Some(now);
    }

    /// Returns whether this article is visible to reads and updates.
    pub fn is_active(&self) -> bool {
        self.delete_date.is_none()
    }
}

/// Read-only projection returned by criteria searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: ArticleId,
    pub url: String,
    pub guid: String,
    pub title: String,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub comment_url: Option<String>,
    pub comment_count: Option<i64>,
    pub enclosure_url: Option<String>,
    pub enclosure_length: Option<i64>,
    pub enclosure_type: Option<String>,
    pub publication_date: Option<i64>,
    pub feed_id: String,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            url: article.url.clone(),
            guid: article.guid.clone(),
            title: article.title.clone(),
            creator: article.creator.clone(),
            description: article.description.clone(),
            comment_url: article.comment_url.clone(),
            comment_count: article.comment_count,
            enclosure_url: article.enclosure_url.clone(),
            enclosure_length: article.enclosure_length,
            enclosure_type: article.enclosure_type.clone(),
            publication_date: article.publication_date,
            feed_id: article.feed_id.clone(),
        }
    }
}
