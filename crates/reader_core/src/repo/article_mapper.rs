//! Positional row mapping for article search results.
//!
//! # Invariants
//! - Column positions follow [`SUMMARY_COLUMNS`] exactly.
//! - NULL numeric columns map to `None`, never to `0`.

use crate::model::article::{ArticleId, ArticleSummary};
use crate::repo::article_repo::{RepoError, RepoResult};
use rusqlite::{Row, Rows};
use uuid::Uuid;

/// Select list shared by every summary query, in mapping order.
pub const SUMMARY_COLUMNS: &str = "a.id,
    a.url,
    a.guid,
    a.title,
    a.creator,
    a.description,
    a.comment_url,
    a.comment_count,
    a.enclosure_url,
    a.enclosure_length,
    a.enclosure_type,
    a.publication_date,
    a.feed_id";

/// Maps one row selected with [`SUMMARY_COLUMNS`].
pub fn map_summary_row(row: &Row<'_>) -> RepoResult<ArticleSummary> {
    let id_text: String = row.get(0)?;
    Ok(ArticleSummary {
        id: parse_article_id(&id_text)?,
        url: row.get(1)?,
        guid: row.get(2)?,
        title: row.get(3)?,
        creator: row.get(4)?,
        description: row.get(5)?,
        comment_url: row.get(6)?,
        comment_count: row.get(7)?,
        enclosure_url: row.get(8)?,
        enclosure_length: row.get(9)?,
        enclosure_type: row.get(10)?,
        publication_date: row.get(11)?,
        feed_id: row.get(12)?,
    })
}

/// Drains a cursor into summaries, preserving row order.
pub fn map_summary_rows(mut rows: Rows<'_>) -> RepoResult<Vec<ArticleSummary>> {
    let mut summaries = Vec::new();
    while let Some(row) = rows.next()? {
        summaries.push(map_summary_row(row)?);
    }
    Ok(summaries)
}

pub(crate) fn parse_article_id(value: &str) -> RepoResult<ArticleId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{value}` in articles.id"))
    })
}
