//! Article repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/delete/search APIs over the `articles` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Rows with a non-null `delete_date` are invisible to every read and update.
//! - Delete stamps `delete_date`; rows are never physically removed.
//! - Repositories never commit; durability is owned by the caller's session.
//! - Unset optional numeric fields are bound as NULL.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::article::{Article, ArticleId, ArticleSummary, NewArticle};
use crate::repo::article_criteria::{ArticleCriteria, WhereClause};
use crate::repo::article_mapper::{
    map_summary_row, map_summary_rows, parse_article_id, SUMMARY_COLUMNS,
};
use log::{debug, info, warn};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    feed_id,
    url,
    base_uri,
    guid,
    title,
    creator,
    description,
    comment_url,
    comment_count,
    enclosure_url,
    enclosure_length,
    enclosure_type,
    publication_date,
    create_date,
    delete_date
FROM articles";

const REQUIRED_ARTICLE_COLUMNS: [&str; 16] = [
    "id",
    "feed_id",
    "url",
    "base_uri",
    "guid",
    "title",
    "creator",
    "description",
    "comment_url",
    "comment_count",
    "enclosure_url",
    "enclosure_length",
    "enclosure_type",
    "publication_date",
    "create_date",
    "delete_date",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for article persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Transport or constraint failure from SQLite, passed through unchanged.
    Db(DbError),
    NotFound(ArticleId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether SQLite rejected the statement on a schema constraint
    /// (NOT NULL, primary key, foreign key).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == ErrorCode::ConstraintViolation
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "article not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted article data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for article persistence.
pub trait ArticleRepository {
    /// Inserts one article under a fresh id and returns that id.
    fn create(&self, article: &NewArticle) -> RepoResult<ArticleId>;
    /// Rewrites the mutable content fields of a live article.
    ///
    /// Returns the affected-row count; `0` means the id is unknown or
    /// soft-deleted and is not an error.
    fn update(&self, article: &Article) -> RepoResult<usize>;
    /// Returns every live article ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Article>>;
    /// Loads one live article by id.
    fn get(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    /// Soft-deletes a live article; fails with `NotFound` otherwise.
    fn delete(&self, id: ArticleId) -> RepoResult<()>;
    /// Searches live articles, oldest `create_date` first.
    fn find_by_criteria(&self, criteria: &ArticleCriteria) -> RepoResult<Vec<ArticleSummary>>;
    /// Returns the earliest-created match, or `None`.
    fn find_first_by_criteria(
        &self,
        criteria: &ArticleCriteria,
    ) -> RepoResult<Option<ArticleSummary>>;
}

/// SQLite-backed article repository.
///
/// Borrows either a plain connection or a [`crate::db::session::Session`];
/// statements join whatever transaction is open on it.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    /// Constructs a repository from a connection with the article schema applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_article_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn create(&self, article: &NewArticle) -> RepoResult<ArticleId> {
        let id = Uuid::new_v4();
        let create_date = now_epoch_ms();

        self.conn
            .execute(
                "INSERT INTO articles (
                    id,
                    feed_id,
                    url,
                    base_uri,
                    guid,
                    title,
                    creator,
                    description,
                    comment_url,
                    comment_count,
                    enclosure_url,
                    enclosure_length,
                    enclosure_type,
                    publication_date,
                    create_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
                params![
                    id.to_string(),
                    article.feed_id.as_str(),
                    article.url.as_str(),
                    article.base_uri.as_str(),
                    article.guid.as_str(),
                    article.title.as_str(),
                    article.creator.as_deref(),
                    article.description.as_deref(),
                    article.comment_url.as_deref(),
                    article.comment_count,
                    article.enclosure_url.as_deref(),
                    article.enclosure_length,
                    article.enclosure_type.as_deref(),
                    article.publication_date,
                    create_date,
                ],
            )
            .map_err(|err| {
                warn!(
                    "event=article_create module=repo status=error feed_id={} error={}",
                    article.feed_id, err
                );
                err
            })?;

        debug!("event=article_create module=repo status=ok article_id={id}");
        Ok(id)
    }

    fn update(&self, article: &Article) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE articles
             SET
                url = ?1,
                title = ?2,
                creator = ?3,
                description = ?4,
                comment_url = ?5,
                comment_count = ?6,
                enclosure_url = ?7,
                enclosure_length = ?8,
                enclosure_type = ?9
             WHERE id = ?10
               AND delete_date IS NULL;",
            params![
                article.url.as_str(),
                article.title.as_str(),
                article.creator.as_deref(),
                article.description.as_deref(),
                article.comment_url.as_deref(),
                article.comment_count,
                article.enclosure_url.as_deref(),
                article.enclosure_length,
                article.enclosure_type.as_deref(),
                article.id.to_string(),
            ],
        )?;

        debug!(
            "event=article_update module=repo status=ok article_id={} changed={changed}",
            article.id
        );
        Ok(changed)
    }

    fn find_all(&self) -> RepoResult<Vec<Article>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARTICLE_SELECT_SQL}
             WHERE delete_date IS NULL
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }

        Ok(articles)
    }

    fn get(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARTICLE_SELECT_SQL}
             WHERE id = ?1
               AND delete_date IS NULL;"
        ))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_article_row(row)?));
        }

        Ok(None)
    }

    fn delete(&self, id: ArticleId) -> RepoResult<()> {
        let Some(mut article) = self.get(id)? else {
            info!("event=article_delete module=repo status=not_found article_id={id}");
            return Err(RepoError::NotFound(id));
        };

        article.soft_delete(now_epoch_ms());
        let changed = self.conn.execute(
            "UPDATE articles
             SET delete_date = ?1
             WHERE id = ?2
               AND delete_date IS NULL;",
            params![article.delete_date, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=article_delete module=repo status=ok article_id={id}");
        Ok(())
    }

    fn find_by_criteria(&self, criteria: &ArticleCriteria) -> RepoResult<Vec<ArticleSummary>> {
        let clause = criteria.where_clause();
        let mut stmt = self.conn.prepare(&summary_query_sql(&clause))?;
        let rows = stmt.query(params_from_iter(clause.params()))?;
        map_summary_rows(rows)
    }

    fn find_first_by_criteria(
        &self,
        criteria: &ArticleCriteria,
    ) -> RepoResult<Option<ArticleSummary>> {
        // No SQL LIMIT: the cursor is simply not read past the first row.
        let clause = criteria.where_clause();
        let mut stmt = self.conn.prepare(&summary_query_sql(&clause))?;
        let mut rows = stmt.query(params_from_iter(clause.params()))?;
        match rows.next()? {
            Some(row) => Ok(Some(map_summary_row(row)?)),
            None => Ok(None),
        }
    }
}

/// Ties on `create_date` fall back to insertion order.
fn summary_query_sql(clause: &WhereClause) -> String {
    format!(
        "SELECT {SUMMARY_COLUMNS}
         FROM articles a{}
         ORDER BY a.create_date ASC, a.rowid ASC;",
        clause.sql()
    )
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let id_text: String = row.get("id")?;
    Ok(Article {
        id: parse_article_id(&id_text)?,
        feed_id: row.get("feed_id")?,
        url: row.get("url")?,
        base_uri: row.get("base_uri")?,
        guid: row.get("guid")?,
        title: row.get("title")?,
        creator: row.get("creator")?,
        description: row.get("description")?,
        comment_url: row.get("comment_url")?,
        comment_count: row.get("comment_count")?,
        enclosure_url: row.get("enclosure_url")?,
        enclosure_length: row.get("enclosure_length")?,
        enclosure_type: row.get("enclosure_type")?,
        publication_date: row.get("publication_date")?,
        create_date: row.get("create_date")?,
        delete_date: row.get("delete_date")?,
    })
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

fn ensure_article_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "articles")? {
        return Err(RepoError::MissingRequiredTable("articles"));
    }

    for column in REQUIRED_ARTICLE_COLUMNS {
        if !table_has_column(conn, "articles", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "articles",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
