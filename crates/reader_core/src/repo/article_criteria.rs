//! Sparse article search criteria and WHERE-clause construction.
//!
//! # Responsibility
//! - Describe optional, conjunctive article filters.
//! - Turn present filters into SQL predicates plus positional parameters.
//!
//! # Invariants
//! - `a.delete_date IS NULL` is always the first predicate.
//! - Filters are applied in fixed order: id, guid_in, title, url,
//!   publication_date_min, feed_id.
//! - `publication_date_min` is strict (`>`).
//! - Parameters line up one-to-one with `?` placeholders in predicate order.

use crate::model::article::ArticleId;
use rusqlite::types::Value;

const ACTIVE_PREDICATE: &str = "a.delete_date IS NULL";
const NO_MATCH_PREDICATE: &str = "1 = 0";

/// Optional article filters; unset fields place no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleCriteria {
    /// Exact article id.
    pub id: Option<ArticleId>,
    /// Guid set membership. An empty set matches nothing.
    pub guid_in: Option<Vec<String>>,
    /// Exact title.
    pub title: Option<String>,
    /// Exact url.
    pub url: Option<String>,
    /// Exclusive lower bound on `publication_date` (epoch ms).
    pub publication_date_min: Option<i64>,
    /// Exact owning feed.
    pub feed_id: Option<String>,
}

impl ArticleCriteria {
    /// Criteria matching every non-deleted article.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: ArticleId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_guid_in<I, S>(mut self, guids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guid_in = Some(guids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_publication_date_min(mut self, epoch_ms: i64) -> Self {
        self.publication_date_min = Some(epoch_ms);
        self
    }

    pub fn with_feed_id(mut self, feed_id: impl Into<String>) -> Self {
        self.feed_id = Some(feed_id.into());
        self
    }

    /// Builds the WHERE clause for the present filters.
    pub fn where_clause(&self) -> WhereClause {
        self.filters()
            .into_iter()
            .filter_map(|filter| filter.binding.map(|binding| (filter.template, binding)))
            .fold(WhereClause::active_only(), |clause, (template, binding)| {
                clause.and(template, binding)
            })
    }

    fn filters(&self) -> [Filter; 6] {
        [
            Filter {
                template: "a.id = ?",
                binding: self.id.map(|id| Binding::One(Value::Text(id.to_string()))),
            },
            Filter {
                template: "a.guid IN (?)",
                binding: self.guid_in.as_ref().map(|guids| {
                    Binding::Many(guids.iter().cloned().map(Value::Text).collect())
                }),
            },
            Filter {
                template: "a.title = ?",
                binding: text_binding(self.title.as_deref()),
            },
            Filter {
                template: "a.url = ?",
                binding: text_binding(self.url.as_deref()),
            },
            Filter {
                template: "a.publication_date > ?",
                binding: self
                    .publication_date_min
                    .map(|epoch_ms| Binding::One(Value::Integer(epoch_ms))),
            },
            Filter {
                template: "a.feed_id = ?",
                binding: text_binding(self.feed_id.as_deref()),
            },
        ]
    }
}

/// One optional filter: a predicate template and the value it binds, if set.
struct Filter {
    template: &'static str,
    binding: Option<Binding>,
}

enum Binding {
    One(Value),
    /// Expands the template's single `?` into one placeholder per value.
    Many(Vec<Value>),
}

fn text_binding(value: Option<&str>) -> Option<Binding> {
    value.map(|text| Binding::One(Value::Text(text.to_string())))
}

/// AND-joined predicates with their positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    predicates: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    fn active_only() -> Self {
        Self {
            predicates: vec![ACTIVE_PREDICATE.to_string()],
            params: Vec::new(),
        }
    }

    fn and(mut self, template: &str, binding: Binding) -> Self {
        match binding {
            Binding::One(value) => {
                self.predicates.push(template.to_string());
                self.params.push(value);
            }
            Binding::Many(values) if values.is_empty() => {
                self.predicates.push(NO_MATCH_PREDICATE.to_string());
            }
            Binding::Many(values) => {
                let placeholders = vec!["?"; values.len()].join(", ");
                self.predicates.push(template.replacen('?', &placeholders, 1));
                self.params.extend(values);
            }
        }
        self
    }

    /// Renders ` WHERE ...`, or an empty string when there are no predicates.
    pub fn sql(&self) -> String {
        if self.predicates.is_empty() {
            return String::new();
        }
        format!(" WHERE {}", self.predicates.join(" AND "))
    }

    /// Positional parameters in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }
}
