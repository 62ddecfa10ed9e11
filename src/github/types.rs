//! Type definitions for repository search: the repository record,
//! query assembly, pagination positions, and strategy selection.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// An immutable snapshot of one repository at query time.
///
/// `database_id` is globally unique and stable across requests and is
/// the only legal deduplication key. `name_with_owner` is not stable
/// over time (renames) and must never be used for dedup.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RepoRecord {
    pub database_id: i64,
    pub name_with_owner: String,
    pub stargazer_count: i64,
    pub fork_count: i64,
    pub disk_usage: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Default for RepoRecord {
    fn default() -> Self {
        Self {
            database_id: 0,
            name_with_owner: String::new(),
            stargazer_count: 0,
            fork_count: 0,
            disk_usage: 0,
            created_at: None,
            updated_at: None,
            pushed_at: None,
            archived_at: None,
        }
    }
}

impl RepoRecord {
    /// Split `name_with_owner` into its owner and name components.
    #[must_use]
    pub fn owner_and_name(&self) -> (&str, &str) {
        self.name_with_owner
            .split_once('/')
            .unwrap_or((self.name_with_owner.as_str(), ""))
    }
}

/// One decoded page of search results, in provider-determined order.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<RepoRecord>,
    pub has_next_page: bool,
}

/// Offset-derived pagination position within one query's result window.
///
/// GitHub's opaque search cursors are a base64 rendering of the result
/// offset, which lets the overlapping-offset strategy address arbitrary
/// positions instead of page-aligned ones. Cursors are never persisted;
/// they exist only for the duration of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u32,
}

impl PageCursor {
    /// Render the provider's opaque cursor token for this offset.
    #[must_use]
    pub fn encode(self) -> String {
        STANDARD.encode(format!("cursor:{}", self.offset))
    }
}

/// Sort metric for the overlapping-offset strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Sort by stargazer count
    Stars,
    /// Sort by fork count
    Forks,
    /// Sort by last update time
    Updated,
}

impl SortField {
    /// Returns the GitHub search syntax name of this sort field.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::Updated => "updated",
        }
    }

    /// Descending sort clause for this field.
    #[must_use]
    pub fn descending_clause(&self) -> String {
        format!("sort:{}-desc", self.as_str())
    }
}

/// Windowing strategy used to exhaust a result window past the
/// provider's pagination-depth limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Sort descending by a metric and walk overlapping offsets up to
    /// the window ceiling. Supports arbitrary sort fields but cannot
    /// see past the ceiling.
    OverlappingOffset { sort: SortField },
    /// Sort ascending by last-push time and re-issue the query bounded
    /// below by the maximum timestamp seen so far. Sidesteps the depth
    /// limit entirely; requires the monotonic pushed timestamp.
    Watermark,
}

/// A search expression in the provider's syntax, augmented
/// programmatically with sort and range clauses.
///
/// Each clause slot holds at most one value: re-setting replaces the
/// prior clause, so an assembled query never carries duplicate or
/// conflicting qualifiers.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    base: String,
    created: Option<String>,
    pushed: Option<String>,
    sort: Option<String>,
}

impl SearchQuery {
    /// Wrap a base search expression.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            created: None,
            pushed: None,
            sort: None,
        }
    }

    /// Set the creation-date range clause, replacing any prior one.
    #[must_use]
    pub fn with_created(mut self, clause: impl Into<String>) -> Self {
        self.created = Some(clause.into());
        self
    }

    /// Set the push-date range clause, replacing any prior one.
    #[must_use]
    pub fn with_pushed(mut self, clause: impl Into<String>) -> Self {
        self.pushed = Some(clause.into());
        self
    }

    /// Set the sort clause, replacing any prior one.
    #[must_use]
    pub fn with_sort(mut self, clause: impl Into<String>) -> Self {
        self.sort = Some(clause.into());
        self
    }

    /// Render the full provider-syntax query string.
    #[must_use]
    pub fn assemble(&self) -> String {
        let mut out = self.base.clone();
        for clause in [&self.created, &self.pushed, &self.sort].into_iter().flatten() {
            out.push(' ');
            out.push_str(clause);
        }
        out
    }
}
