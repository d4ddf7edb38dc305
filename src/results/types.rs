//! Result type definitions

use crate::engines::TextRecord;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Source tag attached to every result.
///
/// Replaces the `"ddg-python"` tag used by earlier producers of this output.
pub const RESULT_SOURCE: &str = "duckduckgo";

/// A single normalized search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result
    pub title: String,
    /// The URL of the result
    pub url: String,
    /// Content snippet
    pub description: String,
    /// Backend that produced the result
    pub source: String,
}

impl SearchResult {
    /// Normalize an upstream record, defaulting missing fields to ""
    pub fn from_record(record: TextRecord) -> Self {
        Self {
            title: record.title.unwrap_or_default(),
            url: record.href.unwrap_or_default(),
            description: record.body.unwrap_or_default(),
            source: RESULT_SOURCE.to_string(),
        }
    }
}

impl From<TextRecord> for SearchResult {
    fn from(record: TextRecord) -> Self {
        Self::from_record(record)
    }
}

/// Outcome of one search.
///
/// `count` only exists on success and `error` only on failure; both shapes
/// echo the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResponse {
    Success {
        query: String,
        results: Vec<SearchResult>,
    },
    Failure {
        query: String,
        error: String,
    },
}

impl SearchResponse {
    pub fn success(query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self::Success {
            query: query.into(),
            results,
        }
    }

    pub fn failure(query: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failure {
            query: query.into(),
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The query exactly as it was given
    pub fn query(&self) -> &str {
        match self {
            Self::Success { query, .. } | Self::Failure { query, .. } => query,
        }
    }

    /// Results in backend order; always empty on failure
    pub fn results(&self) -> &[SearchResult] {
        match self {
            Self::Success { results, .. } => results,
            Self::Failure { .. } => &[],
        }
    }

    pub fn count(&self) -> Option<usize> {
        match self {
            Self::Success { results, .. } => Some(results.len()),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

impl Serialize for SearchResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SearchResponse", 4)?;
        match self {
            Self::Success { query, results } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("query", query)?;
                state.serialize_field("results", results)?;
                state.serialize_field("count", &results.len())?;
            }
            Self::Failure { query, error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
                state.serialize_field("query", query)?;
                state.serialize_field("results", &[] as &[SearchResult])?;
            }
        }
        state.end()
    }
}
