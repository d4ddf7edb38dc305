//! Capability traits and request/response types shared by search backends

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A raw record as produced by a text-search backend.
///
/// Every field is optional; defaults are applied when the record is turned
/// into a [`crate::results::SearchResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Page title
    pub title: Option<String>,
    /// Link to the matched page
    pub href: Option<String>,
    /// Snippet shown under the link
    pub body: Option<String>,
}

impl TextRecord {
    pub fn new(
        title: impl Into<String>,
        href: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            href: Some(href.into()),
            body: Some(body.into()),
        }
    }
}

/// Lazily produced, finite sequence of records for one query
pub type RecordStream<'a> = BoxStream<'a, anyhow::Result<TextRecord>>;

/// A backend able to run plain-text web searches.
///
/// Searching always goes through a session obtained from [`TextSearch::open`];
/// whatever the session holds is released when it is dropped.
#[async_trait]
pub trait TextSearch: Send + Sync {
    type Session: SearchSession;

    /// Backend name
    fn name(&self) -> &str;

    /// Acquire a session handle
    async fn open(&self) -> anyhow::Result<Self::Session>;
}

/// An open session on a [`TextSearch`] backend
pub trait SearchSession: Send {
    /// Stream up to `max_results` records for `query`.
    ///
    /// `None` means no explicit cap: the backend returns whatever its first
    /// page holds. Failures surface as `Err` items of the stream.
    fn text<'a>(&'a mut self, query: &'a str, max_results: Option<usize>) -> RecordStream<'a>;
}

/// Safe search level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    On,
    #[default]
    Moderate,
    Off,
}

impl SafeSearch {
    /// Value of DuckDuckGo's `kp` parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::On => "1",
            Self::Moderate => "-1",
            Self::Off => "-2",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Moderate => "moderate",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for SafeSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SafeSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "strict" => Ok(Self::On),
            "moderate" => Ok(Self::Moderate),
            "off" => Ok(Self::Off),
            other => Err(format!(
                "unknown safesearch level '{}' (expected on, moderate or off)",
                other
            )),
        }
    }
}

/// Restrict results to a recent time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeLimit {
    #[serde(rename = "d", alias = "day")]
    Day,
    #[serde(rename = "w", alias = "week")]
    Week,
    #[serde(rename = "m", alias = "month")]
    Month,
    #[serde(rename = "y", alias = "year")]
    Year,
}

impl TimeLimit {
    /// Value of DuckDuckGo's `df` parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "m",
            Self::Year => "y",
        }
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

impl FromStr for TimeLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" => Ok(Self::Day),
            "w" | "week" => Ok(Self::Week),
            "m" | "month" => Ok(Self::Month),
            "y" | "year" => Ok(Self::Year),
            other => Err(format!(
                "unknown time limit '{}' (expected d, w, m or y)",
                other
            )),
        }
    }
}

/// Options applied to every query of a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    /// Region code, e.g. `us-en`; `wt-wt` means no region
    pub region: String,
    pub safesearch: SafeSearch,
    pub timelimit: Option<TimeLimit>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            region: "wt-wt".to_string(),
            safesearch: SafeSearch::default(),
            timelimit: None,
        }
    }
}

/// Form POST to be sent by the HTTP client
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Form fields, sent url-encoded
    pub form: HashMap<String, String>,
}

impl EngineRequest {
    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            form: HashMap::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Replace the form data
    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.form = data;
        self
    }
}

/// HTTP response from an engine request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl EngineResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// DuckDuckGo answers throttled clients with 202 instead of a page
    pub fn is_rate_limited(&self) -> bool {
        self.status == 202 || self.status == 429
    }
}
