//! ddg-search: DuckDuckGo text search from the command line
//!
//! A search runs through [`search::search`], which drives a [`TextSearch`]
//! backend and always returns a [`SearchResponse`]. The binary prints that
//! response as a single JSON line.
//!
//! Every result carries `"source": "duckduckgo"` ([`results::RESULT_SOURCE`]).
//! Older tools emitting this JSON shape tagged results `"ddg-python"`, so
//! consumers filtering on that tag need to match the new value.

pub mod config;
pub mod engines;
pub mod network;
pub mod results;
pub mod search;

pub use config::Settings;
pub use engines::{DuckDuckGo, SearchSession, TextRecord, TextSearch};
pub use results::{SearchResponse, SearchResult};
pub use search::search;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result cap used when none is requested
pub const DEFAULT_MAX_RESULTS: i64 = 20;
