//! Search backend module
//!
//! Defines the text-search capability traits and the DuckDuckGo backend.

mod error;
mod traits;

pub mod duckduckgo;

pub use duckduckgo::{DuckDuckGo, DuckDuckGoSession};
pub use error::EngineError;
pub use traits::*;
