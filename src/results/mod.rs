//! Result types and output encoding
//!
//! Defines the normalized result and response values and their JSON line form.

mod json;
mod types;

pub use json::{to_json_line, SpacedFormatter, UsageError};
pub use types::*;
