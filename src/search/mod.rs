//! Search module
//!
//! Runs a query against a text-search backend and packages the outcome.

mod invoker;

pub use invoker::search;
