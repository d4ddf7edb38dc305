//! Single-line JSON output
//!
//! Output is one line with `", "` between items and `": "` after keys.
//! Non-ASCII text is written as UTF-8, never escaped.

use anyhow::Result;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io;

/// Compact formatter that keeps a space after separators
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Render `value` as a single JSON line (without the trailing newline)
pub fn to_json_line<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::with_capacity(256);
    let mut serializer = Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Error object printed for command-line usage errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageError {
    pub error: String,
}

impl UsageError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
