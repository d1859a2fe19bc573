pub mod extract;
pub mod init;
pub mod span;
pub mod styles;

pub use extract::{extract, ExtractArgs};
pub use init::{init, InitArgs};
pub use span::{span, SpanArgs};
pub use styles::{styles, StylesArgs};

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// Write `value` as JSON to `out`, or to stdout when `out` is absent
pub(crate) fn emit_json<T: Serialize>(value: &T, pretty: bool, out: Option<&Path>) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match out {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{}", json),
    }
    Ok(())
}
