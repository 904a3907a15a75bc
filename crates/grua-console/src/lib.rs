// Fallible APIs share one error contract (`ConsoleError`); per-item `# Errors`
// sections would only repeat it.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type"
)]

pub mod autocomplete;
pub mod client;
pub mod config;
pub mod editors;
pub mod error;
pub mod group_form;
pub mod models;
pub mod page;
pub mod search;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ConsoleClient, HttpTransport, Transport};
pub use config::{ConsoleConfig, PatternMode};
pub use error::{ConsoleError, Result};
