//! Shared utilities.
//!
//! Lexical path helpers and test helpers.

pub mod paths;

#[cfg(test)]
pub mod testutil;
