//! Regex engine selection.
//!
//! `regex` is the default engine. Building with `--no-default-features --features lite`
//! swaps in `regex-lite`, which keeps wasm bundles small at the cost of Unicode classes.

#[cfg(feature = "regex")]
pub(crate) use regex::Regex;

#[cfg(all(feature = "lite", not(feature = "regex")))]
pub(crate) use regex_lite::Regex;

#[cfg(not(any(feature = "regex", feature = "lite")))]
compile_error!("either the `regex` or the `lite` feature must be enabled");
