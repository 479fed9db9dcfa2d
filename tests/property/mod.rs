//! Property-based tests

#[cfg(feature = "ssr")]
mod poll_proptest;
