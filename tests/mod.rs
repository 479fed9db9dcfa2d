//! Test suite for Oasis
//!
//! One test binary; shared helpers live in `common`.

pub mod common;
pub mod property;
