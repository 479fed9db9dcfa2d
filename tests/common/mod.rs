//! Common test utilities and helpers
//!
//! - In-memory database and application fixtures
//! - Account helpers (signup with a chosen role)
//! - Custom assertion macros

pub mod assertions;
