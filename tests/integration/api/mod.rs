//! API integration tests
//!
//! Integration tests for all API endpoints

mod auth_test;
mod launcher_test;
mod library_test;
mod members_test;
