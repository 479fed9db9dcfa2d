//! Realtime integration tests

mod broadcast_test;
