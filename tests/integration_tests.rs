//! Integration tests for repl-dispatch.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
