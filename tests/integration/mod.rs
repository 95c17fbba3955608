//! End-to-end tests driving the shell through its public API and the rdsh
//! binary.

pub mod binary_test;
pub mod parser_dispatch_test;
pub mod persistence_test;
pub mod shell_test;
