//! CLI command implementations

pub mod login;
