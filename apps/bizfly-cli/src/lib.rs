//! bizfly CLI library
//!
//! The binary in main.rs is a thin clap front end over these modules; they
//! are public so integration tests can drive them directly.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod login;
pub mod output;
