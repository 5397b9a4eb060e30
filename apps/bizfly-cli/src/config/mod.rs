//! Configuration management for the bizfly CLI

mod file;
mod paths;
mod region;
mod settings;

pub use file::ConfigFile;
pub use paths::ConfigPaths;
pub use region::Region;
pub use settings::{GlobalArgs, Settings};

/// Config key holding the persisted credential
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Config key holding the default project
pub const PROJECT_ID_KEY: &str = "project_id";

/// Config key holding the default region
pub const REGION_KEY: &str = "region";
