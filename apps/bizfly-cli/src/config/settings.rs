//! Resolved CLI settings
//!
//! Built once at startup from flags, environment and the settings file, then
//! handed by reference to whichever command runs. Precedence for every value
//! is flag > environment > file > default.

use super::{ConfigFile, ConfigPaths, Region, AUTH_TOKEN_KEY, PROJECT_ID_KEY, REGION_KEY};
use crate::error::CliResult;
use clap::Args;
use std::path::PathBuf;

/// Flags shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default is $HOME/.bizfly.yaml)
    #[arg(long, global = true, env = "BIZFLY_CLOUD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Region you want to access the resource
    #[arg(long, global = true, env = "BIZFLY_CLOUD_REGION")]
    pub region: Option<String>,

    /// Your Bizfly Cloud project ID
    ///
    /// Not propagated: `login` has its own `--project-id`, which wins.
    #[arg(long = "project-id", env = "BIZFLY_CLOUD_PROJECT_ID")]
    pub project_id: Option<String>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    /// Region name as given; parsed only by commands that talk to a region
    pub region_name: Option<String>,
    pub project_id: Option<String>,
    /// Credential persisted by a previous `bizfly login`
    pub auth_token: Option<String>,
}

impl Settings {
    /// Resolve settings from the global flags and the settings file
    pub fn load(args: &GlobalArgs) -> CliResult<Self> {
        let paths = ConfigPaths::resolve(args.config.clone())?;
        let file = ConfigFile::load(&paths.config_file)?;

        if file.exists() {
            tracing::debug!(path = %paths.config_file.display(), "using config file");
        }

        Self::from_sources(args, &file)
    }

    /// Merge flag values over an already-loaded settings file
    pub fn from_sources(args: &GlobalArgs, file: &ConfigFile) -> CliResult<Self> {
        let region_name = non_empty(args.region.as_deref())
            .or(file.get_str(REGION_KEY))
            .map(str::to_string);

        let project_id = non_empty(args.project_id.as_deref())
            .or(file.get_str(PROJECT_ID_KEY))
            .map(str::to_string);

        Ok(Self {
            config_path: file.path().to_path_buf(),
            region_name,
            project_id,
            auth_token: file.get_str(AUTH_TOKEN_KEY).map(str::to_string),
        })
    }

    /// Selected region, HaNoi when none is configured
    pub fn region(&self) -> CliResult<Region> {
        match non_empty(self.region_name.as_deref()) {
            Some(name) => name.parse(),
            None => Ok(Region::default()),
        }
    }

    /// Project to scope a token to: command flag, then global flag/env, then file
    pub fn resolve_project_id(&self, command_flag: Option<&str>) -> Option<String> {
        non_empty(command_flag)
            .map(str::to_string)
            .or_else(|| self.project_id.clone())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
