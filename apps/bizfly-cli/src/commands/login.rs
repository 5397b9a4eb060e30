//! Login command - browser-based SSO authentication

use crate::config::Settings;
use crate::error::CliResult;
use crate::login::{Endpoints, LoginFlow, NoBrowser, SystemBrowser, UrlOpener};
use crate::output::{print_info, print_success};
use clap::Args;
use std::time::Duration;

/// Arguments for the login command
#[derive(Args, Debug, Clone, Default)]
pub struct LoginArgs {
    /// Project to scope the token to (overrides the global --project-id)
    #[arg(long = "project-id")]
    pub project_id: Option<String>,

    /// Don't automatically open the browser
    #[arg(long)]
    pub no_browser: bool,

    /// Give up if the browser has not called back within this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Execute the login command
pub async fn execute(args: LoginArgs, settings: &Settings) -> CliResult<()> {
    if args.no_browser {
        run(args, settings, Endpoints::default(), NoBrowser).await
    } else {
        run(args, settings, Endpoints::default(), SystemBrowser).await
    }
}

/// Run the login against explicit endpoints and browser
pub async fn run<O: UrlOpener>(
    args: LoginArgs,
    settings: &Settings,
    endpoints: Endpoints,
    opener: O,
) -> CliResult<()> {
    if settings.auth_token.is_some() {
        tracing::debug!(path = %settings.config_path.display(), "replacing existing auth token");
    }

    let project_id = settings.resolve_project_id(args.project_id.as_deref());
    if let Some(project_id) = &project_id {
        let region = settings.region()?;
        print_info(&format!(
            "Token will be scoped to project {} ({})",
            project_id, region
        ));
    }

    let outcome = LoginFlow::new(endpoints, settings.config_path.clone(), opener)
        .with_project_id(project_id)
        .with_callback_timeout(args.timeout.map(Duration::from_secs))
        .run()
        .await?;

    if outcome.project_scoped {
        print_success("Login successful! Project-scoped token saved to config file.");
    } else {
        print_success("Login successful! Token saved to config file.");
    }
    print_info(&format!("Config file: {}", outcome.config_path.display()));

    Ok(())
}
