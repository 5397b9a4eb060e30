//! Opening the SSO page in the user's browser

use std::io;

/// Capability to hand a URL to something that can display it
///
/// Failures are never fatal to the login: the callback listener is already
/// live, so the user can still paste the URL by hand. Openers that are
/// switched off on purpose report `ErrorKind::Unsupported`.
pub trait UrlOpener: Send + Sync {
    fn open_url(&self, url: &str) -> io::Result<()>;
}

/// The platform's default browser (`cmd /c start`, `open` or `xdg-open`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open_url(&self, url: &str) -> io::Result<()> {
        open::that_detached(url)
    }
}

/// Used with `--no-browser`: never launches anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBrowser;

impl UrlOpener for NoBrowser {
    fn open_url(&self, _url: &str) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "browser launch disabled",
        ))
    }
}

/// Display the login URL for manual browser navigation
pub fn display_login_url(url: &str) {
    println!("\nPlease open this URL in your browser:");
    println!("  {}", url);
    println!("\nAfter signing in, return here to continue.");
}
