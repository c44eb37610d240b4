//! Terminal-side implementations of the flow's collaborators.

use log::{debug, info, warn};
use std::cell::RefCell;

use crate::flow::{Celebration, Navigator};

pub const SOURCE_CODE_URL: &str = "https://github.com/zen-browser";
pub const DONATE_URL: &str = "https://www.patreon.com/zen_browser";
pub const RELEASE_NOTES_URL: &str = "https://github.com/zen-browser/desktop/releases/latest";
pub const MACOS_INSTALL_URL: &str = "https://github.com/zen-browser/desktop/issues/53";

/// Holds the final URL until the caller starts the HTTP transfer.
#[derive(Debug, Default)]
pub struct TransferQueue {
    url: RefCell<Option<String>>,
}

impl TransferQueue {
    pub fn take(&self) -> Option<String> {
        self.url.borrow_mut().take()
    }
}

impl Navigator for TransferQueue {
    fn navigate(&self, url: &str) {
        info!("Queued transfer of {}", url);
        *self.url.borrow_mut() = Some(url.to_string());
    }
}

/// Hands the URL to the system browser.
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        info!("Opening {} in the browser", url);
        if let Err(e) = open::that(url) {
            warn!("Failed to open browser for {}: {}", url, e);
            println!("Open this link to download Zen: {}", url);
        }
    }
}

pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, url: &str) {
        println!("{}", url);
    }
}

pub struct TerminalCelebration;

impl Celebration for TerminalCelebration {
    fn celebrate(&self) {
        println!();
        println!("Downloaded! ❤️");
        println!("Zen Browser has been downloaded successfully. Enjoy browsing the web with Zen!");
        println!();
        println!("  Source Code    {}", SOURCE_CODE_URL);
        println!("  Donate         {}", DONATE_URL);
        println!("  Release Notes  {}", RELEASE_NOTES_URL);
    }
}

/// For output that must stay machine-readable.
pub struct SilentCelebration;

impl Celebration for SilentCelebration {
    fn celebrate(&self) {
        debug!("Download flow completed");
    }
}

/// Extra steps shown after a MacOS download.
pub fn macos_install_hint() -> String {
    format!(
        "To install Zen on MacOS, the process is a bit different. See {} for instructions.",
        MACOS_INSTALL_URL
    )
}
