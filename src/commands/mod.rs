//! Command-line operations built on the download flow.

pub mod config;
mod history;
mod notify;
mod paths;
mod resolve;
mod targets;
mod transfer;
mod wizard;

pub use config::{BASE_URL_ENV, Config, ConfigOverrides};
pub use history::history;
pub use notify::{
    BrowserNavigator, PrintNavigator, SilentCelebration, TerminalCelebration, TransferQueue,
    macos_install_hint,
};
pub use resolve::{ResolveRequest, resolve};
pub use targets::targets;
pub use transfer::{Delivery, fetch};
pub use wizard::{run_wizard, wizard};
