use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use zen_dl::commands::{self, ConfigOverrides, Delivery, ResolveRequest};
use zen_dl::platform::{Architecture, PackageType, Platform};

/// zen-dl - Zen Browser download helper
///
/// Walks through choosing a platform, an architecture and a package type,
/// then downloads the matching Zen Browser release.
///
/// Examples:
///   zen-dl wizard                                   # Choose interactively
///   zen-dl resolve -p linux -a 64-bit -t flatpak    # Print the download URL
///   zen-dl targets                                  # List every download
#[derive(Parser, Debug)]
#[command(author, version = env!("ZEN_DL_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Release download base URL (also via ZEN_DL_BASE_URL)
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// JSON release catalog replacing the built-in one
    #[arg(long, env = "ZEN_DL_CATALOG", value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Directory downloads are saved to (defaults to the user's download directory)
    #[arg(
        long = "output-dir",
        short = 'o',
        env = "ZEN_DL_OUTPUT_DIR",
        value_name = "PATH",
        global = true
    )]
    pub output_dir: Option<PathBuf>,

    /// Download history file
    #[arg(long, env = "ZEN_DL_HISTORY", value_name = "PATH", global = true)]
    pub history: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Choose a download step by step
    Wizard(WizardArgs),

    /// Resolve a download from explicit choices
    Resolve(ResolveArgs),

    /// List every downloadable target
    Targets,

    /// Show previously selected downloads
    History,
}

#[derive(clap::Args, Debug)]
pub struct WizardArgs {
    /// Print the download URL instead of downloading
    #[arg(long = "no-download")]
    pub no_download: bool,

    /// Open the download URL in the browser
    #[arg(long, conflicts_with = "no_download")]
    pub browser: bool,

    /// Overwrite existing files without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Pre-select the platform from this browser user agent instead of the host
    #[arg(long = "user-agent", value_name = "UA")]
    pub user_agent: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// windows, linux or macos
    #[arg(long, short = 'p')]
    pub platform: Platform,

    /// 64-bit, 32-bit or aarch64
    #[arg(long = "arch", short = 'a', default_value = "64-bit")]
    pub architecture: Architecture,

    /// installer, portable, AppImage or flatpak (defaults per platform)
    #[arg(long = "package", short = 't')]
    pub package_type: Option<PackageType>,

    /// Download the file instead of printing its URL
    #[arg(long)]
    pub download: bool,

    /// Overwrite existing files without asking
    #[arg(long, short = 'y', requires = "download")]
    pub yes: bool,
}

impl WizardArgs {
    fn delivery(&self) -> Delivery {
        if self.no_download {
            Delivery::Print
        } else if self.browser {
            Delivery::Browser
        } else {
            Delivery::Download {
                assume_yes: self.yes,
            }
        }
    }
}

impl ResolveArgs {
    fn delivery(&self) -> Delivery {
        if self.download {
            Delivery::Download {
                assume_yes: self.yes,
            }
        } else {
            Delivery::Print
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = zen_dl::runtime::RealRuntime;
    let overrides = ConfigOverrides {
        base_url: cli.base_url,
        catalog_path: cli.catalog,
        output_dir: cli.output_dir,
        history_path: cli.history,
    };

    match cli.command {
        Commands::Wizard(args) => {
            let delivery = args.delivery();
            commands::wizard(runtime, overrides, delivery, args.user_agent).await?
        }
        Commands::Resolve(args) => {
            let request = ResolveRequest {
                platform: args.platform,
                architecture: args.architecture,
                package_type: args.package_type,
            };
            commands::resolve(runtime, overrides, request, args.delivery()).await?
        }
        Commands::Targets => commands::targets(runtime, overrides)?,
        Commands::History => commands::history(runtime, overrides)?,
    }
    Ok(())
}
