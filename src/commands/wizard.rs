//! Line-oriented rendering of the download flow.
//!
//! Each step prints its options as a numbered list. The user types a number
//! to change the pending choice, presses Enter to continue, `b` to go back
//! or `q` to quit.

use anyhow::Result;
use log::debug;
use std::io::{self, BufRead, Write};

use super::config::{Config, ConfigOverrides};
use super::notify::{TerminalCelebration, TransferQueue};
use super::transfer::{Delivery, deliver};
use crate::error::FlowError;
use crate::flow::{Collaborators, DownloadFlow, StepView};
use crate::history::DownloadHistory;
use crate::platform::{
    Architecture, HostDetector, PackageType, Platform, PlatformDetector, UserAgentDetector,
};
use crate::runtime::{Runtime, ask_with_io};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Platform(Platform),
    Architecture(Architecture),
    PackageType(PackageType),
}

struct Entry {
    pick: Pick,
    label: &'static str,
    detail: &'static str,
    selected: bool,
    enabled: bool,
}

struct Screen {
    title: String,
    description: String,
    entries: Vec<Entry>,
}

fn architecture_text(platform: Platform, architecture: Architecture) -> (&'static str, &'static str) {
    match (platform, architecture) {
        (Platform::MacOS, Architecture::Aarch64) => {
            ("aarch64", "64-bit ARM architecture, for Apple's M1 or M2 chips")
        }
        (Platform::MacOS, _) => ("Intel", "64-bit Intel architecture, for older Macs"),
        (_, Architecture::X32) => ("32 Bits", "Slow but compatible with older devices."),
        (_, _) => ("64 Bits", "Blazing fast and compatible with modern devices"),
    }
}

fn package_text(package_type: PackageType) -> (&'static str, &'static str) {
    match package_type {
        PackageType::Installer => ("Installer", "Install Zen with a setup wizard"),
        PackageType::Portable => ("Portable", "Download Zen as a portable archive"),
        PackageType::AppImage => ("AppImage", "Run Zen as a single self-contained file"),
        PackageType::Flatpak => ("Flatpak", "Install Zen from the Flatpak repository."),
    }
}

fn screen(view: &StepView) -> Option<Screen> {
    let screen = match view {
        StepView::Platform { choices } => Screen {
            title: "Platform".to_string(),
            description: "Choose the platform you want to download Zen for.".to_string(),
            entries: choices
                .iter()
                .map(|c| Entry {
                    pick: Pick::Platform(c.value),
                    label: match c.value {
                        Platform::Windows => "Windows",
                        Platform::Linux => "Linux",
                        Platform::MacOS => "MacOS",
                    },
                    detail: "",
                    selected: c.selected,
                    enabled: c.enabled,
                })
                .collect(),
        },
        StepView::Architecture { platform, choices } => Screen {
            title: match platform {
                Platform::MacOS => "Download Zen for MacOS".to_string(),
                _ => "Select Architecture".to_string(),
            },
            description: match platform {
                Platform::MacOS => "Choose the build that matches your Mac.".to_string(),
                _ => "Choose the architecture of your device, either 32-bit or 64-bit."
                    .to_string(),
            },
            entries: choices
                .iter()
                .map(|c| {
                    let (label, detail) = architecture_text(*platform, c.value);
                    Entry {
                        pick: Pick::Architecture(c.value),
                        label,
                        detail,
                        selected: c.selected,
                        enabled: c.enabled,
                    }
                })
                .collect(),
        },
        StepView::PackageType {
            platform,
            architecture,
            choices,
        } => Screen {
            title: format!("Download Zen for {} {}", platform, architecture),
            description: format!(
                "Choose the type of download you want for Zen for {}.",
                platform
            ),
            entries: choices
                .iter()
                .map(|c| {
                    let (label, detail) = package_text(c.value);
                    Entry {
                        pick: Pick::PackageType(c.value),
                        label,
                        detail,
                        selected: c.selected,
                        enabled: c.enabled,
                    }
                })
                .collect(),
        },
        StepView::Finished { .. } => return None,
    };
    Some(screen)
}

fn render<O: Write>(screen: &Screen, output: &mut O) -> Result<()> {
    writeln!(output)?;
    writeln!(output, "{}", screen.title)?;
    writeln!(output, "{}", screen.description)?;
    for (i, entry) in screen.entries.iter().enumerate() {
        let mark = if entry.selected { "[x]" } else { "[ ]" };
        let mut line = format!("  {}. {} {}", i + 1, mark, entry.label);
        if !entry.detail.is_empty() {
            line.push_str(" - ");
            line.push_str(entry.detail);
        }
        if !entry.enabled {
            line.push_str(" (64-bit only)");
        }
        writeln!(output, "{}", line)?;
    }
    Ok(())
}

fn apply<O: Write>(flow: &mut DownloadFlow<'_>, entry: &Entry, output: &mut O) -> Result<()> {
    if !entry.enabled {
        writeln!(output, "{} is only available for 64-bit.", entry.label)?;
        return Ok(());
    }
    let changed = match entry.pick {
        Pick::Platform(platform) => flow.select_platform(platform),
        Pick::Architecture(architecture) => flow.select_architecture(architecture),
        Pick::PackageType(package_type) => flow.select_package_type(package_type),
    };
    debug!("Picked {:?} (changed: {})", entry.pick, changed);
    Ok(())
}

/// Drive `flow` from `input` until it completes or the user quits.
///
/// Returns whether the flow completed. End of input counts as quitting.
/// A configuration gap is fatal; illegal transitions are reported and the
/// prompt repeats.
pub fn run_wizard<I: BufRead, O: Write>(
    flow: &mut DownloadFlow<'_>,
    input: &mut I,
    output: &mut O,
) -> Result<bool> {
    writeln!(output, "Download Zen")?;
    writeln!(
        output,
        "We need to know what kind of device you are using. It will be fast, we promise."
    )?;

    while !flow.is_completed() {
        let Some(screen) = screen(&flow.view()) else {
            break;
        };
        render(&screen, output)?;

        let action = if flow.is_final_step() { "download" } else { "continue" };
        let back = if flow.can_retreat() { ", b to go back" } else { "" };
        let prompt = format!(
            "Select 1-{}, Enter to {}{}, q to quit: ",
            screen.entries.len(),
            action,
            back
        );
        let Some(answer) = ask_with_io(&prompt, input, output)? else {
            debug!("Input closed before the flow completed");
            return Ok(false);
        };

        match answer.to_lowercase().as_str() {
            "" => match flow.advance() {
                Ok(()) => {}
                Err(FlowError::IllegalTransition(e)) => writeln!(output, "Cannot {}: {}", action, e)?,
                Err(e) => return Err(e.into()),
            },
            "b" | "back" => match flow.retreat() {
                Ok(()) => {}
                Err(FlowError::IllegalTransition(e)) => writeln!(output, "Cannot go back: {}", e)?,
                Err(e) => return Err(e.into()),
            },
            "q" | "quit" => return Ok(false),
            other => match other.parse::<usize>() {
                Ok(n) if (1..=screen.entries.len()).contains(&n) => {
                    apply(flow, &screen.entries[n - 1], output)?
                }
                _ => writeln!(output, "Unrecognized choice '{}'.", answer)?,
            },
        }
    }

    Ok(flow.is_completed())
}

/// Picks the pre-selected platform from a browser user agent when one is
/// given, otherwise from the host.
pub(crate) fn seed_detector(user_agent: Option<&str>) -> Box<dyn PlatformDetector> {
    match user_agent {
        Some(ua) => Box::new(UserAgentDetector::new(ua)),
        None => Box::new(HostDetector),
    }
}

/// Run the interactive wizard on the terminal.
#[tracing::instrument(skip(runtime, overrides))]
pub async fn wizard<R: Runtime>(
    runtime: R,
    overrides: ConfigOverrides,
    delivery: Delivery,
    user_agent: Option<String>,
) -> Result<()> {
    let config = Config::load(&runtime, overrides)?;
    let catalog = config.catalog(&runtime)?;
    let history = DownloadHistory::new(&runtime, &config.history_path);
    let queue = TransferQueue::default();
    let detector = seed_detector(user_agent.as_deref());

    let mut flow = DownloadFlow::detect(
        &catalog,
        config.base_url.as_str(),
        Collaborators {
            log: &history,
            navigator: delivery.navigator(&queue),
            celebration: &TerminalCelebration,
        },
        detector.as_ref(),
    );

    // Release stdin before the transfer, which may prompt again
    let completed = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        run_wizard(&mut flow, &mut input, &mut output)?
    };

    match flow.download() {
        Some(download) if completed => {
            deliver(&runtime, &config, delivery, &queue, download).await
        }
        _ => {
            println!("No download selected.");
            Ok(())
        }
    }
}
