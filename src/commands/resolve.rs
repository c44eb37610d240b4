use anyhow::Result;
use log::{debug, warn};

use super::config::{Config, ConfigOverrides};
use super::notify::{SilentCelebration, TerminalCelebration, TransferQueue};
use super::transfer::{Delivery, deliver};
use crate::flow::{Celebration, Collaborators, DownloadFlow};
use crate::history::DownloadHistory;
use crate::platform::{Architecture, PackageType, Platform};
use crate::runtime::Runtime;

/// A complete selection given up front instead of through the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveRequest {
    pub platform: Platform,
    pub architecture: Architecture,
    /// Ignored for MacOS
    pub package_type: Option<PackageType>,
}

fn one_of<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Walk `flow` through every step with the requested values.
///
/// Choices the flow ignores are reported: an architecture the platform does
/// not offer is an error, a package type not offered at this architecture
/// falls back to the platform default with a warning.
pub(crate) fn drive(flow: &mut DownloadFlow<'_>, request: &ResolveRequest) -> Result<()> {
    let platform = request.platform;
    flow.select_platform(platform);
    flow.advance()?;

    flow.select_architecture(request.architecture);
    if flow.pending().architecture != request.architecture {
        anyhow::bail!(
            "{} is not available for {}. Choose one of: {}",
            request.architecture,
            platform,
            one_of(platform.architectures())
        );
    }
    flow.advance()?;

    if flow.is_completed() {
        if let Some(package_type) = request.package_type {
            warn!("{} downloads have no package type; ignoring {}", platform, package_type);
        }
        return Ok(());
    }

    if let Some(package_type) = request.package_type {
        if !platform.supports_package_type(package_type) {
            anyhow::bail!(
                "{} is not available for {}. Choose one of: {}",
                package_type,
                platform,
                one_of(platform.package_types())
            );
        }
        flow.select_package_type(package_type);
        if let Some(pending) = flow.pending().package_type {
            if pending != package_type {
                warn!(
                    "{} is only available for 64-bit; using {} instead",
                    package_type, pending
                );
            }
        }
    }
    flow.advance()?;
    Ok(())
}

/// Resolve a selection given on the command line and deliver it.
#[tracing::instrument(skip(runtime, overrides))]
pub async fn resolve<R: Runtime>(
    runtime: R,
    overrides: ConfigOverrides,
    request: ResolveRequest,
    delivery: Delivery,
) -> Result<()> {
    let config = Config::load(&runtime, overrides)?;
    let catalog = config.catalog(&runtime)?;
    let history = DownloadHistory::new(&runtime, &config.history_path);
    let queue = TransferQueue::default();
    // Keep stdout to the bare URL when printing
    let celebration: &dyn Celebration = match delivery {
        Delivery::Print => &SilentCelebration,
        _ => &TerminalCelebration,
    };

    let mut flow = DownloadFlow::new(
        &catalog,
        config.base_url.as_str(),
        Collaborators {
            log: &history,
            navigator: delivery.navigator(&queue),
            celebration,
        },
        Some(request.platform),
    );
    drive(&mut flow, &request)?;

    let Some(download) = flow.download() else {
        anyhow::bail!("Selection {:?} did not complete", request);
    };
    debug!("Resolved {} to {}", download.target.selection, download.url);
    deliver(&runtime, &config, delivery, &queue, download).await
}
