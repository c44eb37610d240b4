//! Download selection flow
//!
//! A small wizard: the user picks a platform, then an architecture, then
//! (Windows and Linux only) a package type. Each step has a *pending* value
//! the user adjusts freely and a *confirmed* value locked in when the flow
//! advances past that step. When the last step is confirmed the selection is
//! resolved against the [`ReleaseCatalog`] and the collaborators are notified
//! exactly once.
//!
//! The flow is an owned value with no global state; every transition is a
//! synchronous method call.

mod effects;
mod view;

use log::{debug, info};

use crate::error::{FlowError, IllegalTransition};
use crate::platform::{Architecture, PackageType, Platform, PlatformDetector, Selection};
use crate::release::{ReleaseCatalog, ReleaseTarget, download_url};

pub use effects::{Celebration, Collaborators, DownloadLog, Navigator};
pub use view::{Choice, StepView};

#[cfg(test)]
pub use effects::{MockCelebration, MockDownloadLog, MockNavigator};

/// Where the flow currently is.
///
/// Confirmed values live inside the variants, so a step can never hold a
/// confirmation it has not reached yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ChoosingPlatform,
    ChoosingArchitecture {
        platform: Platform,
    },
    ChoosingPackageType {
        platform: Platform,
        architecture: Architecture,
    },
    Done {
        selection: Selection,
    },
}

/// Values the user is currently adjusting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    pub platform: Option<Platform>,
    pub architecture: Architecture,
    pub package_type: Option<PackageType>,
}

impl Pending {
    fn seeded(platform: Option<Platform>) -> Self {
        Self {
            platform,
            architecture: Architecture::X64,
            package_type: platform.and_then(Platform::default_package_type),
        }
    }

    /// Replace values the platform does not offer with its defaults.
    fn fit_to(&mut self, platform: Platform) {
        if !platform.supports_architecture(self.architecture) {
            self.architecture = Architecture::X64;
        }
        let keep = self.package_type.is_some_and(|package_type| {
            platform.supports_package_type(package_type)
                && package_type.is_available_for(self.architecture)
        });
        if !keep {
            self.package_type = platform.default_package_type();
        }
    }
}

/// The outcome of a completed flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub target: ReleaseTarget,
    pub url: String,
}

pub struct DownloadFlow<'a> {
    catalog: &'a ReleaseCatalog,
    base_url: String,
    effects: Collaborators<'a>,
    step: Step,
    pending: Pending,
    download: Option<Download>,
}

impl<'a> DownloadFlow<'a> {
    /// Start a flow with `seed` as the pending platform.
    pub fn new(
        catalog: &'a ReleaseCatalog,
        base_url: impl Into<String>,
        effects: Collaborators<'a>,
        seed: Option<Platform>,
    ) -> Self {
        debug!("Starting download flow with platform seed {:?}", seed);
        Self {
            catalog,
            base_url: base_url.into(),
            effects,
            step: Step::ChoosingPlatform,
            pending: Pending::seeded(seed),
            download: None,
        }
    }

    /// Start a flow seeded by a platform detector.
    pub fn detect(
        catalog: &'a ReleaseCatalog,
        base_url: impl Into<String>,
        effects: Collaborators<'a>,
        detector: &dyn PlatformDetector,
    ) -> Self {
        Self::new(catalog, base_url, effects, detector.detect())
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Position in the wizard: 0 platform, 1 architecture, 2 package type.
    ///
    /// A completed flow sits one past its last step (2 for MacOS, 3 otherwise).
    pub fn step_index(&self) -> usize {
        match self.step {
            Step::ChoosingPlatform => 0,
            Step::ChoosingArchitecture { .. } => 1,
            Step::ChoosingPackageType { .. } => 2,
            Step::Done { selection } if selection.platform.has_package_step() => 3,
            Step::Done { .. } => 2,
        }
    }

    pub fn pending(&self) -> Pending {
        self.pending
    }

    pub fn confirmed_platform(&self) -> Option<Platform> {
        match self.step {
            Step::ChoosingPlatform => None,
            Step::ChoosingArchitecture { platform } | Step::ChoosingPackageType { platform, .. } => {
                Some(platform)
            }
            Step::Done { selection } => Some(selection.platform),
        }
    }

    pub fn confirmed_architecture(&self) -> Option<Architecture> {
        match self.step {
            Step::ChoosingPlatform | Step::ChoosingArchitecture { .. } => None,
            Step::ChoosingPackageType { architecture, .. } => Some(architecture),
            Step::Done { selection } => Some(selection.architecture),
        }
    }

    pub fn confirmed_package_type(&self) -> Option<PackageType> {
        match self.step {
            Step::Done { selection } => selection.package_type,
            _ => None,
        }
    }

    /// True once a release target has been resolved and handed off.
    pub fn is_completed(&self) -> bool {
        self.download.is_some()
    }

    pub fn download(&self) -> Option<&Download> {
        self.download.as_ref()
    }

    /// Whether [`DownloadFlow::advance`] would do anything.
    pub fn can_advance(&self) -> bool {
        !matches!(self.step, Step::Done { .. }) && self.pending.platform.is_some()
    }

    pub fn can_retreat(&self) -> bool {
        self.step != Step::ChoosingPlatform
    }

    /// Whether advancing from the current step completes the flow.
    pub fn is_final_step(&self) -> bool {
        match self.step {
            Step::ChoosingArchitecture { platform } => !platform.has_package_step(),
            Step::ChoosingPackageType { .. } => true,
            _ => false,
        }
    }

    /// The platform pending selections are checked against.
    fn context_platform(&self) -> Option<Platform> {
        self.confirmed_platform().or(self.pending.platform)
    }

    /// Set the pending platform. Returns whether anything changed.
    pub fn select_platform(&mut self, platform: Platform) -> bool {
        if self.pending.platform == Some(platform) {
            return false;
        }
        self.pending.platform = Some(platform);
        // Once a platform is confirmed, the other pending values belong to it.
        if self.confirmed_platform().is_none() {
            self.pending.fit_to(platform);
        }
        true
    }

    /// Set the pending architecture. Returns whether anything changed.
    ///
    /// Architectures the platform does not offer are ignored. Switching to an
    /// architecture the pending package type is not built for falls back to
    /// the platform's default package type.
    pub fn select_architecture(&mut self, architecture: Architecture) -> bool {
        let platform = self.context_platform();
        if platform.is_some_and(|p| !p.supports_architecture(architecture)) {
            debug!("Ignoring {} for {:?}", architecture, platform);
            return false;
        }
        if self.pending.architecture == architecture {
            return false;
        }
        self.pending.architecture = architecture;
        if self
            .pending
            .package_type
            .is_some_and(|package_type| !package_type.is_available_for(architecture))
        {
            self.pending.package_type = platform.and_then(Platform::default_package_type);
        }
        true
    }

    /// Set the pending package type. Returns whether anything changed.
    ///
    /// Package types the platform does not offer, or that are not built for
    /// the chosen architecture (flatpak on 32-bit), are ignored.
    pub fn select_package_type(&mut self, package_type: PackageType) -> bool {
        let Some(platform) = self.context_platform() else {
            return false;
        };
        if !platform.supports_package_type(package_type) {
            debug!("Ignoring {} for {}", package_type, platform);
            return false;
        }
        let unavailable = !package_type.is_available_for(self.pending.architecture)
            || self
                .confirmed_architecture()
                .is_some_and(|architecture| !package_type.is_available_for(architecture));
        if unavailable {
            debug!(
                "Ignoring {} for {} {}",
                package_type, platform, self.pending.architecture
            );
            return false;
        }
        if self.pending.package_type == Some(package_type) {
            return false;
        }
        self.pending.package_type = Some(package_type);
        true
    }

    /// Confirm the current step.
    ///
    /// Confirming the last step resolves the selection and notifies the
    /// collaborators. If resolution fails the flow is left exactly as it was
    /// and nothing is notified. Advancing at the final step does nothing.
    ///
    /// After stepping back out of a completed flow, confirming the last step
    /// again re-resolves the selection but notifies nobody: the collaborators
    /// hear about a flow at most once.
    #[tracing::instrument(skip(self))]
    pub fn advance(&mut self) -> Result<(), FlowError> {
        match self.step {
            Step::ChoosingPlatform => self.advance_from_platform(),
            Step::ChoosingArchitecture { platform } => self.advance_from_architecture(platform),
            Step::ChoosingPackageType {
                platform,
                architecture,
            } => self.advance_from_package_type(platform, architecture),
            Step::Done { .. } => {
                debug!("Flow already at its final step; ignoring advance");
                Ok(())
            }
        }
    }

    fn advance_from_platform(&mut self) -> Result<(), FlowError> {
        let platform = self
            .pending
            .platform
            .ok_or(IllegalTransition::NoPlatformSelected)?;
        self.pending.fit_to(platform);
        debug!("Platform confirmed: {}", platform);
        self.step = Step::ChoosingArchitecture { platform };
        Ok(())
    }

    fn advance_from_architecture(&mut self, platform: Platform) -> Result<(), FlowError> {
        self.pending.fit_to(platform);
        let architecture = self.pending.architecture;
        debug!("Architecture confirmed: {}", architecture);

        if platform.has_package_step() {
            self.step = Step::ChoosingPackageType {
                platform,
                architecture,
            };
            return Ok(());
        }

        self.complete(Selection {
            platform,
            architecture,
            package_type: self.pending.package_type,
        })
    }

    fn advance_from_package_type(
        &mut self,
        platform: Platform,
        architecture: Architecture,
    ) -> Result<(), FlowError> {
        let package_type = self
            .pending
            .package_type
            .or_else(|| platform.default_package_type());
        self.complete(Selection {
            platform,
            architecture,
            package_type,
        })
    }

    fn complete(&mut self, selection: Selection) -> Result<(), FlowError> {
        let target = self.catalog.target(&selection)?;
        let url = download_url(&self.base_url, &target.filename);
        info!("Resolved {} to {} ({})", selection, target.asset, url);

        self.step = Step::Done { selection };
        if self.download.is_none() {
            self.effects.log.record(&target.asset);
            self.effects.navigator.navigate(&url);
            self.effects.celebration.celebrate();
        } else {
            debug!("Completed again; collaborators already notified");
        }
        self.download = Some(Download { target, url });
        Ok(())
    }

    /// Undo the most recent confirmation.
    ///
    /// Leaving the package-type confirmation also resets the pending package
    /// type to the platform default. At the first step this is rejected and
    /// nothing changes.
    #[tracing::instrument(skip(self))]
    pub fn retreat(&mut self) -> Result<(), FlowError> {
        self.step = match self.step {
            Step::ChoosingPlatform => return Err(IllegalTransition::AtFirstStep.into()),
            Step::ChoosingArchitecture { .. } => Step::ChoosingPlatform,
            Step::ChoosingPackageType { platform, .. } => Step::ChoosingArchitecture { platform },
            Step::Done { selection } if selection.platform.has_package_step() => {
                self.pending.package_type = selection.platform.default_package_type();
                Step::ChoosingPackageType {
                    platform: selection.platform,
                    architecture: selection.architecture,
                }
            }
            Step::Done { selection } => Step::ChoosingArchitecture {
                platform: selection.platform,
            },
        };
        debug!("Stepped back to {:?}", self.step);
        Ok(())
    }
}
