use super::{DownloadFlow, Step};
use crate::platform::{Architecture, PackageType, Platform, Selection};

/// One option of the current step, as a UI would render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice<T> {
    pub value: T,
    /// Currently pending
    pub selected: bool,
    /// Selecting it would take effect
    pub enabled: bool,
}

/// What the current step asks the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepView {
    Platform {
        choices: Vec<Choice<Platform>>,
    },
    Architecture {
        platform: Platform,
        choices: Vec<Choice<Architecture>>,
    },
    PackageType {
        platform: Platform,
        architecture: Architecture,
        choices: Vec<Choice<PackageType>>,
    },
    Finished {
        selection: Selection,
    },
}

impl DownloadFlow<'_> {
    pub fn view(&self) -> StepView {
        let pending = self.pending();
        match self.step() {
            Step::ChoosingPlatform => StepView::Platform {
                choices: Platform::ALL
                    .iter()
                    .map(|&value| Choice {
                        value,
                        selected: pending.platform == Some(value),
                        enabled: true,
                    })
                    .collect(),
            },
            Step::ChoosingArchitecture { platform } => StepView::Architecture {
                platform,
                choices: platform
                    .architectures()
                    .iter()
                    .map(|&value| Choice {
                        value,
                        selected: pending.architecture == value,
                        enabled: true,
                    })
                    .collect(),
            },
            Step::ChoosingPackageType {
                platform,
                architecture,
            } => StepView::PackageType {
                platform,
                architecture,
                choices: platform
                    .package_types()
                    .iter()
                    .map(|&value| Choice {
                        value,
                        selected: pending.package_type == Some(value),
                        enabled: value.is_available_for(architecture),
                    })
                    .collect(),
            },
            Step::Done { selection } => StepView::Finished { selection },
        }
    }
}
