//! Errors raised by the download flow and the release resolver.

use thiserror::Error;

use crate::release::{AssetId, ReleaseKey};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The static release configuration has no entry for a reachable choice.
    #[error("Configuration gap: {0}")]
    ConfigurationGap(#[from] ConfigurationGap),

    /// The flow was asked to move somewhere it cannot go.
    #[error("Illegal transition: {0}")]
    IllegalTransition(#[from] IllegalTransition),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationGap {
    #[error("no release configured for {0}")]
    MissingRelease(ReleaseKey),

    #[error("no filename configured for asset '{0}'")]
    MissingFilename(AssetId),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalTransition {
    #[error("cannot continue before a platform is selected")]
    NoPlatformSelected,

    #[error("already at the first step")]
    AtFirstStep,
}
