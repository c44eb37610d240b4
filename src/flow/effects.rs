use crate::release::AssetId;

/// Receives the asset id of every completed download.
#[cfg_attr(test, mockall::automock)]
pub trait DownloadLog {
    fn record(&self, asset: &AssetId);
}

/// Starts the transfer of the final download URL.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    fn navigate(&self, url: &str);
}

/// Cosmetic reaction to a completed flow.
#[cfg_attr(test, mockall::automock)]
pub trait Celebration {
    fn celebrate(&self);
}

/// The collaborators a flow notifies when it completes.
///
/// All three are fire-and-forget: implementations report their own
/// failures and never feed anything back into the flow.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub log: &'a dyn DownloadLog,
    pub navigator: &'a dyn Navigator,
    pub celebration: &'a dyn Celebration,
}
