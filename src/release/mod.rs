//! Release resolution
//!
//! Maps a confirmed (platform, architecture, package type) choice to a
//! release asset identifier, and an asset identifier to the filename that is
//! appended to the download base URL.

mod catalog;
mod table;

pub use catalog::{DEFAULT_BASE_URL, ReleaseCatalog, ReleaseTarget, download_url};
pub use table::{ArchEntry, ArchKey, AssetId, FilenameTable, ReleaseKey, ReleaseTable};
