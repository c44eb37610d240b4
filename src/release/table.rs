use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::platform::{Architecture, PackageType, Platform};

/// Opaque key identifying one distributable build artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Table-lookup key for an architecture.
///
/// Shared by every platform: 64-bit is `x64`, aarch64 is `arm` and
/// 32-bit takes the remaining `x32` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchKey {
    X64,
    Arm,
    X32,
}

impl From<Architecture> for ArchKey {
    fn from(architecture: Architecture) -> Self {
        match architecture {
            Architecture::X64 => ArchKey::X64,
            Architecture::Aarch64 => ArchKey::Arm,
            Architecture::X32 => ArchKey::X32,
        }
    }
}

impl fmt::Display for ArchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            ArchKey::X64 => "x64",
            ArchKey::Arm => "arm",
            ArchKey::X32 => "x32",
        };
        f.write_str(key)
    }
}

/// Composite lookup key into a [`ReleaseTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReleaseKey {
    pub platform: Platform,
    pub arch: ArchKey,
    pub package_type: Option<PackageType>,
}

impl fmt::Display for ReleaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let platform = match self.platform {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::MacOS => "macos",
        };
        write!(f, "{}/{}", platform, self.arch)?;
        if let Some(package_type) = self.package_type {
            write!(f, "/{}", package_type)?;
        }
        Ok(())
    }
}

/// What an architecture slot holds: an asset directly (MacOS), or one
/// asset per package type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArchEntry {
    Asset(AssetId),
    ByPackage(BTreeMap<PackageType, AssetId>),
}

/// Platform → architecture key → (asset | package type → asset).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ReleaseTable(BTreeMap<Platform, BTreeMap<ArchKey, ArchEntry>>);

impl ReleaseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ReleaseKey) -> Option<&AssetId> {
        let entry = self.0.get(&key.platform)?.get(&key.arch)?;
        match (entry, key.package_type) {
            (ArchEntry::Asset(asset), None) => Some(asset),
            (ArchEntry::ByPackage(by_package), Some(package_type)) => by_package.get(&package_type),
            _ => None,
        }
    }

    /// Insert an asset, replacing whatever shape the slot had before.
    pub fn insert(&mut self, key: ReleaseKey, asset: AssetId) {
        let archs = self.0.entry(key.platform).or_default();
        match key.package_type {
            None => {
                archs.insert(key.arch, ArchEntry::Asset(asset));
            }
            Some(package_type) => {
                let entry = archs
                    .entry(key.arch)
                    .or_insert_with(|| ArchEntry::ByPackage(BTreeMap::new()));
                if let ArchEntry::Asset(_) = entry {
                    *entry = ArchEntry::ByPackage(BTreeMap::new());
                }
                if let ArchEntry::ByPackage(by_package) = entry {
                    by_package.insert(package_type, asset);
                }
            }
        }
    }
}

/// Asset id → filename.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FilenameTable(BTreeMap<AssetId, String>);

impl FilenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, asset: &AssetId) -> Option<&str> {
        self.0.get(asset).map(String::as_str)
    }

    pub fn insert(&mut self, asset: AssetId, filename: impl Into<String>) {
        self.0.insert(asset, filename.into());
    }
}
