use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;

use super::table::{ArchKey, AssetId, FilenameTable, ReleaseKey, ReleaseTable};
use crate::error::{ConfigurationGap, FlowError};
use crate::platform::{Architecture, PackageType, Platform, Selection};
use crate::runtime::Runtime;

/// Where release files are served from unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://github.com/zen-browser/desktop/releases/latest/download";

const BUILTIN_CATALOG: &str = include_str!("releases.json");

/// A reachable selection together with the asset and file it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub selection: Selection,
    pub asset: AssetId,
    pub filename: String,
}

impl ReleaseTarget {
    pub fn url(&self, base_url: &str) -> String {
        download_url(base_url, &self.filename)
    }
}

/// Joins the base URL and a filename with exactly one `/`.
pub fn download_url(base_url: &str, filename: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), filename)
}

/// The release table and filename table, loaded once per process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseCatalog {
    releases: ReleaseTable,
    files: FilenameTable,
}

impl ReleaseCatalog {
    /// Build a catalog without checking coverage.
    ///
    /// Lookups on a catalog built this way may fail with a configuration gap;
    /// call [`ReleaseCatalog::validate`] to find out up front.
    pub fn from_tables(releases: ReleaseTable, files: FilenameTable) -> Self {
        Self { releases, files }
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG).context("Built-in release catalog is invalid")
    }

    /// Parse a catalog and check that every reachable selection resolves.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json).context("Failed to parse release catalog")?;
        catalog.validate()?;
        Ok(catalog)
    }

    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        debug!("Loading release catalog from {:?}", path);
        let json = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read release catalog {:?}", path))?;
        Self::from_json(&json).with_context(|| format!("Invalid release catalog {:?}", path))
    }

    /// Resolve a choice to its asset id.
    ///
    /// The package type is ignored for platforms without a package step.
    pub fn resolve(
        &self,
        platform: Platform,
        architecture: Architecture,
        package_type: Option<PackageType>,
    ) -> Result<AssetId, FlowError> {
        let key = ReleaseKey {
            platform,
            arch: ArchKey::from(architecture),
            package_type: if platform.has_package_step() {
                package_type
            } else {
                None
            },
        };
        self.releases
            .get(&key)
            .cloned()
            .ok_or_else(|| ConfigurationGap::MissingRelease(key).into())
    }

    pub fn lookup_filename(&self, asset: &AssetId) -> Result<&str, FlowError> {
        self.files
            .get(asset)
            .ok_or_else(|| ConfigurationGap::MissingFilename(asset.clone()).into())
    }

    /// Resolve a selection all the way to its filename.
    pub fn target(&self, selection: &Selection) -> Result<ReleaseTarget, FlowError> {
        let asset = self.resolve(
            selection.platform,
            selection.architecture,
            selection.package_type,
        )?;
        let filename = self.lookup_filename(&asset)?.to_string();
        Ok(ReleaseTarget {
            selection: *selection,
            asset,
            filename,
        })
    }

    /// Every reachable selection, resolved.
    pub fn targets(&self) -> Result<Vec<ReleaseTarget>, FlowError> {
        Selection::reachable()
            .iter()
            .map(|selection| self.target(selection))
            .collect()
    }

    /// Fails with the first reachable selection that does not resolve.
    pub fn validate(&self) -> Result<(), FlowError> {
        self.targets().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    fn builtin() -> ReleaseCatalog {
        ReleaseCatalog::builtin().unwrap()
    }

    #[test]
    fn test_builtin_covers_every_reachable_selection() {
        let catalog = builtin();

        for selection in Selection::reachable() {
            let asset = catalog
                .resolve(
                    selection.platform,
                    selection.architecture,
                    selection.package_type,
                )
                .unwrap_or_else(|e| panic!("{} does not resolve: {}", selection, e));
            let filename = catalog
                .lookup_filename(&asset)
                .unwrap_or_else(|e| panic!("{} has no filename: {}", asset, e));
            assert!(!filename.is_empty());
        }
    }

    #[test]
    fn test_builtin_targets_are_distinct() {
        let targets = builtin().targets().unwrap();
        let mut filenames: Vec<_> = targets.iter().map(|t| t.filename.as_str()).collect();
        filenames.sort();
        filenames.dedup();
        assert_eq!(filenames.len(), targets.len());
    }

    #[test]
    fn test_resolve_windows_64_installer() {
        let catalog = builtin();

        let asset = catalog
            .resolve(
                Platform::Windows,
                Architecture::X64,
                Some(PackageType::Installer),
            )
            .unwrap();

        assert_eq!(asset.as_str(), "WindowsInstaller-specific");
        assert_eq!(catalog.lookup_filename(&asset).unwrap(), "zen.installer.exe");
    }

    #[test]
    fn test_resolve_macos_ignores_package_type() {
        let catalog = builtin();

        let with = catalog
            .resolve(
                Platform::MacOS,
                Architecture::Aarch64,
                Some(PackageType::Installer),
            )
            .unwrap();
        let without = catalog
            .resolve(Platform::MacOS, Architecture::Aarch64, None)
            .unwrap();

        assert_eq!(with, without);
        assert_eq!(with.as_str(), "macos-aarch64");
    }

    #[test]
    fn test_resolve_unreachable_triple_is_a_gap() {
        let err = builtin()
            .resolve(
                Platform::Linux,
                Architecture::X32,
                Some(PackageType::Flatpak),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            FlowError::ConfigurationGap(ConfigurationGap::MissingRelease(_))
        ));
    }

    #[test]
    fn test_lookup_unknown_asset_is_a_gap() {
        let err = builtin()
            .lookup_filename(&AssetId::new("nope"))
            .unwrap_err();

        assert_eq!(
            err,
            FlowError::ConfigurationGap(ConfigurationGap::MissingFilename(AssetId::new("nope")))
        );
    }

    #[test]
    fn test_from_json_rejects_missing_release() {
        let json = r#"{
            "releases": { "macos": { "arm": "macos-aarch64", "x64": "macos-x64" } },
            "files": { "macos-aarch64": "a.dmg", "macos-x64": "b.dmg" }
        }"#;

        let err = ReleaseCatalog::from_json(json).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FlowError>(),
            Some(FlowError::ConfigurationGap(ConfigurationGap::MissingRelease(_)))
        ));
    }

    #[test]
    fn test_from_json_rejects_missing_filename() {
        let mut value: serde_json::Value = serde_json::from_str(BUILTIN_CATALOG).unwrap();
        value["files"]
            .as_object_mut()
            .unwrap()
            .remove("linux-generic");

        let err = ReleaseCatalog::from_json(&value.to_string()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<FlowError>(),
            Some(&FlowError::ConfigurationGap(
                ConfigurationGap::MissingFilename(AssetId::new("linux-generic"))
            ))
        );
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(ReleaseCatalog::from_json("{").is_err());
        assert!(ReleaseCatalog::from_json(r#"{ "releases": {} }"#).is_err());
    }

    #[test]
    fn test_load_reads_through_runtime() {
        // --- Setup ---
        let path = PathBuf::from("/etc/zen-dl/catalog.json");
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(path.clone()))
            .returning(|_| Ok(BUILTIN_CATALOG.to_string()));

        // --- Execute ---
        let catalog = ReleaseCatalog::load(&runtime, &path).unwrap();

        // --- Verify ---
        assert_eq!(catalog, builtin());
    }

    #[test]
    fn test_download_url_joins_with_single_slash() {
        assert_eq!(
            download_url("https://example.com/download", "zen.installer.exe"),
            "https://example.com/download/zen.installer.exe"
        );
        assert_eq!(
            download_url("https://example.com/download/", "zen.installer.exe"),
            "https://example.com/download/zen.installer.exe"
        );
    }
}
