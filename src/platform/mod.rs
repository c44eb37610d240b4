//! Platform, architecture and package-type model
//!
//! This module defines the three axes a user chooses along when picking a
//! download, the per-platform option sets for each axis, and detectors that
//! supply an initial platform guess.

mod detection;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use detection::{FixedDetector, HostDetector, PlatformDetector, UserAgentDetector};

/// Operating system a build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    #[serde(rename = "macos")]
    MacOS,
}

impl Platform {
    /// All platforms, in display order.
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Linux, Platform::MacOS];

    /// Architectures offered for this platform, in display order.
    pub fn architectures(self) -> &'static [Architecture] {
        match self {
            Platform::Windows | Platform::Linux => &[Architecture::X64, Architecture::X32],
            Platform::MacOS => &[Architecture::Aarch64, Architecture::X64],
        }
    }

    /// Package types offered for this platform, in display order.
    ///
    /// Empty for MacOS: the architecture alone determines the asset.
    pub fn package_types(self) -> &'static [PackageType] {
        match self {
            Platform::Windows => &[PackageType::Installer, PackageType::Portable],
            Platform::Linux => &[
                PackageType::AppImage,
                PackageType::Portable,
                PackageType::Flatpak,
            ],
            Platform::MacOS => &[],
        }
    }

    /// Whether the flow shows a package-type step for this platform.
    pub fn has_package_step(self) -> bool {
        !self.package_types().is_empty()
    }

    /// The package type pre-selected when the package-type step is entered.
    pub fn default_package_type(self) -> Option<PackageType> {
        match self {
            Platform::Windows => Some(PackageType::Installer),
            Platform::Linux => Some(PackageType::Portable),
            Platform::MacOS => None,
        }
    }

    pub fn supports_architecture(self, architecture: Architecture) -> bool {
        self.architectures().contains(&architecture)
    }

    pub fn supports_package_type(self, package_type: PackageType) -> bool {
        self.package_types().contains(&package_type)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
            Platform::MacOS => "MacOS",
        };
        f.write_str(name)
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "windows" | "win" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macos" | "mac" | "darwin" | "osx" => Ok(Platform::MacOS),
            other => anyhow::bail!(
                "Unknown platform '{}'. Expected one of: windows, linux, macos.",
                other
            ),
        }
    }
}

/// CPU architecture, labelled the way users see it.
///
/// The same label can mean different hardware per platform: on MacOS
/// `64-bit` is an Intel Mac and `aarch64` is Apple silicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Architecture {
    #[serde(rename = "64-bit")]
    X64,
    #[serde(rename = "32-bit")]
    X32,
    #[serde(rename = "aarch64")]
    Aarch64,
}

impl Architecture {
    pub fn label(self) -> &'static str {
        match self {
            Architecture::X64 => "64-bit",
            Architecture::X32 => "32-bit",
            Architecture::Aarch64 => "aarch64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Architecture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "64-bit" | "64" | "x64" | "x86_64" | "amd64" | "intel" => Ok(Architecture::X64),
            "32-bit" | "32" | "x32" | "x86" | "i686" | "i386" => Ok(Architecture::X32),
            "aarch64" | "arm64" | "arm" => Ok(Architecture::Aarch64),
            other => anyhow::bail!(
                "Unknown architecture '{}'. Expected one of: 64-bit, 32-bit, aarch64.",
                other
            ),
        }
    }
}

/// Packaging format of a Windows or Linux build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PackageType {
    #[serde(rename = "installer")]
    Installer,
    #[serde(rename = "portable")]
    Portable,
    #[serde(rename = "AppImage")]
    AppImage,
    #[serde(rename = "flatpak")]
    Flatpak,
}

impl PackageType {
    pub fn label(self) -> &'static str {
        match self {
            PackageType::Installer => "installer",
            PackageType::Portable => "portable",
            PackageType::AppImage => "AppImage",
            PackageType::Flatpak => "flatpak",
        }
    }

    /// Flatpak builds only exist for 64-bit.
    pub fn is_available_for(self, architecture: Architecture) -> bool {
        match self {
            PackageType::Flatpak => architecture == Architecture::X64,
            _ => true,
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PackageType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "installer" | "setup" => Ok(PackageType::Installer),
            "portable" | "zip" | "tarball" => Ok(PackageType::Portable),
            "appimage" => Ok(PackageType::AppImage),
            "flatpak" => Ok(PackageType::Flatpak),
            other => anyhow::bail!(
                "Unknown package type '{}'. Expected one of: installer, portable, AppImage, flatpak.",
                other
            ),
        }
    }
}

/// A complete (platform, architecture, package type) choice.
///
/// `package_type` is `None` exactly when the platform has no package step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub platform: Platform,
    pub architecture: Architecture,
    pub package_type: Option<PackageType>,
}

impl Selection {
    /// Every selection the download flow can confirm.
    pub fn reachable() -> Vec<Selection> {
        let mut selections = Vec::new();
        for platform in Platform::ALL {
            for &architecture in platform.architectures() {
                if !platform.has_package_step() {
                    selections.push(Selection {
                        platform,
                        architecture,
                        package_type: None,
                    });
                    continue;
                }
                for &package_type in platform.package_types() {
                    if package_type.is_available_for(architecture) {
                        selections.push(Selection {
                            platform,
                            architecture,
                            package_type: Some(package_type),
                        });
                    }
                }
            }
        }
        selections
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.platform, self.architecture)?;
        if let Some(package_type) = self.package_type {
            write!(f, " {}", package_type)?;
        }
        Ok(())
    }
}
