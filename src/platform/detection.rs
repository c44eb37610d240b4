use log::debug;

use super::Platform;

/// Trait for default-platform detection (useful for testing)
///
/// The result only seeds the pending platform; the user can always
/// override it before the first step is confirmed.
pub trait PlatformDetector {
    fn detect(&self) -> Option<Platform>;
}

/// Detects the platform this binary was compiled for
pub struct HostDetector;

impl PlatformDetector for HostDetector {
    fn detect(&self) -> Option<Platform> {
        #[cfg(target_os = "windows")]
        {
            Some(Platform::Windows)
        }
        #[cfg(target_os = "macos")]
        {
            Some(Platform::MacOS)
        }
        #[cfg(target_os = "linux")]
        {
            Some(Platform::Linux)
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            debug!("No default platform for {}", std::env::consts::OS);
            None
        }
    }
}

/// Guesses the platform from a browser user-agent string
pub struct UserAgentDetector {
    user_agent: String,
}

impl UserAgentDetector {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl PlatformDetector for UserAgentDetector {
    fn detect(&self) -> Option<Platform> {
        // Order matters: Android agents contain "Linux", Mac agents never contain "Win".
        let ua = self.user_agent.as_str();
        let platform = if ua.contains("Win") {
            Some(Platform::Windows)
        } else if ua.contains("Mac") {
            Some(Platform::MacOS)
        } else if ua.contains("Linux") {
            Some(Platform::Linux)
        } else {
            None
        };
        debug!("User agent {:?} detected as {:?}", ua, platform);
        platform
    }
}

/// Always yields the configured value (including no guess)
pub struct FixedDetector(pub Option<Platform>);

impl PlatformDetector for FixedDetector {
    fn detect(&self) -> Option<Platform> {
        self.0
    }
}
