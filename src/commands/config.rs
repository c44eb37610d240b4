use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use super::paths::{default_history_path, default_output_dir};
use crate::release::{DEFAULT_BASE_URL, ReleaseCatalog};
use crate::runtime::Runtime;

/// Environment variable overriding the download base URL.
pub const BASE_URL_ENV: &str = "ZEN_DL_BASE_URL";

/// Values given on the command line; `None` means use the default.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Release files are served from `<base_url>/<filename>`
    pub base_url: String,
    /// Custom release catalog; the built-in one when `None`
    pub catalog_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub history_path: PathBuf,
}

impl Config {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        let base_url = match overrides.base_url {
            Some(url) => url,
            None => runtime
                .env_var(BASE_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            anyhow::bail!(
                "Invalid base URL '{}'. Expected an http:// or https:// address.",
                base_url
            );
        }

        let output_dir = match overrides.output_dir {
            Some(dir) => dir,
            None => default_output_dir(runtime)?,
        };
        let history_path = match overrides.history_path {
            Some(path) => path,
            None => default_history_path(runtime)?,
        };

        let config = Self {
            base_url,
            catalog_path: overrides.catalog_path,
            output_dir,
            history_path,
        };
        debug!("Using config {:?}", config);
        Ok(config)
    }

    /// Load the configured release catalog, validated.
    pub fn catalog<R: Runtime>(&self, runtime: &R) -> Result<ReleaseCatalog> {
        match &self.catalog_path {
            Some(path) => ReleaseCatalog::load(runtime, path),
            None => ReleaseCatalog::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::{configure_mock_runtime_basics, test_data, test_downloads};
    use mockall::predicate::eq;

    #[test]
    fn test_config_defaults() {
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);

        let config = Config::load(&runtime, ConfigOverrides::default()).unwrap();

        assert_eq!(
            config,
            Config {
                base_url: DEFAULT_BASE_URL.to_string(),
                catalog_path: None,
                output_dir: test_downloads(),
                history_path: test_data().join("zen-dl").join("downloads.jsonl"),
            }
        );
    }

    #[test]
    fn test_config_base_url_from_env() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(BASE_URL_ENV))
            .returning(|_| Ok("https://mirror.example.com/zen".to_string()));
        configure_mock_runtime_basics(&mut runtime);

        let config = Config::load(&runtime, ConfigOverrides::default()).unwrap();

        assert_eq!(config.base_url, "https://mirror.example.com/zen");
    }

    #[test]
    fn test_config_overrides_win() {
        // No expectations: overrides must not consult the runtime
        let runtime = MockRuntime::new();

        let config = Config::load(
            &runtime,
            ConfigOverrides {
                base_url: Some("http://localhost:8080".to_string()),
                catalog_path: Some(PathBuf::from("catalog.json")),
                output_dir: Some(PathBuf::from("out")),
                history_path: Some(PathBuf::from("history.jsonl")),
            },
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.history_path, PathBuf::from("history.jsonl"));
    }

    #[test]
    fn test_config_rejects_non_http_base_url() {
        let runtime = MockRuntime::new();

        let result = Config::load(
            &runtime,
            ConfigOverrides {
                base_url: Some("ftp://example.com".to_string()),
                ..Default::default()
            },
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_builtin_catalog_when_no_path() {
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);
        let config = Config::load(&runtime, ConfigOverrides::default()).unwrap();

        assert_eq!(
            config.catalog(&runtime).unwrap(),
            ReleaseCatalog::builtin().unwrap()
        );
    }
}
