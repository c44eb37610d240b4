use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use super::config::Config;
use super::notify::{BrowserNavigator, PrintNavigator, TransferQueue, macos_install_hint};
use crate::download::download_file;
use crate::flow::{Download, Navigator};
use crate::http::HttpClient;
use crate::platform::Platform;
use crate::runtime::Runtime;

/// What happens to the final URL once a flow completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Fetch the file into the output directory
    Download { assume_yes: bool },
    /// Open the URL in the system browser
    Browser,
    /// Print the URL to stdout
    Print,
}

impl Delivery {
    pub(crate) fn navigator<'a>(&self, queue: &'a TransferQueue) -> &'a dyn Navigator {
        match self {
            Delivery::Download { .. } => queue,
            Delivery::Browser => &BrowserNavigator,
            Delivery::Print => &PrintNavigator,
        }
    }
}

/// Finish a completed flow: show install notes and run any queued transfer.
pub(crate) async fn deliver<R: Runtime>(
    runtime: &R,
    config: &Config,
    delivery: Delivery,
    queue: &TransferQueue,
    download: &Download,
) -> Result<()> {
    if delivery != Delivery::Print && download.target.selection.platform == Platform::MacOS {
        println!("{}", macos_install_hint());
    }

    let Delivery::Download { assume_yes } = delivery else {
        return Ok(());
    };
    let Some(url) = queue.take() else {
        debug!("Nothing queued for transfer");
        return Ok(());
    };

    let client = HttpClient::build()?;
    if let Some(path) = fetch(runtime, &client, &url, &config.output_dir, assume_yes).await? {
        println!("Saved to {}", path.display());
    }
    Ok(())
}

/// Download `url` into `output_dir` under its own file name.
///
/// Returns `None` when the user declines to overwrite an existing file.
#[tracing::instrument(skip(runtime, client))]
pub async fn fetch<R: Runtime>(
    runtime: &R,
    client: &HttpClient,
    url: &str,
    output_dir: &Path,
    assume_yes: bool,
) -> Result<Option<PathBuf>> {
    let filename = url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .with_context(|| format!("Download URL {} has no file name", url))?;

    if !runtime.exists(output_dir) {
        runtime
            .create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;
    }

    let dest = output_dir.join(filename);
    if runtime.exists(&dest)
        && !assume_yes
        && !runtime.confirm(&format!("{} already exists. Overwrite?", dest.display()))?
    {
        println!("Skipped download.");
        return Ok(None);
    }

    let bytes = download_file(runtime, url, &dest, client).await?;
    debug!("Wrote {} bytes to {:?}", bytes, dest);
    Ok(Some(dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use reqwest::Client;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fetch_writes_into_new_output_dir() {
        // --- Setup ---
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/zen.linux-generic.tar.bz2")
            .with_status(200)
            .with_body("zen archive")
            .create_async()
            .await;
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("downloads");
        let client = HttpClient::new(Client::new());

        // --- Execute ---
        let result = fetch(
            &RealRuntime,
            &client,
            &format!("{}/zen.linux-generic.tar.bz2", server.url()),
            &output_dir,
            false,
        )
        .await
        .unwrap();

        // --- Verify ---
        mock.assert_async().await;
        let dest = output_dir.join("zen.linux-generic.tar.bz2");
        assert_eq!(result, Some(dest.clone()));
        assert_eq!(std::fs::read_to_string(dest).unwrap(), "zen archive");
    }

    #[tokio::test]
    async fn test_fetch_declined_overwrite_skips_request() {
        // --- Setup ---
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/zen.flatpak")
            .expect(0)
            .create_async()
            .await;

        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("out")))
            .returning(|_| true);
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("out").join("zen.flatpak")))
            .returning(|_| true);
        runtime.expect_confirm().times(1).returning(|_| Ok(false));

        // --- Execute ---
        let result = fetch(
            &runtime,
            &HttpClient::new(Client::new()),
            &format!("{}/zen.flatpak", server.url()),
            Path::new("out"),
            false,
        )
        .await
        .unwrap();

        // --- Verify ---
        assert_eq!(result, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_assume_yes_overwrites() {
        // --- Setup ---
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/zen.macos-x64.dmg")
            .with_status(200)
            .with_body("new")
            .create_async()
            .await;
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("zen.macos-x64.dmg"), "old").unwrap();

        // --- Execute ---
        // RealRuntime would block on stdin if it asked
        let result = fetch(
            &RealRuntime,
            &HttpClient::new(Client::new()),
            &format!("{}/zen.macos-x64.dmg", server.url()),
            dir.path(),
            true,
        )
        .await
        .unwrap();

        // --- Verify ---
        mock.assert_async().await;
        assert!(result.is_some());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("zen.macos-x64.dmg")).unwrap(),
            "new"
        );
        assert!(!dir.path().join("zen.macos-x64.dmg.part").exists());
    }

    #[tokio::test]
    async fn test_fetch_rejects_url_without_file_name() {
        let runtime = MockRuntime::new();

        let result = fetch(
            &runtime,
            &HttpClient::new(Client::new()),
            "https://example.com/download/",
            Path::new("out"),
            true,
        )
        .await;

        assert!(result.is_err());
    }
}
