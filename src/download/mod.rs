use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Path a download is streamed to before it is moved into place.
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Downloads `url` to `dest` through a `.part` file with retry support.
///
/// `dest` only ever appears complete; a failed download leaves no partial
/// file behind.
#[tracing::instrument(skip(runtime, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    dest: &Path,
    http_client: &HttpClient,
) -> Result<u64> {
    info!("Downloading file from {}...", url);

    let temp_path = partial_path(dest);
    let result = http_client
        .download_file(url, || {
            runtime
                .create_file(&temp_path)
                .with_context(|| format!("Failed to create temporary file at {:?}", temp_path))
        })
        .await;

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            if runtime.exists(&temp_path) {
                if let Err(cleanup) = runtime.remove_file(&temp_path) {
                    warn!("Failed to remove partial download {:?}: {}", temp_path, cleanup);
                }
            }
            return Err(e);
        }
    };

    runtime
        .rename(&temp_path, dest)
        .with_context(|| format!("Failed to move download into place at {:?}", dest))?;

    info!("Download complete.");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use reqwest::Client;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/tmp/zen.installer.exe")),
            PathBuf::from("/tmp/zen.installer.exe.part")
        );
    }

    #[tokio::test]
    async fn test_download_file() {
        // --- Setup Mock Server ---
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/zen.win-generic.zip")
            .with_status(200)
            .with_body("test content")
            .create_async()
            .await;

        // --- Setup Runtime ---
        let mut runtime = MockRuntime::new();

        // Create file: .part -> returns sink (discards content)
        runtime
            .expect_create_file()
            .with(eq(PathBuf::from("out/zen.win-generic.zip.part")))
            .returning(|_| Ok(Box::new(std::io::sink())));

        // Rename: .part -> final
        runtime
            .expect_rename()
            .with(
                eq(PathBuf::from("out/zen.win-generic.zip.part")),
                eq(PathBuf::from("out/zen.win-generic.zip")),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        // --- Execute ---
        let http_client = HttpClient::new(Client::new());
        let result = download_file(
            &runtime,
            &format!("{}/zen.win-generic.zip", url),
            Path::new("out/zen.win-generic.zip"),
            &http_client,
        )
        .await;

        // --- Verify ---
        mock.assert_async().await;
        assert_eq!(result.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_download_file_not_found() {
        // --- Setup Mock Server ---
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/zen.flatpak")
            .with_status(404)
            .create_async()
            .await;

        // --- Setup Runtime ---
        // No partial file was created, so nothing to clean up
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("out/zen.flatpak.part")))
            .returning(|_| false);

        // --- Execute ---
        let http_client = HttpClient::new(Client::new());
        let result = download_file(
            &runtime,
            &format!("{}/zen.flatpak", url),
            Path::new("out/zen.flatpak"),
            &http_client,
        )
        .await;

        // --- Verify ---
        mock.assert_async().await;
        assert!(result.is_err());
    }
}
