use anyhow::Result;

use super::config::{Config, ConfigOverrides};
use crate::history::DownloadHistory;
use crate::runtime::Runtime;

/// Show recorded downloads, oldest first
#[tracing::instrument(skip(runtime, overrides))]
pub fn history<R: Runtime>(runtime: R, overrides: ConfigOverrides) -> Result<()> {
    let config = Config::load(&runtime, overrides)?;
    let records = DownloadHistory::new(&runtime, &config.history_path).entries()?;

    if records.is_empty() {
        println!("No downloads recorded.");
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {}",
            record.downloaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            record.asset
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::{configure_mock_runtime_basics, test_data};
    use mockall::predicate::eq;

    #[test]
    fn test_history_empty() {
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);
        runtime
            .expect_exists()
            .with(eq(test_data().join("zen-dl").join("downloads.jsonl")))
            .returning(|_| false);

        assert!(history(runtime, ConfigOverrides::default()).is_ok());
    }

    #[test]
    fn test_history_with_records() {
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);
        let path = test_data().join("zen-dl").join("downloads.jsonl");
        runtime.expect_exists().with(eq(path.clone())).returning(|_| true);
        runtime.expect_read_to_string().with(eq(path)).returning(|_| {
            Ok("{\"asset\":\"flatpak\",\"downloaded_at\":\"2024-08-01T12:00:00Z\"}\n".to_string())
        });

        assert!(history(runtime, ConfigOverrides::default()).is_ok());
    }
}
