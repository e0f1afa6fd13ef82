//! Command implementations.

pub mod files;
pub mod operations;

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use imageviewer_core::events::{EventSink, OPERATION_COMPLETE_EVENT};
use imageviewer_core::paths::SharedPathProvider;
use imageviewer_core::{AppSettings, ImageViewerCore};
use parking_lot::Mutex;
use serde::Deserialize;

use crate::cli::{Cli, Commands};

/// Run the parsed command with an initialized environment.
pub fn execute(
    cli: &Cli,
    path_provider: SharedPathProvider,
    settings: AppSettings,
) -> anyhow::Result<()> {
    let timeout_ms = cli.timeout_ms.unwrap_or(settings.operations.drain_timeout_ms);
    let queued = Queued {
        path_provider,
        settings,
        timeout_ms,
    };

    match &cli.command {
        Commands::Rotate(args) => queued.run(|core| operations::rotate(core, args)),
        Commands::Wallpaper(args) => queued.run(|core| operations::wallpaper(core, args)),
        Commands::Trash(args) => queued.run(|core| operations::trash(core, args)),
        Commands::Size(args) => files::size(args),
        Commands::CopyImage(args) => files::copy_image(args),
        Commands::CopyPath(args) => files::copy_path(args),
    }
}

/// Environment for commands that go through the coordinator.
struct Queued {
    path_provider: SharedPathProvider,
    settings: AppSettings,
    timeout_ms: u64,
}

impl Queued {
    /// Submit via `submit`, wait for the coordinator to drain, then report.
    fn run(self, submit: impl FnOnce(&ImageViewerCore)) -> anyhow::Result<()> {
        let log = Arc::new(CompletionLog::default());
        let core = ImageViewerCore::with_settings(self.path_provider, log.clone(), self.settings);

        submit(&core);
        drain(&core, self.timeout_ms)?;
        log.report()
    }
}

/// Wait for every queued operation, honouring `timeout_ms` (0 = no limit).
fn drain(core: &ImageViewerCore, timeout_ms: u64) -> anyhow::Result<()> {
    let coordinator = core.coordinator();
    if timeout_ms == 0 {
        coordinator.wait_until_idle();
        return Ok(());
    }

    if !coordinator.wait_until_idle_timeout(Duration::from_millis(timeout_ms)) {
        bail!(
            "timed out after {} ms with {} operation(s) still running",
            timeout_ms,
            coordinator.in_flight()
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CompletedOperation {
    pub key: String,
    pub kind: String,
    pub success: bool,
}

/// Event sink that prints each completion and remembers it for the summary.
#[derive(Default)]
pub struct CompletionLog {
    completed: Mutex<Vec<CompletedOperation>>,
}

impl CompletionLog {
    pub fn completed(&self) -> Vec<CompletedOperation> {
        self.completed.lock().clone()
    }

    /// Fail when any reported operation failed.
    pub fn report(&self) -> anyhow::Result<()> {
        let completed = self.completed.lock();
        let failed = completed.iter().filter(|op| !op.success).count();
        if failed > 0 {
            bail!("{} of {} operation(s) failed", failed, completed.len());
        }
        Ok(())
    }
}

impl EventSink for CompletionLog {
    fn emit(&self, event_name: &str, payload_json: &str) {
        if event_name != OPERATION_COMPLETE_EVENT {
            tracing::debug!(event = event_name, "Event received");
            return;
        }

        match serde_json::from_str::<CompletedOperation>(payload_json) {
            Ok(op) => {
                println!(
                    "{:<10} {:<6} {}",
                    op.kind,
                    if op.success { "ok" } else { "failed" },
                    op.key
                );
                self.completed.lock().push(op);
            }
            Err(e) => tracing::error!("Malformed completion payload {}: {}", payload_json, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use imageviewer_core::paths::AppPathProvider;
    use tempfile::TempDir;

    fn run(tmp: &TempDir, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["imageviewer"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let provider = Arc::new(AppPathProvider::with_base_dir(tmp.path().join("data")));
        execute(&cli, provider, AppSettings::default())
    }

    #[test]
    fn test_rotate_applies_net_angle() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wide.png");
        image::RgbImage::new(4, 2).save(&path).unwrap();
        let file = path.to_string_lossy().into_owned();

        run(&tmp, &["rotate", &file, "90", "90", "90"]).unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (2, 4));
    }

    #[test]
    fn test_rotate_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("missing.png").to_string_lossy().into_owned();

        let err = run(&tmp, &["rotate", &file, "90"]).unwrap_err();
        assert!(err.to_string().contains("failed"));
    }

    #[test]
    fn test_completion_log_parses_payloads() {
        let log = CompletionLog::default();
        log.emit(OPERATION_COMPLETE_EVENT, r#"{"key":"/a.jpg","kind":"rotation","success":true}"#);
        log.emit("all-operations-complete", "{}");
        assert!(log.report().is_ok());

        log.emit(OPERATION_COMPLETE_EVENT, r#"{"key":"/a.jpg","kind":"trash","success":false}"#);
        assert_eq!(log.completed().len(), 2);
        assert!(log.report().is_err());
    }
}
