//! ImageViewer - command line shell over the image viewer backend.
//!
//! Runs the same coordinator the GUI uses, without a GUI: handy for scripts
//! and for exercising the backend on its own.

pub mod cli;
pub mod commands;
pub mod logging;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use imageviewer_core::paths::{AppPathProvider, PathProvider, SharedPathProvider};
use imageviewer_core::SettingsManager;

use cli::Cli;

pub fn run() -> anyhow::Result<()> {
    run_with(Cli::parse())
}

/// Run an already parsed command line.
pub fn run_with(cli: Cli) -> anyhow::Result<()> {
    let path_provider: SharedPathProvider = match &cli.data_dir {
        Some(dir) => Arc::new(AppPathProvider::with_base_dir(dir.clone())),
        None => Arc::new(AppPathProvider::new()),
    };

    let settings = SettingsManager::new(path_provider.as_ref())
        .and_then(|manager| manager.load())
        .context("loading settings")?;

    // Keep the guard alive until exit so buffered log lines are flushed.
    let _log_guard = logging::init(&settings.logging, &path_provider.logs_dir(), cli.verbose)?;

    tracing::info!("ImageViewer starting, data dir {:?}", path_provider.app_data_dir());

    commands::execute(&cli, path_provider, settings)
}
