use std::io::Write;
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::{cursor::MoveTo, execute, terminal::Clear, terminal::ClearType};
use notify::{EventKind, RecursiveMode, Watcher};

use crate::cli::{self, OutputFormat};
use crate::config;
use crate::cost::compute_costs;
use crate::output;

pub fn run(cli: &cli::Cli, interval: u64) -> Result<()> {
    let path = match &cli.config {
        Some(p) => p.clone(),
        None => config::default_config_path().context("no config directory on this platform")?,
    };
    // Editors often replace the file instead of writing in place, so watch
    // the directory and filter for our file.
    let Some(dir) = path.parent().map(Path::to_path_buf) else {
        bail!("{} has no parent directory", path.display());
    };
    if !dir.is_dir() {
        bail!("config directory {} does not exist", dir.display());
    }

    let interval = Duration::from_secs(interval);
    let columns = cli::resolve_columns(cli.columns.clone());

    render(cli, &path, &columns)?;

    let (tx, rx) = mpsc::channel();
    let target = path.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            if is_relevant(&event, &target) {
                let _ = tx.send(());
            }
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::info!(path = %path.display(), "watching config for changes");

    // Event loop with debounce
    while let Ok(()) = rx.recv() {
        let deadline = Instant::now() + interval;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match rx.recv_timeout(remaining) {
                Ok(()) => continue,
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }

        if let Err(e) = render(cli, &path, &columns) {
            // Keep the last good output on screen until the file is fixed.
            tracing::warn!("{e:#}");
        }
    }

    Ok(())
}

/// True when the event creates, changes or removes the watched file.
fn is_relevant(event: &notify::Event, target: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event
        .paths
        .iter()
        .any(|p| p.file_name() == target.file_name())
}

fn render(cli: &cli::Cli, path: &Path, columns: &[String]) -> Result<()> {
    let config = config::read_config(path)?.unwrap_or_default();
    let settings = cli.resolve(&config)?;
    let result = compute_costs(&settings.inputs, &settings.rates);
    tracing::debug!(inputs = ?settings.inputs, active_days = result.active_days, "recomputed");

    let mut out = std::io::stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    match cli.format {
        OutputFormat::Json => output::print_json(&settings, &result),
        OutputFormat::Table => output::print_compare(&settings, &result, columns),
    }
    out.flush()?;

    Ok(())
}
