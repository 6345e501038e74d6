//! Loop snapshots persisted as pretty JSON files.

use std::path::{Path, PathBuf};

use handlescan_scraper::{DiagnosticSink, LoopSnapshot};

/// Writes each snapshot to `{dir}/{handle}-{label}-{iteration}.json`.
///
/// Writes are synchronous `std::fs` calls made from inside the extraction
/// loop. A snapshot is a few kilobytes and is only taken every
/// `snapshot_every` iterations, between delays of hundreds of milliseconds,
/// so the loop does not hand them to a blocking pool.
#[derive(Debug, Clone)]
pub(crate) struct JsonFileSink {
    dir: PathBuf,
    handle: String,
}

impl JsonFileSink {
    pub(crate) fn new(dir: &Path, handle: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            handle: handle.to_owned(),
        }
    }

    pub(crate) fn path_for(&self, snapshot: &LoopSnapshot) -> PathBuf {
        self.dir.join(format!(
            "{}-{}-{:04}.json",
            file_safe(&self.handle),
            file_safe(&snapshot.label),
            snapshot.iteration
        ))
    }
}

impl DiagnosticSink for JsonFileSink {
    fn record(&self, snapshot: &LoopSnapshot) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_vec_pretty(snapshot).map_err(std::io::Error::other)?;
        let path = self.path_for(snapshot);
        std::fs::write(&path, body)?;
        tracing::debug!(path = %path.display(), "wrote loop snapshot");
        Ok(())
    }
}

/// Keeps ASCII alphanumerics, `-`, `_` and `.`; everything else becomes `_`.
fn file_safe(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
