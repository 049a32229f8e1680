//! Document loading with a bounded readiness wait.
//!
//! Mail pages are often saved or streamed in while the tool starts, so
//! extraction waits until the input looks complete. The wait always
//! resolves: after the timeout it proceeds with whatever is there.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{AppError, LoaderConfig, Result};

/// Something that can tell whether the input is ready to be read.
pub trait ReadinessProbe {
    fn is_ready(&self) -> bool;
}

impl<F: Fn() -> bool> ReadinessProbe for F {
    fn is_ready(&self) -> bool {
        self()
    }
}

/// Outcome of a readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    TimedOut,
}

/// Ready once the file exists and has content.
pub struct FileProbe {
    path: PathBuf,
}

impl FileProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReadinessProbe for FileProbe {
    fn is_ready(&self) -> bool {
        std::fs::metadata(&self.path).is_ok_and(|m| m.is_file() && m.len() > 0)
    }
}

/// Polls `probe` until it reports ready or the configured timeout passes.
pub async fn wait_until_ready<P: ReadinessProbe + ?Sized>(
    probe: &P,
    config: &LoaderConfig,
) -> Readiness {
    let poll_interval = Duration::from_millis(config.poll_interval_ms.max(1));
    let timeout = Duration::from_millis(config.timeout_ms);

    let poll = async {
        let mut ticker = tokio::time::interval(poll_interval);
        loop {
            ticker.tick().await;
            if probe.is_ready() {
                break;
            }
        }
    };

    tokio::select! {
        () = poll => Readiness::Ready,
        () = tokio::time::sleep(timeout) => {
            tracing::warn!(timeout_ms = config.timeout_ms, "Timeout waiting for document, proceeding anyway");
            Readiness::TimedOut
        }
    }
}

/// Reads the mail page at `path`, optionally waiting for it first.
///
/// # Errors
/// Returns `DocumentNotFound` if the file is still missing after the
/// wait, or an IO error if it cannot be read.
pub async fn load_document(path: &Path, config: &LoaderConfig, wait: bool) -> Result<String> {
    if wait {
        let readiness = wait_until_ready(&FileProbe::new(path), config).await;
        tracing::debug!(?readiness, path = %path.display(), "Document wait finished");
    }

    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::DocumentNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(AppError::io(
            format!("Failed to read document: {}", path.display()),
            e,
        )),
    }
}
