//! Presenting an assembled document.
//!
//! Presentation is the one side effect of the pipeline, kept behind a
//! trait so layout and assembly stay testable without it. Presenting is
//! single-shot: it either succeeds or fails terminally, with no retry, no
//! progress, and no completion signal once a viewer has been handed the
//! file.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::document::PrintDocument;
use crate::error::Error;

pub trait Presenter {
    fn present(&self, document: &PrintDocument) -> Result<(), Error>;
}

/// Writes the document to a fixed path. No viewer is involved.
pub struct FilePresenter {
    path: PathBuf,
}

impl FilePresenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Presenter for FilePresenter {
    fn present(&self, document: &PrintDocument) -> Result<(), Error> {
        std::fs::write(&self.path, document.html()).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", e, self.path.display()),
            ))
        })?;
        log::info!("Wrote document to {}", self.path.display());
        Ok(())
    }
}

/// Writes the document and hands it to the platform's default opener so
/// the user can print from there. When no opener can be launched the
/// error message names the written file, since the only remediation is to
/// open it manually and re-invoke.
pub struct ViewerPresenter {
    target: Option<PathBuf>,
}

impl ViewerPresenter {
    /// Present from a throwaway file under the system temp directory.
    pub fn new() -> Self {
        Self { target: None }
    }

    /// Present from (and leave behind) the given path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Some(path.into()),
        }
    }

    fn target_path(&self) -> PathBuf {
        match &self.target {
            Some(path) => path.clone(),
            None => std::env::temp_dir().join(format!("adpress-{}.html", std::process::id())),
        }
    }
}

impl Default for ViewerPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for ViewerPresenter {
    fn present(&self, document: &PrintDocument) -> Result<(), Error> {
        let path = self.target_path();
        std::fs::write(&path, document.html())?;
        launch_opener(&path).map_err(|e| {
            Error::Present(format!(
                "no viewer could be launched ({e}); open the file manually: {}",
                path.display()
            ))
        })?;
        log::info!("Opened {} in the system viewer", path.display());
        Ok(())
    }
}

// The child is never awaited; presentation has no completion signal.
fn launch_opener(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = Command::new("open");
        c.arg(path);
        c
    };

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    command.spawn().map(|_| ())
}
