//! Sandbox - the internal working directory that holds generated files.
//!
//! The sandbox only answers path questions. Creating directories and
//! writing files is left to the installer that owns it.

use std::path::{Path, PathBuf};

/// Directory name used for per-target support files.
pub const SUPPORT_FILES_DIR_NAME: &str = "Target Support Files";

/// Default sandbox directory name inside the client root.
pub const DEFAULT_SANDBOX_DIR: &str = "Pods";

/// The sandbox rooted at an absolute directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Sandbox { root: root.into() }
    }

    /// Get the sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the support-files directory for a target label.
    pub fn target_support_files_dir(&self, label: &str) -> PathBuf {
        self.root.join(SUPPORT_FILES_DIR_NAME).join(label)
    }
}
