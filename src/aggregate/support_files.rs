//! Names and locations of the files generated for an umbrella target.
//!
//! Every support file lives in `<sandbox>/Target Support Files/<label>/` and
//! is named after the label.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::aggregate::paths::{BuildVariable, BuildVariablePath};
use crate::aggregate::AggregateTarget;
use crate::core::configuration::file_variant;

static NON_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_]").unwrap_or_else(|e| panic!("invalid identifier regex: {}", e))
});

/// Turn a label into a C identifier: invalid characters become `_` and a
/// leading digit is prefixed with `_`.
pub(crate) fn c99_identifier(name: &str) -> String {
    let replaced = NON_IDENTIFIER.replace_all(name, "_");
    if replaced.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", replaced)
    } else {
        replaced.into_owned()
    }
}

impl AggregateTarget {
    /// Directory holding every generated support file.
    pub fn support_files_dir(&self) -> PathBuf {
        self.sandbox.target_support_files_dir(&self.label)
    }

    fn support_file(&self, suffix: &str) -> PathBuf {
        self.support_files_dir()
            .join(format!("{}{}", self.label, suffix))
    }

    /// Module name of the umbrella product.
    pub fn product_module_name(&self) -> String {
        c99_identifier(&self.label)
    }

    /// File name of the umbrella product.
    pub fn product_name(&self) -> String {
        if self.requires_frameworks() {
            format!("{}.framework", self.product_module_name())
        } else {
            format!("lib{}.a", self.label)
        }
    }

    /// Configuration file for `configuration`, e.g. `Pods-App.debug.xcconfig`.
    pub fn xcconfig_path(&self, configuration: &str) -> PathBuf {
        self.support_file(&format!(".{}.xcconfig", file_variant(configuration)))
    }

    /// [`Self::xcconfig_path`] relative to the client root.
    pub fn xcconfig_relative_path(&self, configuration: &str) -> PathBuf {
        self.paths.relative(&self.xcconfig_path(configuration))
    }

    /// Base path of the acknowledgement files; the writer adds extensions.
    pub fn acknowledgements_basepath(&self) -> PathBuf {
        self.support_file("-acknowledgements")
    }

    pub fn copy_resources_script_path(&self) -> PathBuf {
        self.support_file("-resources.sh")
    }

    pub fn embed_frameworks_script_path(&self) -> PathBuf {
        self.support_file("-frameworks.sh")
    }

    /// The resource copy script as referenced from a build phase.
    pub fn copy_resources_script_relative_path(&self) -> BuildVariablePath {
        self.paths
            .relative_from_pods_root_variable(&self.copy_resources_script_path())
    }

    /// The framework embed script as referenced from a build phase.
    pub fn embed_frameworks_script_relative_path(&self) -> BuildVariablePath {
        self.paths
            .relative_from_pods_root_variable(&self.embed_frameworks_script_path())
    }

    /// Marker file written by the manifest lock check.
    pub fn check_manifest_lock_script_output_file_path(&self) -> BuildVariablePath {
        BuildVariablePath::new(
            BuildVariable::DerivedFileDir,
            format!("{}-checkManifestLockResult.txt", self.label),
        )
    }

    pub fn umbrella_header_path(&self) -> PathBuf {
        self.support_file("-umbrella.h")
    }

    pub fn module_map_path(&self) -> PathBuf {
        self.support_file(".modulemap")
    }

    pub fn info_plist_path(&self) -> PathBuf {
        self.support_file("-Info.plist")
    }

    pub fn dummy_source_path(&self) -> PathBuf {
        self.support_file("-dummy.m")
    }

    /// Bridge-support file, when the definition asks for one.
    pub fn bridge_support_path(&self) -> Option<PathBuf> {
        self.definition
            .generate_bridge_support
            .then(|| self.support_file(".bridgesupport"))
    }

    /// [`Self::bridge_support_path`] relative to the sandbox root.
    pub fn bridge_support_file(&self) -> Option<PathBuf> {
        self.bridge_support_path()
            .map(|path| self.paths.relative_to_pods_root(&path))
    }

    /// The sandbox root behind `${SRCROOT}`.
    pub fn relative_pods_root(&self) -> BuildVariablePath {
        self.paths.pods_root_relative()
    }

    /// Directory of the file the definition was declared in.
    pub fn podfile_dir_relative_path(&self) -> BuildVariablePath {
        self.paths.definition_directory_relative()
    }
}
