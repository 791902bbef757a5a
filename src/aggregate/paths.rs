//! Path translator - relative path strings for generated files.
//!
//! Generated files reference paths in two ways. Some paths are resolved now,
//! relative to the client root. Others are written behind a build variable
//! (`${SRCROOT}`, `${PODS_ROOT}`) that the host build tool expands at build
//! time, so the project can move without regenerating anything.
//! [`BuildVariablePath`] keeps the second kind from being mistaken for a
//! filesystem path.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Serialize, Serializer};

/// A variable expanded by the host build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildVariable {
    /// Directory containing the host project
    SrcRoot,
    /// The sandbox root
    PodsRoot,
    /// Per-target directory for derived files
    DerivedFileDir,
}

impl BuildVariable {
    /// The token as written into generated files.
    pub fn token(&self) -> &'static str {
        match self {
            BuildVariable::SrcRoot => "${SRCROOT}",
            BuildVariable::PodsRoot => "${PODS_ROOT}",
            BuildVariable::DerivedFileDir => "$(DERIVED_FILE_DIR)",
        }
    }
}

/// A path anchored at a build variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildVariablePath {
    variable: BuildVariable,
    relative: PathBuf,
}

impl BuildVariablePath {
    pub fn new(variable: BuildVariable, relative: impl Into<PathBuf>) -> Self {
        BuildVariablePath {
            variable,
            relative: relative.into(),
        }
    }

    pub fn variable(&self) -> BuildVariable {
        self.variable
    }

    /// The part after the variable.
    pub fn relative(&self) -> &Path {
        &self.relative
    }
}

impl fmt::Display for BuildVariablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relative = slash_path(&self.relative);
        if relative.is_empty() || relative == "." {
            f.write_str(self.variable.token())
        } else {
            write!(f, "{}/{}", self.variable.token(), relative)
        }
    }
}

impl Serialize for BuildVariablePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Render a path with `/` separators, as build settings expect.
pub fn slash_path(path: &Path) -> String {
    let joined = path
        .components()
        .filter(|c| !matches!(c, Component::RootDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if path.has_root() {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Computes relative paths between the sandbox root and the client root.
#[derive(Debug, Clone)]
pub struct PathTranslator {
    sandbox_root: PathBuf,
    client_root: PathBuf,
    declaration_file: Option<PathBuf>,
}

impl PathTranslator {
    pub fn new(
        sandbox_root: impl Into<PathBuf>,
        client_root: impl Into<PathBuf>,
        declaration_file: Option<PathBuf>,
    ) -> Self {
        PathTranslator {
            sandbox_root: sandbox_root.into(),
            client_root: client_root.into(),
            declaration_file,
        }
    }

    pub fn client_root(&self) -> &Path {
        &self.client_root
    }

    pub fn sandbox_root(&self) -> &Path {
        &self.sandbox_root
    }

    /// `path` relative to the client root.
    pub fn relative(&self, path: &Path) -> PathBuf {
        relative_path(&self.client_root, path)
    }

    /// `path` relative to the sandbox root.
    pub fn relative_to_pods_root(&self, path: &Path) -> PathBuf {
        relative_path(&self.sandbox_root, path)
    }

    /// Re-anchor a client-root-relative path, undoing [`Self::relative`].
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        normalize_lexically(&self.client_root.join(relative))
    }

    /// `path` relative to the client root, behind `${SRCROOT}`.
    pub fn relative_from_root_variable(&self, path: &Path) -> BuildVariablePath {
        BuildVariablePath::new(BuildVariable::SrcRoot, self.relative(path))
    }

    /// `path` relative to the sandbox root, behind `${PODS_ROOT}`.
    pub fn relative_from_pods_root_variable(&self, path: &Path) -> BuildVariablePath {
        BuildVariablePath::new(BuildVariable::PodsRoot, self.relative_to_pods_root(path))
    }

    /// The sandbox root relative to the client root.
    pub fn pods_root_relative_path(&self) -> PathBuf {
        self.relative(&self.sandbox_root)
    }

    /// The sandbox root behind `${SRCROOT}`.
    pub fn pods_root_relative(&self) -> BuildVariablePath {
        self.relative_from_root_variable(&self.sandbox_root)
    }

    /// The directory the owning definition was declared in.
    ///
    /// Synthesized definitions have no file; they fall back to the directory
    /// above the sandbox root.
    pub fn definition_directory_relative(&self) -> BuildVariablePath {
        match self.declaration_file {
            Some(ref file) => {
                let dir = self
                    .relative(file)
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                BuildVariablePath::new(BuildVariable::SrcRoot, dir)
            }
            None => BuildVariablePath::new(BuildVariable::PodsRoot, ".."),
        }
    }
}

fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Remove `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator(declaration_file: Option<&str>) -> PathTranslator {
        PathTranslator::new(
            "/work/app/Pods",
            "/work/app",
            declaration_file.map(PathBuf::from),
        )
    }

    #[test]
    fn test_relative() {
        let paths = translator(None);
        assert_eq!(
            paths.relative(Path::new("/work/app/Pods/Target Support Files/Pods-App")),
            PathBuf::from("Pods/Target Support Files/Pods-App")
        );
    }

    #[test]
    fn test_relative_round_trip() {
        let paths = translator(None);
        for p in [
            "/work/app/Pods",
            "/work/app/Pods/Headers/Public/Alamofire",
            "/work/app/Pods/Target Support Files/Pods-App/Pods-App.debug.xcconfig",
        ] {
            let p = Path::new(p);
            assert_eq!(paths.resolve(&paths.relative(p)), p);
        }
    }

    #[test]
    fn test_round_trip_with_sandbox_outside_client_root() {
        let paths = PathTranslator::new("/work/shared/Pods", "/work/app", None);
        let p = Path::new("/work/shared/Pods/Manifest.lock");
        let relative = paths.relative(p);
        assert_eq!(relative, PathBuf::from("../shared/Pods/Manifest.lock"));
        assert_eq!(paths.resolve(&relative), p);
    }

    #[test]
    fn test_pods_root_relative() {
        let paths = translator(None);
        assert_eq!(paths.pods_root_relative().to_string(), "${SRCROOT}/Pods");
        assert_eq!(paths.pods_root_relative_path(), PathBuf::from("Pods"));
    }

    #[test]
    fn test_definition_directory_from_file() {
        let paths = translator(Some("/work/app/config/Podfile"));
        assert_eq!(
            paths.definition_directory_relative().to_string(),
            "${SRCROOT}/config"
        );

        let paths = translator(Some("/work/app/Podfile"));
        assert_eq!(paths.definition_directory_relative().to_string(), "${SRCROOT}");
    }

    #[test]
    fn test_definition_directory_without_file() {
        let paths = translator(None);
        assert_eq!(
            paths.definition_directory_relative().to_string(),
            "${PODS_ROOT}/.."
        );
    }

    #[test]
    fn test_pods_root_variable_path() {
        let paths = translator(None);
        let script =
            Path::new("/work/app/Pods/Target Support Files/Pods-App/Pods-App-frameworks.sh");
        assert_eq!(
            paths.relative_from_pods_root_variable(script).to_string(),
            "${PODS_ROOT}/Target Support Files/Pods-App/Pods-App-frameworks.sh"
        );
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
    }
}
