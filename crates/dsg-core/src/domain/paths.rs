//! Where generated files live inside the destination workspace.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::{config::ProjectName, error::DomainError};

/// Directory the framework project is created in, relative to the root.
pub const SOURCE_DIR: &str = "src";

/// Application package holding the notification views.
pub const NOTIFICATIONS_APP: &str = "communications";

/// A path guaranteed to stay inside whatever directory it is joined onto.
///
/// Invariant: never absolute and never contains `..`. Enforced at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let escapes = path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || path.as_os_str().is_empty() {
            Err(DomainError::UnsafeArchivePath {
                path: path.display().to_string(),
            })
        } else {
            Ok(Self(path))
        }
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Paths of the provisioned project, all derived from one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(SOURCE_DIR)
    }

    /// The package `django-admin startproject` creates.
    pub fn package_dir(&self, project: &ProjectName) -> PathBuf {
        self.source_dir().join(project.as_str())
    }

    pub fn settings_file(&self, project: &ProjectName) -> PathBuf {
        self.package_dir(project).join("settings.py")
    }

    pub fn urls_file(&self, project: &ProjectName) -> PathBuf {
        self.package_dir(project).join("urls.py")
    }

    pub fn notifications_views_file(&self) -> PathBuf {
        self.source_dir().join(NOTIFICATIONS_APP).join("views.py")
    }

    pub fn env_file(&self) -> PathBuf {
        self.source_dir().join(".env")
    }

    /// Files that carry the project-name placeholder after extraction.
    pub fn placeholder_targets(&self, project: &ProjectName) -> [PathBuf; 3] {
        [
            self.settings_file(project),
            self.urls_file(project),
            self.notifications_views_file(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_escaping_paths() {
        for path in ["../evil", "src/../../evil", "/etc/passwd", ""] {
            assert!(
                matches!(
                    RelativePath::try_new(path),
                    Err(DomainError::UnsafeArchivePath { .. })
                ),
                "accepted: {path}"
            );
        }
    }

    #[test]
    fn accepts_nested_and_dotfile_paths() {
        for path in ["settings.py", ".gitignore", "src/users/models.py", "./src/a.py"] {
            assert!(RelativePath::try_new(path).is_ok(), "rejected: {path}");
        }
    }

    #[test]
    fn layout_namespaces_package_by_project() {
        let layout = WorkspaceLayout::new("/work");
        let project = ProjectName::parse("shop").unwrap();

        assert_eq!(
            layout.settings_file(&project),
            PathBuf::from("/work/src/shop/settings.py")
        );
        assert_eq!(layout.env_file(), PathBuf::from("/work/src/.env"));
        assert_eq!(
            layout.placeholder_targets(&project)[2],
            PathBuf::from("/work/src/communications/views.py")
        );
    }
}
