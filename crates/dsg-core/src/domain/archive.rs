//! Which template archive members go where.

use std::path::PathBuf;

use crate::domain::{
    config::ProjectName,
    error::DomainError,
    paths::{RelativePath, SOURCE_DIR},
};

/// Prefix of the member subtree copied verbatim into the destination root.
pub const SOURCE_PREFIX: &str = "src/";

/// One regular file read from the template archive.
#[derive(Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    pub path: String,
    pub contents: Vec<u8>,
}

impl ArchiveMember {
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Member name without a leading `./`, as produced by `tar -C dir .`.
    pub fn normalized_path(&self) -> &str {
        self.path.trim_start_matches("./")
    }
}

impl std::fmt::Debug for ArchiveMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveMember")
            .field("path", &self.path)
            .field("len", &self.contents.len())
            .finish()
    }
}

/// A resolved write: archive bytes and where they land under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<'a> {
    pub member: &'a str,
    pub destination: RelativePath,
    pub contents: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NamedMember {
    member: &'static str,
    destination: PathBuf,
}

/// The fixed mapping from archive members to destination paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPlan {
    named: Vec<NamedMember>,
    subtree_prefix: &'static str,
}

impl ExtractionPlan {
    pub fn for_project(project: &ProjectName) -> Self {
        let package = PathBuf::from(SOURCE_DIR).join(project.as_str());
        let named = vec![
            NamedMember {
                member: "settings.py",
                destination: package.join("settings.py"),
            },
            NamedMember {
                member: "views.py",
                destination: package.join("views.py"),
            },
            NamedMember {
                member: "urls.py",
                destination: package.join("urls.py"),
            },
            NamedMember {
                member: ".gitignore",
                destination: PathBuf::from(".gitignore"),
            },
        ];
        Self {
            named,
            subtree_prefix: SOURCE_PREFIX,
        }
    }

    /// Members that must be present for the plan to resolve.
    pub fn required_members(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.named.iter().map(|n| n.member)
    }

    /// Match the plan against the archive contents.
    ///
    /// Either every required member is present and every path is safe, or
    /// nothing is returned; callers never see a partial plan.
    pub fn resolve<'a>(
        &self,
        members: &'a [ArchiveMember],
    ) -> Result<Vec<Extraction<'a>>, DomainError> {
        let mut extractions = Vec::with_capacity(members.len());

        for named in &self.named {
            let found = members
                .iter()
                .find(|m| m.normalized_path() == named.member)
                .ok_or_else(|| DomainError::MissingArchiveMember {
                    member: named.member.to_owned(),
                })?;
            extractions.push(Extraction {
                member: found.normalized_path(),
                destination: RelativePath::try_new(&named.destination)?,
                contents: &found.contents,
            });
        }

        let subtree_start = extractions.len();
        for member in members {
            let name = member.normalized_path();
            if name.starts_with(self.subtree_prefix) && name.len() > self.subtree_prefix.len() {
                extractions.push(Extraction {
                    member: name,
                    destination: RelativePath::try_new(name)?,
                    contents: &member.contents,
                });
            }
        }

        if extractions.len() == subtree_start {
            return Err(DomainError::EmptyArchiveSubtree {
                prefix: self.subtree_prefix.to_owned(),
            });
        }

        Ok(extractions)
    }
}
