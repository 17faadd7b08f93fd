//! In-memory template archive for testing.

use dsg_core::{application::ports::TemplateArchive, domain::ArchiveMember, error::DsgResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    members: Vec<ArchiveMember>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.members.push(ArchiveMember::new(path, contents));
        self
    }
}

impl TemplateArchive for MemoryArchive {
    fn location(&self) -> String {
        "<memory>".to_owned()
    }

    fn read_members(&self) -> DsgResult<Vec<ArchiveMember>> {
        Ok(self.members.clone())
    }
}
