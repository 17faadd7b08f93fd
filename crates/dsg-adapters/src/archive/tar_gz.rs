//! Gzip-compressed tar archive on disk.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, instrument};

use dsg_core::{
    application::{ApplicationError, ports::TemplateArchive},
    domain::ArchiveMember,
    error::{DsgError, DsgResult},
};

/// The bundled `sources.tar.gz`.
///
/// The file is opened on every [`TemplateArchive::read_members`] call and
/// read to the end in one pass.
#[derive(Debug, Clone)]
pub struct TarGzArchive {
    path: PathBuf,
}

impl TarGzArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> DsgError {
        ApplicationError::ArchiveUnavailable {
            path: self.location(),
            reason: reason.to_string(),
        }
        .into()
    }
}

impl TemplateArchive for TarGzArchive {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(archive = %self.path.display()))]
    fn read_members(&self) -> DsgResult<Vec<ArchiveMember>> {
        let file = File::open(&self.path).map_err(|e| self.unavailable(e))?;
        let mut archive = Archive::new(GzDecoder::new(file));

        let mut members = Vec::new();
        for entry in archive.entries().map_err(|e| self.unavailable(e))? {
            let mut entry = entry.map_err(|e| self.unavailable(e))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let path = entry
                .path()
                .map_err(|e| self.unavailable(e))?
                .to_string_lossy()
                .replace('\\', "/");

            let mut contents = Vec::new();
            entry
                .read_to_end(&mut contents)
                .map_err(|e| self.unavailable(format!("{path}: {e}")))?;

            members.push(ArchiveMember::new(path, contents));
        }

        debug!(count = members.len(), "Archive members read");
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{Compression, write::GzEncoder};
    use tar::{Builder, EntryType, Header};
    use tempfile::TempDir;

    fn write_archive(path: &Path, files: &[(&str, &str)], dirs: &[&str]) {
        let file = File::create(path).unwrap();
        let mut builder = Builder::new(GzEncoder::new(file, Compression::default()));

        for dir in dirs {
            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Directory);
            header.set_size(0);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, dir, std::io::empty()).unwrap();
        }
        for (name, content) in files {
            let mut header = Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn reads_files_and_skips_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sources.tar.gz");
        write_archive(
            &path,
            &[("settings.py", "X = '<project_name>'"), ("src/users/models.py", "")],
            &["src/", "src/users/"],
        );

        let members = TarGzArchive::new(&path).read_members().unwrap();

        let names: Vec<_> = members.iter().map(|m| m.normalized_path()).collect();
        assert_eq!(names, vec!["settings.py", "src/users/models.py"]);
        assert_eq!(members[0].contents, b"X = '<project_name>'");
    }

    #[test]
    fn missing_file_is_archive_unavailable() {
        let dir = TempDir::new().unwrap();
        let archive = TarGzArchive::new(dir.path().join("absent.tar.gz"));

        let err = archive.read_members().unwrap_err();

        assert!(matches!(
            err,
            DsgError::Application(ApplicationError::ArchiveUnavailable { .. })
        ));
    }

    #[test]
    fn non_gzip_file_is_archive_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sources.tar.gz");
        std::fs::write(&path, b"definitely not gzip").unwrap();

        assert!(TarGzArchive::new(&path).read_members().is_err());
    }
}
