//! Lazy directory walk producing rendered archive entries.

use std::fs::{self, Metadata};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use super::ArchiveEntry;
use crate::error::RenderError;
use crate::render::Renderer;

/// Iterator over the rendered regular files below a root directory.
///
/// Files are visited depth-first in file-name order. Directories, symlinks
/// and special files are skipped. Each file is read, rendered and dropped
/// before the next one is opened.
pub struct Entries<'r> {
    walker: walkdir::IntoIter,
    root: PathBuf,
    renderer: &'r Renderer,
}

impl<'r> Entries<'r> {
    pub fn new(root: impl Into<PathBuf>, renderer: &'r Renderer) -> Self {
        let root = root.into();
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Self {
            walker,
            root,
            renderer,
        }
    }

    fn render_entry(&self, entry: &DirEntry) -> Result<ArchiveEntry, RenderError> {
        let source = fs::read(entry.path())?;
        let mode = file_mode(&entry.metadata()?);
        let name = archive_name(&self.root, entry.path());
        let path = self.renderer.render_path(&name)?;
        let content = self.renderer.render(&name, &source)?;
        debug!(source = %entry.path().display(), path = %path, size = content.len(), "rendered entry");
        Ok(ArchiveEntry {
            path,
            mode,
            content,
        })
    }
}

impl Iterator for Entries<'_> {
    type Item = Result<ArchiveEntry, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err.into())),
            };
            if !entry.file_type().is_file() {
                trace!(path = %entry.path().display(), "skipping non-regular entry");
                continue;
            }
            return Some(
                self.render_entry(&entry)
                    .map_err(|e| RenderError::at(entry.path(), e)),
            );
        }
    }
}

/// Archive path for `path`, rooted at the walked directory's own name and
/// always `/`-separated.
pub(crate) fn archive_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let base = root.file_name().map(|name| name.to_string_lossy());
    base.into_iter()
        .chain(rel.components().filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        }))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn file_mode(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(_meta: &Metadata) -> u32 {
    0o644
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_name_keeps_root_name() {
        assert_eq!(
            archive_name(Path::new("site"), Path::new("site/docs/index.md")),
            "site/docs/index.md"
        );
        assert_eq!(
            archive_name(Path::new("/tmp/x/site"), Path::new("/tmp/x/site/a.txt")),
            "site/a.txt"
        );
    }

    #[test]
    fn test_archive_name_without_root_name() {
        assert_eq!(archive_name(Path::new("."), Path::new("./a/b.txt")), "a/b.txt");
    }

    #[test]
    fn test_archive_name_for_single_file_root() {
        assert_eq!(
            archive_name(Path::new("conf/app.toml"), Path::new("conf/app.toml")),
            "app.toml"
        );
    }
}
