//! Extraction of an archive onto the filesystem.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use tar::{Archive, Entry, EntryType};
use tracing::{debug, trace};

use crate::error::RenderError;

/// Number of leading path components removed from every record.
///
/// At most `components - 1` are removed, so a record is never stripped down
/// to an empty name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripRule(pub usize);

impl StripRule {
    pub fn apply<'a, T>(&self, components: &'a [T]) -> &'a [T] {
        let n = self.0.min(components.len().saturating_sub(1));
        &components[n..]
    }
}

/// Extracts every record of `reader` below `dest`.
///
/// Returns the number of files written. Directory records are created,
/// pax global headers are ignored and any other non-file record aborts the
/// extraction.
pub fn extract(reader: impl Read, dest: &Path, strip: StripRule) -> Result<usize, RenderError> {
    let mut archive = Archive::new(reader);
    fs::create_dir_all(dest)?;

    let mut written = 0;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let raw = entry.path()?.to_string_lossy().into_owned();
        let entry_type = entry.header().entry_type();

        if entry_type == EntryType::XGlobalHeader {
            trace!(path = %raw, "skipping pax global header");
            continue;
        }

        let Some(target) = target_path(&raw, dest, strip)? else {
            trace!(path = %raw, "skipping empty path");
            continue;
        };

        match entry_type {
            EntryType::Regular | EntryType::Continuous => {
                write_file(&mut entry, &target)?;
                written += 1;
            }
            EntryType::Directory => {
                trace!(path = %target.display(), "creating directory");
                fs::create_dir_all(&target)?;
            }
            other => {
                return Err(RenderError::UnsupportedArchiveEntry {
                    path: raw,
                    kind: format!("{:?}", other),
                });
            }
        }
    }
    debug!(dest = %dest.display(), files = written, "extracted archive");
    Ok(written)
}

/// Resolves a record path below `dest`, or `None` when nothing is left of it.
fn target_path(raw: &str, dest: &Path, strip: StripRule) -> Result<Option<PathBuf>, RenderError> {
    let mut parts: Vec<&OsStr> = Vec::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(RenderError::UnsafeArchivePath(raw.to_string()));
            }
        }
    }
    if parts.is_empty() {
        return Ok(None);
    }
    let mut target = dest.to_path_buf();
    target.extend(strip.apply(&parts));
    Ok(Some(target))
}

fn write_file<R: Read>(entry: &mut Entry<'_, R>, target: &Path) -> Result<(), RenderError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(target)?;
    io::copy(entry, &mut file)?;
    set_mode(target, entry.header().mode()?)?;
    trace!(path = %target.display(), "wrote file");
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
