//! Directory mode: render a whole tree and repackage it as a tar archive.
//!
//! The pipeline walks a directory, renders every regular file (and its
//! path) against the context, and emits one tar record per file. What
//! happens to the archive depends on the [`Sink`]:
//!
//! - [`Sink::Stream`] writes it straight to a writer (stdout, a `.tar` file).
//! - [`Sink::Directory`] buffers it in memory and then extracts it below a
//!   directory, removing leading path components per the [`StripRule`].
//!
//! Any failure aborts the whole run. There is no skip-and-continue mode.

mod extract;
mod walk;
mod writer;

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::RenderError;
use crate::render::Renderer;

pub use extract::{extract, StripRule};
pub use walk::Entries;
pub use writer::ArchiveWriter;

/// One rendered file, ready to be archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Rendered, `/`-separated path.
    pub path: String,
    /// Permission bits of the source file.
    pub mode: u32,
    /// Rendered content.
    pub content: Vec<u8>,
}

impl ArchiveEntry {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Where the archive goes.
pub enum Sink<'a> {
    /// Write the archive bytes to this writer as they are produced.
    Stream(Box<dyn Write + 'a>),
    /// Extract the archive below this directory.
    Directory(PathBuf),
}

impl std::fmt::Debug for Sink<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sink::Stream(_) => f.write_str("Stream"),
            Sink::Directory(dir) => f.debug_tuple("Directory").field(dir).finish(),
        }
    }
}

/// Renders every file below `root` into `sink`.
///
/// Returns the number of files archived (stream) or extracted (directory).
pub fn render_tree(
    root: &Path,
    renderer: &Renderer,
    sink: Sink<'_>,
    strip: StripRule,
) -> Result<usize, RenderError> {
    let entries = Entries::new(root, renderer);
    match sink {
        Sink::Stream(out) => {
            debug!(root = %root.display(), "streaming archive");
            let mut writer = ArchiveWriter::new(out);
            let count = writer.append_all(entries)?;
            writer.finish()?;
            info!(files = count, "wrote archive");
            Ok(count)
        }
        Sink::Directory(dest) => {
            debug!(root = %root.display(), dest = %dest.display(), "buffering archive for extraction");
            let mut writer = ArchiveWriter::new(Vec::new());
            writer.append_all(entries)?;
            let buffer = writer.finish()?;
            let count = extract(buffer.as_slice(), &dest, strip)?;
            info!(files = count, dest = %dest.display(), "extracted archive");
            Ok(count)
        }
    }
}
