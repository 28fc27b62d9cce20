//! Tar serialization of archive entries.

use std::io::{self, Write};

use tar::{Builder, EntryType, Header};
use tracing::trace;

use super::ArchiveEntry;
use crate::error::RenderError;

/// Writes entries as ustar records, one regular file per entry.
///
/// Headers are deterministic: mtime, uid and gid are all zero, so the same
/// input tree always produces the same bytes.
pub struct ArchiveWriter<W: Write> {
    builder: Builder<W>,
    count: usize,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            builder: Builder::new(out),
            count: 0,
        }
    }

    /// Appends one record. Paths over 100 bytes get a GNU long-name record.
    pub fn append(&mut self, entry: &ArchiveEntry) -> io::Result<()> {
        let mut header = Header::new_ustar();
        header.set_entry_type(EntryType::Regular);
        header.set_size(entry.size());
        header.set_mode(entry.mode);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        self.builder
            .append_data(&mut header, &entry.path, entry.content.as_slice())?;
        self.count += 1;
        trace!(path = %entry.path, size = entry.size(), "archived");
        Ok(())
    }

    /// Appends every entry, stopping at the first failure.
    pub fn append_all<I>(&mut self, entries: I) -> Result<usize, RenderError>
    where
        I: IntoIterator<Item = Result<ArchiveEntry, RenderError>>,
    {
        let before = self.count;
        for entry in entries {
            self.append(&entry?)?;
        }
        Ok(self.count - before)
    }

    /// Records written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Writes the end-of-archive blocks and returns the flushed writer.
    pub fn finish(self) -> io::Result<W> {
        let mut out = self.builder.into_inner()?;
        out.flush()?;
        Ok(out)
    }
}
