//! Command-line interface.
//!
//! Every flag can also be set through a `TMPL_*` environment variable.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::archive::{Sink, StripRule};
use crate::engine::{MissingKey, RenderOptions};

/// Path that stands for stdin or stdout.
pub const STDIO: &str = "-";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "tmpl", version)]
#[command(about = "Render templates against the process environment")]
pub struct Cli {
    /// Template to read, `-` for stdin
    #[arg(short = 'f', long = "file", env = "TMPL_FILE", default_value = STDIO)]
    pub input: String,

    /// Where to write, `-` for stdout. In directory mode a path ending in
    /// `.tar` receives the archive, any other path is a directory to extract into
    #[arg(short = 'w', long = "write", env = "TMPL_WRITE", default_value = STDIO)]
    pub output: String,

    /// HTML-escape interpolated values
    #[arg(long, env = "TMPL_HTML")]
    pub html: bool,

    /// Render every file below DIR and emit a tar archive
    #[arg(short = 'r', long = "recursive", env = "TMPL_RECURSIVE", value_name = "DIR")]
    pub recursive: Option<PathBuf>,

    /// Leading path components to drop when extracting (directory mode)
    #[arg(short = 'p', long = "strip", env = "TMPL_STRIP", default_value_t = 0, value_name = "N")]
    pub strip: usize,

    /// What to do when a template reads a missing key
    #[arg(long, env = "TMPL_MISSING_KEY", value_enum, default_value_t = MissingKey::Default)]
    pub missing_key: MissingKey,

    /// Leave out functions that read the clock, randomness, environment or network
    #[arg(long, env = "TMPL_HERMETIC")]
    pub hermetic: bool,

    /// Log pipeline progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn options(&self) -> RenderOptions {
        RenderOptions::default()
            .html(self.html)
            .missing_key(self.missing_key)
    }

    pub fn strip_rule(&self) -> StripRule {
        StripRule(self.strip)
    }

    /// Opens the template source.
    pub fn open_input(&self) -> io::Result<Box<dyn Read>> {
        if self.input == STDIO {
            Ok(Box::new(io::stdin().lock()))
        } else {
            Ok(Box::new(File::open(&self.input)?))
        }
    }

    /// Opens the output for single-file rendering.
    pub fn open_output(&self) -> io::Result<Box<dyn Write>> {
        if self.output == STDIO {
            Ok(Box::new(io::stdout().lock()))
        } else {
            Ok(Box::new(File::create(&self.output)?))
        }
    }

    /// Decides where the archive goes in directory mode.
    pub fn sink(&self) -> io::Result<Sink<'static>> {
        if self.output == STDIO {
            return Ok(Sink::Stream(Box::new(io::stdout().lock())));
        }
        let path = Path::new(&self.output);
        if path.extension().is_some_and(|ext| ext == "tar") {
            Ok(Sink::Stream(Box::new(File::create(path)?)))
        } else {
            Ok(Sink::Directory(path.to_path_buf()))
        }
    }
}
