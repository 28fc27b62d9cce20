//! Error types for rendering and the archive pipeline.
//!
//! [`RenderError`] is the single error type returned by every public
//! operation in this crate. It hides the underlying template engine's error
//! type behind two stable variants, [`RenderError::TemplateSyntax`] and
//! [`RenderError::TemplateExecution`].

use std::io;
use std::path::PathBuf;

/// Error type for rendering and archive operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template body could not be parsed. Nothing was written.
    #[error("template syntax error: {0}")]
    TemplateSyntax(String),

    /// A helper function or a context lookup failed while rendering.
    #[error("template execution error: {0}")]
    TemplateExecution(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The directory walk could not read an entry.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Rendering a file inside a directory walk failed.
    #[error("{}: {source}", path.display())]
    Entry {
        path: PathBuf,
        #[source]
        source: Box<RenderError>,
    },

    /// The archive holds a record type that cannot be extracted.
    #[error("unsupported archive entry {path}: {kind}")]
    UnsupportedArchiveEntry { path: String, kind: String },

    /// An archive path is absolute or climbs out of the destination.
    #[error("unsafe archive path: {0}")]
    UnsafeArchivePath(String),
}

impl RenderError {
    /// Wraps `err` with the path of the file being rendered.
    pub fn at(path: impl Into<PathBuf>, err: RenderError) -> Self {
        RenderError::Entry {
            path: path.into(),
            source: Box::new(err),
        }
    }

    /// The innermost error, looking through any [`RenderError::Entry`] wrappers.
    pub fn root(&self) -> &RenderError {
        match self {
            RenderError::Entry { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self.root(), RenderError::TemplateSyntax(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self.root(), RenderError::TemplateExecution(_))
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::SyntaxError | ErrorKind::BadEscape => {
                RenderError::TemplateSyntax(describe(&err))
            }
            _ => RenderError::TemplateExecution(describe(&err)),
        }
    }
}

// Engine errors keep their cause chain out of `Display`; fold it in so the
// failing helper's message is not lost.
fn describe(err: &minijinja::Error) -> String {
    use std::error::Error as _;

    let mut msg = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        cause = inner.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::UnsafeArchivePath("../etc/passwd".to_string());
        assert!(err.to_string().contains("unsafe archive path"));
        assert!(err.to_string().contains("../etc/passwd"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let render_err: RenderError = io_err.into();
        assert!(matches!(render_err, RenderError::Io(_)));
    }

    #[test]
    fn test_from_minijinja_syntax_error() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "unexpected end");
        let render_err: RenderError = mj_err.into();
        assert!(render_err.is_syntax());
    }

    #[test]
    fn test_from_minijinja_other_errors_are_execution() {
        for kind in [
            minijinja::ErrorKind::InvalidOperation,
            minijinja::ErrorKind::UndefinedError,
            minijinja::ErrorKind::UnknownFunction,
        ] {
            let render_err: RenderError = minijinja::Error::new(kind, "boom").into();
            assert!(render_err.is_execution(), "{:?}", kind);
        }
    }

    #[test]
    fn test_entry_wraps_path() {
        let inner = RenderError::TemplateExecution("bad".to_string());
        let err = RenderError::at("site/index.html", inner);
        assert!(err.to_string().starts_with("site/index.html: "));
        assert!(err.is_execution());
        assert!(!err.is_syntax());
    }
}
