//! tmpl - Render templates against the process environment.
//!
//! A template is rendered against a [`Context`], a snapshot of string
//! key/value pairs (normally the process environment), with the helper
//! functions of [`tmpl_funcs`] installed both as functions and as filters.
//!
//! # Quick Start
//!
//! ```rust
//! use tmpl::{Context, RenderOptions, Renderer};
//! use tmpl_funcs::build_table;
//!
//! let ctx = Context::from_pairs(["TAG=v1.4.2", "NAME=web"]);
//! let renderer = Renderer::new(&build_table(), ctx, RenderOptions::default());
//!
//! let out = renderer
//!     .render_str(r#"{{ NAME | upper }} {{ TAG | trimPrefix("v") }}"#)
//!     .unwrap();
//! assert_eq!(out, "WEB 1.4.2");
//! ```
//!
//! # Directory mode
//!
//! [`render_tree`] walks a directory, renders every regular file and its
//! path, and either streams the result as a tar archive or extracts it
//! below another directory. See the [`archive`] module.

pub mod archive;
pub mod cli;
mod context;
mod engine;
mod error;
mod render;

pub use archive::{extract, render_tree, ArchiveEntry, ArchiveWriter, Entries, Sink, StripRule};
pub use context::Context;
pub use engine::{build_environment, from_engine, register_functions, MissingKey, RenderOptions};
pub use error::RenderError;
pub use render::Renderer;
