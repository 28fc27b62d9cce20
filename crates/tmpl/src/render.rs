//! The render operation.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use minijinja::{Environment, Value};
use tmpl_funcs::FunctionTable;
use tracing::trace;

use crate::context::Context;
use crate::engine::{build_environment, RenderOptions};
use crate::error::RenderError;

/// Renders templates against a fixed context.
///
/// Each key of the context is a top-level variable, and the whole context
/// is also available as the mapping `environ`:
///
/// ```rust
/// use tmpl::{Context, RenderOptions, Renderer};
/// use tmpl_funcs::build_hermetic_table;
///
/// let ctx = Context::from_pairs(["USER=arthur"]);
/// let renderer = Renderer::new(&build_hermetic_table(), ctx, RenderOptions::default());
/// let out = renderer.render_str("hi {{ USER | upper }} ({{ environ | length }})").unwrap();
/// assert_eq!(out, "hi ARTHUR (1)");
/// ```
pub struct Renderer {
    env: Environment<'static>,
    /// Non-escaping environment for file names, present only in HTML mode.
    path_env: Option<Environment<'static>>,
    context: Context,
    globals: Value,
}

impl Renderer {
    pub fn new(table: &FunctionTable, context: Context, options: RenderOptions) -> Self {
        let path_env = options
            .html
            .then(|| build_environment(table, options.html(false)));
        Self {
            env: build_environment(table, options),
            path_env,
            globals: globals(&context),
            context,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Renders `source` under the template name `name`.
    ///
    /// Parse failures are [`RenderError::TemplateSyntax`]; anything going
    /// wrong while evaluating is [`RenderError::TemplateExecution`].
    pub fn render_named(&self, name: &str, source: &str) -> Result<String, RenderError> {
        trace!(template = name, bytes = source.len(), "rendering");
        Ok(self.env.render_named_str(name, source, &self.globals)?)
    }

    /// Renders a file path. Paths are never HTML-escaped.
    pub fn render_path(&self, path: &str) -> Result<String, RenderError> {
        let env = self.path_env.as_ref().unwrap_or(&self.env);
        trace!(template = path, "rendering path");
        Ok(env.render_named_str(path, path, &self.globals)?)
    }

    pub fn render_str(&self, source: &str) -> Result<String, RenderError> {
        self.render_named("template", source)
    }

    /// Renders raw template bytes. The source must be UTF-8.
    pub fn render(&self, name: &str, source: &[u8]) -> Result<Vec<u8>, RenderError> {
        let source = std::str::from_utf8(source)
            .map_err(|e| RenderError::TemplateSyntax(format!("{}: {}", name, e)))?;
        Ok(self.render_named(name, source)?.into_bytes())
    }

    /// Reads the whole of `input` and writes the rendered result to `output`.
    ///
    /// Nothing is written when rendering fails.
    pub fn render_stream(
        &self,
        name: &str,
        mut input: impl Read,
        mut output: impl Write,
    ) -> Result<(), RenderError> {
        let mut source = Vec::new();
        input.read_to_end(&mut source)?;
        let rendered = self.render(name, &source)?;
        output.write_all(&rendered)?;
        output.flush()?;
        Ok(())
    }
}

fn globals(context: &Context) -> Value {
    let mut vars: BTreeMap<&str, Value> = context
        .iter()
        .map(|(k, v)| (k, Value::from(v)))
        .collect();
    vars.insert("environ", Value::from_serialize(context.as_map()));
    Value::from_serialize(&vars)
}
