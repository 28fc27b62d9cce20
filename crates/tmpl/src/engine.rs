//! Template engine binding.
//!
//! Installs a [`FunctionTable`] into a MiniJinja [`Environment`]. Every
//! function is available both as a global (`{{ upper(NAME) }}`) and as a
//! filter (`{{ NAME | upper }}`). A filter receives the piped value as its
//! LAST argument, so `{{ TAG | trimPrefix("v") }}` calls
//! `trimPrefix("v", TAG)` and `{{ X | default("none") }}` calls
//! `default("none", X)`.

use minijinja::value::Rest;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior, Value};
use tmpl_funcs::{FuncError, Function, FunctionTable};

/// What happens when a template reads a key the context does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MissingKey {
    /// Fail the render.
    Error,
    /// Render as empty and allow attribute access on the missing value.
    Zero,
    /// Render as empty.
    #[default]
    Default,
}

impl MissingKey {
    fn undefined_behavior(self) -> UndefinedBehavior {
        match self {
            MissingKey::Error => UndefinedBehavior::Strict,
            MissingKey::Zero => UndefinedBehavior::Chainable,
            MissingKey::Default => UndefinedBehavior::Lenient,
        }
    }
}

/// Engine settings shared by every render in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// HTML-escape every interpolated value.
    pub html: bool,
    pub missing_key: MissingKey,
}

impl RenderOptions {
    pub fn html(mut self, html: bool) -> Self {
        self.html = html;
        self
    }

    pub fn missing_key(mut self, policy: MissingKey) -> Self {
        self.missing_key = policy;
        self
    }
}

/// Builds an environment with `table` installed and `options` applied.
pub fn build_environment(table: &FunctionTable, options: RenderOptions) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(options.missing_key.undefined_behavior());
    let escape = if options.html {
        AutoEscape::Html
    } else {
        AutoEscape::None
    };
    env.set_auto_escape_callback(move |_| escape);
    register_functions(&mut env, table);
    env
}

/// Installs every function in `table` as a global and as a filter.
pub fn register_functions(env: &mut Environment<'static>, table: &FunctionTable) {
    for function in table.iter().copied() {
        env.add_function(function.name(), move |args: Rest<Value>| {
            invoke(function, args.0)
        });
        env.add_filter(
            function.name(),
            move |piped: Value, args: Rest<Value>| {
                let mut args = args.0;
                args.push(piped);
                invoke(function, args)
            },
        );
    }
}

fn invoke(function: Function, args: Vec<Value>) -> Result<Value, Error> {
    let args = args
        .iter()
        .map(from_engine)
        .collect::<Result<Vec<_>, _>>()?;
    let out = function.call(&args).map_err(|e| to_engine(function, e))?;
    Ok(Value::from_serialize(&out))
}

/// Converts an engine value into a function library value.
pub fn from_engine(value: &Value) -> Result<tmpl_funcs::Value, Error> {
    if value.is_undefined() || value.is_none() {
        return Ok(tmpl_funcs::Value::Nil);
    }
    serde_json::to_value(value)
        .and_then(serde_json::from_value)
        .map_err(|e| {
            Error::new(
                ErrorKind::BadSerialization,
                format!("cannot pass {} to a function: {}", value.kind(), e),
            )
        })
}

fn to_engine(function: Function, err: FuncError) -> Error {
    Error::new(
        ErrorKind::InvalidOperation,
        format!("error calling {}: {}", function.name(), err),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmpl_funcs::build_table;

    fn render(template: &str, options: RenderOptions) -> Result<String, Error> {
        let env = build_environment(&build_table(), options);
        env.render_str(template, minijinja::context! { NAME => "world" })
    }

    #[test]
    fn test_function_and_filter_forms_agree() {
        let opts = RenderOptions::default();
        assert_eq!(render("{{ upper(NAME) }}", opts).unwrap(), "WORLD");
        assert_eq!(render("{{ NAME | upper }}", opts).unwrap(), "WORLD");
    }

    #[test]
    fn test_filter_appends_piped_value() {
        let opts = RenderOptions::default();
        assert_eq!(
            render(r#"{{ "v1.2" | trimPrefix("v") }}"#, opts).unwrap(),
            "1.2"
        );
        assert_eq!(
            render(r#"{{ MISSING | default("none") }}"#, opts).unwrap(),
            "none"
        );
        assert_eq!(
            render(r#"{{ NAME | default("none") }}"#, opts).unwrap(),
            "world"
        );
    }

    #[test]
    fn test_function_errors_surface() {
        let err = render(r#"{{ fail("stop here") }}"#, RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("stop here"));
    }

    #[test]
    fn test_trailing_newline_kept() {
        assert_eq!(
            render("{{ NAME }}\n", RenderOptions::default()).unwrap(),
            "world\n"
        );
    }

    #[test]
    fn test_missing_key_policies() {
        let strict = RenderOptions::default().missing_key(MissingKey::Error);
        assert!(render("{{ NOPE }}", strict).is_err());
        let lenient = RenderOptions::default();
        assert_eq!(render("[{{ NOPE }}]", lenient).unwrap(), "[]");
        let zero = RenderOptions::default().missing_key(MissingKey::Zero);
        assert_eq!(render("[{{ NOPE.deeper }}]", zero).unwrap(), "[]");
    }

    #[test]
    fn test_html_escaping() {
        let env = build_environment(&build_table(), RenderOptions::default().html(true));
        let out = env
            .render_str("{{ v }}", minijinja::context! { v => "<b>" })
            .unwrap();
        assert_eq!(out, "&lt;b&gt;");
    }
}
