//! URL decomposition and reference resolution.

use url::Url;

use crate::error::FuncResult;
use crate::function::{Args, Arity, Function};
use crate::value::Value;

/// Splits an absolute URL into its parts. Unparseable input yields an empty
/// mapping.
pub fn parse_parts(input: &str) -> Value {
    let Ok(url) = Url::parse(input) else {
        return Value::map(Vec::<(String, Value)>::new());
    };
    let hostname = url.host_str().unwrap_or_default().to_string();
    let port = url.port().map(|p| p.to_string()).unwrap_or_default();
    let host = if port.is_empty() {
        hostname.clone()
    } else {
        format!("{}:{}", hostname, port)
    };
    let userinfo = match url.password() {
        Some(password) => format!("{}:{}", url.username(), password),
        None => url.username().to_string(),
    };
    Value::map([
        ("scheme", url.scheme().to_string()),
        ("host", host),
        ("hostname", hostname),
        ("port", port),
        ("path", url.path().to_string()),
        ("query", url.query().unwrap_or_default().to_string()),
        ("fragment", url.fragment().unwrap_or_default().to_string()),
        ("userinfo", userinfo),
    ])
}

/// Resolves `reference` against `base`. Returns an empty string when the
/// base is not an absolute URL.
pub fn join(base: &str, reference: &str) -> String {
    Url::parse(base)
        .and_then(|b| b.join(reference))
        .map(String::from)
        .unwrap_or_default()
}

fn url_parse(args: Args<'_>) -> FuncResult {
    Ok(parse_parts(&args.text(0)))
}

fn url_join(args: Args<'_>) -> FuncResult {
    Ok(join(&args.text(0), &args.text(1)).into())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("urlParse", Arity::Exact(1), url_parse),
    Function::new("urlJoin", Arity::Exact(2), url_join),
];
