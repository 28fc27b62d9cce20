//! Process environment and network lookups.

use std::net::ToSocketAddrs;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::FuncResult;
use crate::function::{Args, Arity, Function};

static ENV_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}]*)\}|\$([A-Za-z0-9_]+)").expect("env reference pattern is valid")
});

/// Replaces `$NAME` and `${NAME}` with environment values; unset variables
/// expand to the empty string.
pub fn expand_env(input: &str) -> String {
    ENV_REFERENCE
        .replace_all(input, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            std::env::var(name).unwrap_or_default()
        })
        .into_owned()
}

/// First address `name` resolves to, or an empty string.
pub fn lookup_host(name: &str) -> String {
    (name, 0)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default()
}

fn env(args: Args<'_>) -> FuncResult {
    Ok(std::env::var(args.text(0)).unwrap_or_default().into())
}

fn expandenv(args: Args<'_>) -> FuncResult {
    Ok(expand_env(&args.text(0)).into())
}

fn get_host_by_name(args: Args<'_>) -> FuncResult {
    Ok(lookup_host(&args.text(0)).into())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("env", Arity::Exact(1), env).impure(),
    Function::new("expandenv", Arity::Exact(1), expandenv).impure(),
    Function::new("getHostByName", Arity::Exact(1), get_host_by_name).impure(),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Args;
    use crate::value::Value;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_lookup() {
        std::env::set_var("TMPL_FUNCS_TEST_VAR", "hello");
        let out = env(Args::new(&["TMPL_FUNCS_TEST_VAR".into()])).unwrap();
        assert_eq!(out, Value::from("hello"));
        std::env::remove_var("TMPL_FUNCS_TEST_VAR");
        let out = env(Args::new(&["TMPL_FUNCS_TEST_VAR".into()])).unwrap();
        assert_eq!(out, Value::from(""));
    }

    #[test]
    #[serial]
    fn test_expand_env_forms() {
        std::env::set_var("TMPL_FUNCS_WHO", "world");
        std::env::remove_var("TMPL_FUNCS_UNSET");
        assert_eq!(expand_env("hello $TMPL_FUNCS_WHO"), "hello world");
        assert_eq!(expand_env("hello ${TMPL_FUNCS_WHO}!"), "hello world!");
        assert_eq!(expand_env("[$TMPL_FUNCS_UNSET]"), "[]");
        std::env::remove_var("TMPL_FUNCS_WHO");
    }

    #[test]
    fn test_lookup_localhost() {
        let ip = lookup_host("localhost");
        assert!(ip.is_empty() || ip == "127.0.0.1" || ip == "::1");
    }
}
