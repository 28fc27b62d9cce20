//! Semantic version parsing and constraint checks.

use std::cmp::Ordering;

use semver::Version;

use crate::error::FuncResult;
use crate::function::{Args, Arity, Function};
use crate::value::Value;

/// Parses a version, accepting an optional `v` prefix and the `1` / `1.2`
/// shorthands, which are padded with zero components.
pub fn parse_loose(input: &str) -> Option<Version> {
    let body = input.strip_prefix('v').unwrap_or(input);
    let split = body.find(&['-', '+'][..]).unwrap_or(body.len());
    let (core, suffix) = body.split_at(split);
    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    // Shorthands cannot carry prerelease or build data.
    if parts.len() < 3 && !suffix.is_empty() {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }
    Version::parse(&format!("{}{}", parts.join("."), suffix)).ok()
}

/// Orders two version strings by semver precedence.
///
/// An invalid version sorts below any valid one and all invalid versions
/// compare equal. Build metadata is ignored.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (parse_loose(a), parse_loose(b)) {
        (Some(a), Some(b)) => a.cmp_precedence(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Checks `version` against a constraint such as `>=1.2.0` or `^1.2.0`.
///
/// A constraint without an operator, or with nothing after it, is an
/// equality check against the whole constraint. `^` requires the same major
/// version and a version at or above the constraint.
pub fn satisfies(constraint: &str, version: &str) -> bool {
    if constraint.is_empty() {
        return false;
    }
    let (op, target) = split_operator(constraint);
    let ord = compare(version, target);
    match op {
        "=" | "==" => ord == Ordering::Equal,
        "!=" => ord != Ordering::Equal,
        "<" => ord == Ordering::Less,
        "<=" => ord != Ordering::Greater,
        ">" => ord == Ordering::Greater,
        ">=" => ord != Ordering::Less,
        "^" => {
            let major = |s: &str| parse_loose(s).map(|v| v.major);
            major(target) == major(version) && ord != Ordering::Less
        }
        _ => false,
    }
}

fn split_operator(constraint: &str) -> (&str, &str) {
    const OPERATORS: [&str; 8] = [">=", "<=", "==", "!=", "<", ">", "=", "^"];
    for op in OPERATORS {
        if let Some(rest) = constraint.strip_prefix(op) {
            let rest = rest.trim_start();
            if rest.is_empty() {
                return ("=", constraint);
            }
            return (op, rest);
        }
    }
    ("=", constraint)
}

fn semver_fn(args: Args<'_>) -> FuncResult {
    let text = args.text(0);
    let body = text.strip_prefix('v').unwrap_or(&text);
    // Only fully written versions are decomposed.
    let Ok(v) = Version::parse(body) else {
        return Ok(Value::Nil);
    };
    Ok(Value::map([
        ("Major", Value::Int(v.major as i64)),
        ("Minor", Value::Int(v.minor as i64)),
        ("Patch", Value::Int(v.patch as i64)),
        ("Prerelease", Value::from(v.pre.as_str())),
        ("Metadata", Value::from(v.build.as_str())),
    ]))
}

fn semver_compare(args: Args<'_>) -> FuncResult {
    Ok(satisfies(&args.text(0), &args.text(1)).into())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("semver", Arity::Exact(1), semver_fn),
    Function::new("semverCompare", Arity::Exact(2), semver_compare),
];
