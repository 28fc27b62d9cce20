//! Path helpers.
//!
//! `base`, `dir`, `clean`, `ext` and `isAbs` work on slash-separated paths
//! regardless of platform. The `os*` variants use the host's conventions.

use std::path::{Path, MAIN_SEPARATOR};

use crate::error::FuncResult;
use crate::function::{Args, Arity, Function};

/// Lexically normalizes a slash path: collapses repeated separators and
/// resolves `.` and `..` without touching the filesystem.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Last element of a slash path, ignoring trailing slashes.
pub fn base(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    match trimmed.rfind('/') {
        Some(i) => trimmed[i + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Everything but the last element, cleaned.
pub fn dir(path: &str) -> String {
    match path.rfind('/') {
        Some(i) => clean(&path[..=i]),
        None => ".".to_string(),
    }
}

/// Extension of the last element including the dot, or empty.
pub fn ext(path: &str) -> String {
    for (i, c) in path.char_indices().rev() {
        match c {
            '/' => break,
            '.' => return path[i..].to_string(),
            _ => {}
        }
    }
    String::new()
}

fn to_slash(path: &str) -> String {
    if MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(MAIN_SEPARATOR, "/")
    }
}

fn from_slash(path: String) -> String {
    if MAIN_SEPARATOR == '/' {
        path
    } else {
        path.replace('/', &MAIN_SEPARATOR.to_string())
    }
}

fn base_fn(args: Args<'_>) -> FuncResult {
    Ok(base(&args.text(0)).into())
}

fn dir_fn(args: Args<'_>) -> FuncResult {
    Ok(dir(&args.text(0)).into())
}

fn clean_fn(args: Args<'_>) -> FuncResult {
    Ok(clean(&args.text(0)).into())
}

fn ext_fn(args: Args<'_>) -> FuncResult {
    Ok(ext(&args.text(0)).into())
}

fn is_abs(args: Args<'_>) -> FuncResult {
    Ok(args.text(0).starts_with('/').into())
}

fn os_base(args: Args<'_>) -> FuncResult {
    Ok(from_slash(base(&to_slash(&args.text(0)))).into())
}

fn os_dir(args: Args<'_>) -> FuncResult {
    Ok(from_slash(dir(&to_slash(&args.text(0)))).into())
}

fn os_clean(args: Args<'_>) -> FuncResult {
    Ok(from_slash(clean(&to_slash(&args.text(0)))).into())
}

fn os_ext(args: Args<'_>) -> FuncResult {
    Ok(ext(&to_slash(&args.text(0))).into())
}

fn os_is_abs(args: Args<'_>) -> FuncResult {
    Ok(Path::new(&args.text(0)).is_absolute().into())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("base", Arity::Exact(1), base_fn),
    Function::new("dir", Arity::Exact(1), dir_fn),
    Function::new("clean", Arity::Exact(1), clean_fn),
    Function::new("ext", Arity::Exact(1), ext_fn),
    Function::new("isAbs", Arity::Exact(1), is_abs),
    Function::new("osBase", Arity::Exact(1), os_base),
    Function::new("osDir", Arity::Exact(1), os_dir),
    Function::new("osClean", Arity::Exact(1), os_clean),
    Function::new("osExt", Arity::Exact(1), os_ext),
    Function::new("osIsAbs", Arity::Exact(1), os_is_abs),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean("a//b/./c/.."), "a/b");
        assert_eq!(clean("/../a"), "/a");
        assert_eq!(clean("../../x"), "../../x");
        assert_eq!(clean("a/.."), ".");
        assert_eq!(clean(""), ".");
        assert_eq!(clean("/"), "/");
    }

    #[test]
    fn test_base_and_dir() {
        assert_eq!(base("/foo/bar/baz.js"), "baz.js");
        assert_eq!(base("/foo/bar/"), "bar");
        assert_eq!(base("///"), "/");
        assert_eq!(base(""), ".");
        assert_eq!(dir("/foo/bar/baz"), "/foo/bar");
        assert_eq!(dir("baz"), ".");
        assert_eq!(dir("/baz"), "/");
    }

    #[test]
    fn test_ext() {
        assert_eq!(ext("/foo/bar/baz.tar.gz"), ".gz");
        assert_eq!(ext("/foo.d/bar"), "");
        assert_eq!(ext("noext"), "");
    }
}
