//! Regular expression helpers.
//!
//! Lenient forms treat an invalid pattern as "no match" and hand back the
//! input unchanged where they would otherwise transform it. The `must*`
//! forms surface the compile error.

use regex::{NoExpand, Regex};

use crate::error::{FuncError, FuncResult};
use crate::function::{Args, Arity, Function};
use crate::value::Value;

/// Converts a count argument where any negative value means "no limit".
fn limit(n: i64) -> Option<usize> {
    usize::try_from(n).ok()
}

/// All non-overlapping matches, at most `n` of them when `n >= 0`.
pub fn find_all(re: &Regex, s: &str, n: i64) -> Vec<String> {
    let found = re.find_iter(s).map(|m| m.as_str().to_string());
    match limit(n) {
        Some(n) => found.take(n).collect(),
        None => found.collect(),
    }
}

/// Splits around matches into at most `n` pieces when `n >= 0`.
pub fn split(re: &Regex, s: &str, n: i64) -> Vec<String> {
    match limit(n) {
        Some(0) => Vec::new(),
        Some(n) => re.splitn(s, n).map(str::to_string).collect(),
        None => re.split(s).map(str::to_string).collect(),
    }
}

fn compile(args: &Args<'_>) -> Result<Regex, FuncError> {
    Ok(Regex::new(&args.text(0))?)
}

fn regex_match(args: Args<'_>) -> FuncResult {
    Ok(compile(&args)
        .map(|re| re.is_match(&args.text(1)))
        .unwrap_or(false)
        .into())
}

fn must_regex_match(args: Args<'_>) -> FuncResult {
    Ok(compile(&args)?.is_match(&args.text(1)).into())
}

fn regex_find_all(args: Args<'_>) -> FuncResult {
    Ok(compile(&args)
        .map(|re| find_all(&re, &args.text(1), args.int(2)))
        .unwrap_or_default()
        .into())
}

fn must_regex_find_all(args: Args<'_>) -> FuncResult {
    Ok(find_all(&compile(&args)?, &args.text(1), args.int(2)).into())
}

fn regex_find(args: Args<'_>) -> FuncResult {
    Ok(compile(&args)
        .ok()
        .and_then(|re| re.find(&args.text(1)).map(|m| m.as_str().to_string()))
        .unwrap_or_default()
        .into())
}

fn must_regex_find(args: Args<'_>) -> FuncResult {
    let re = compile(&args)?;
    let s = args.text(1);
    Ok(re.find(&s).map(|m| m.as_str()).unwrap_or_default().into())
}

fn regex_replace_all(args: Args<'_>) -> FuncResult {
    let s = args.text(1);
    Ok(match compile(&args) {
        Ok(re) => re.replace_all(&s, args.text(2).as_str()).into_owned(),
        Err(_) => s,
    }
    .into())
}

fn must_regex_replace_all(args: Args<'_>) -> FuncResult {
    let re = compile(&args)?;
    Ok(re
        .replace_all(&args.text(1), args.text(2).as_str())
        .into_owned()
        .into())
}

fn regex_replace_all_literal(args: Args<'_>) -> FuncResult {
    let s = args.text(1);
    let repl = args.text(2);
    Ok(match compile(&args) {
        Ok(re) => re.replace_all(&s, NoExpand(&repl)).into_owned(),
        Err(_) => s,
    }
    .into())
}

fn must_regex_replace_all_literal(args: Args<'_>) -> FuncResult {
    let re = compile(&args)?;
    let repl = args.text(2);
    Ok(re
        .replace_all(&args.text(1), NoExpand(&repl))
        .into_owned()
        .into())
}

fn regex_split(args: Args<'_>) -> FuncResult {
    let s = args.text(1);
    Ok(match compile(&args) {
        Ok(re) => split(&re, &s, args.int(2)),
        Err(_) => vec![s],
    }
    .into())
}

fn must_regex_split(args: Args<'_>) -> FuncResult {
    Ok(split(&compile(&args)?, &args.text(1), args.int(2)).into())
}

fn regex_quote_meta(args: Args<'_>) -> FuncResult {
    Ok(regex::escape(&args.text(0)).into())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("regexMatch", Arity::Exact(2), regex_match),
    Function::new("mustRegexMatch", Arity::Exact(2), must_regex_match),
    Function::new("regexFindAll", Arity::Exact(3), regex_find_all),
    Function::new("mustRegexFindAll", Arity::Exact(3), must_regex_find_all),
    Function::new("regexFind", Arity::Exact(2), regex_find),
    Function::new("mustRegexFind", Arity::Exact(2), must_regex_find),
    Function::new("regexReplaceAll", Arity::Exact(3), regex_replace_all),
    Function::new("mustRegexReplaceAll", Arity::Exact(3), must_regex_replace_all),
    Function::new("regexReplaceAllLiteral", Arity::Exact(3), regex_replace_all_literal),
    Function::new(
        "mustRegexReplaceAllLiteral",
        Arity::Exact(3),
        must_regex_replace_all_literal,
    ),
    Function::new("regexSplit", Arity::Exact(3), regex_split),
    Function::new("mustRegexSplit", Arity::Exact(3), must_regex_split),
    Function::new("regexQuoteMeta", Arity::Exact(1), regex_quote_meta),
];
