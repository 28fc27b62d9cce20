//! String functions.
//!
//! The operand being transformed is always the last argument so that the
//! piped form reads naturally: `name | trunc(5)` calls `trunc(5, name)`.

use std::collections::BTreeMap;

use heck::{ToKebabCase, ToSnakeCase, ToUpperCamelCase};

use crate::error::{FuncError, FuncResult};
use crate::function::{Args, Arity, Function};
use crate::value::Value;

/// Largest string `repeat`, `indent` and `nindent` will build.
const MAX_GROWN_LEN: usize = 1 << 26;

/// Size of `unit` repeated `count` times, refusing anything over
/// [`MAX_GROWN_LEN`].
fn grown_len(unit: usize, count: i64) -> Result<usize, FuncError> {
    usize::try_from(count.max(0))
        .ok()
        .and_then(|count| unit.checked_mul(count))
        .filter(|len| *len <= MAX_GROWN_LEN)
        .ok_or_else(|| {
            FuncError::conversion(format!(
                "{} copies of {} bytes exceed the limit of {} bytes",
                count, unit, MAX_GROWN_LEN
            ))
        })
}

/// Truncates `s` to `width` characters, ending with `...`.
///
/// Widths below 4 leave the string untouched.
pub fn abbreviate(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if width < 4 || len <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

/// Abbreviates on both sides, keeping the text starting near `offset`.
pub fn abbreviate_both(s: &str, offset: usize, width: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    if width < 4 || (offset > 0 && width < 7) || len <= width {
        return s.to_string();
    }
    let mut offset = offset.min(len);
    if len - offset < width - 3 {
        offset = len - (width - 3);
    }
    if offset <= 4 {
        let mut out: String = chars[..width - 3].iter().collect();
        out.push_str("...");
        return out;
    }
    if offset + width - 3 < len {
        let tail: String = chars[offset..].iter().collect();
        return format!("...{}", abbreviate(&tail, width - 3));
    }
    let tail: String = chars[len - (width - 3)..].iter().collect();
    format!("...{}", tail)
}

/// Wraps on whitespace so no line exceeds `width`, except single words
/// longer than `width` which are kept whole.
pub fn wrap_words(s: &str, width: usize, newline: &str) -> String {
    let width = width.max(1);
    let mut out = String::new();
    for (i, line) in s.split('\n').enumerate() {
        if i > 0 {
            out.push_str(newline);
        }
        let mut current = 0;
        for (j, word) in line.split_whitespace().enumerate() {
            let word_len = word.chars().count();
            if j > 0 {
                if current + 1 + word_len > width {
                    out.push_str(newline);
                    current = 0;
                } else {
                    out.push(' ');
                    current += 1;
                }
            }
            out.push_str(word);
            current += word_len;
        }
    }
    out
}

fn map_words(s: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word = String::new();
    for c in s.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                out.push_str(&f(&word));
                word.clear();
            }
            out.push(c);
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        out.push_str(&f(&word));
    }
    out
}

fn with_first(word: &str, f: impl Fn(char) -> String) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}

/// Upper-cases the first letter of every whitespace-separated word.
pub fn title_case(s: &str) -> String {
    map_words(s, |w| with_first(w, |c| c.to_uppercase().collect()))
}

fn abbrev(args: Args<'_>) -> FuncResult {
    let width = args.int(0).max(0) as usize;
    Ok(abbreviate(&args.text(1), width).into())
}

fn abbrevboth(args: Args<'_>) -> FuncResult {
    let offset = args.int(0).max(0) as usize;
    let width = args.int(1).max(0) as usize;
    Ok(abbreviate_both(&args.text(2), offset, width).into())
}

fn trunc(args: Args<'_>) -> FuncResult {
    let n = args.int(0);
    let s = args.text(1);
    let len = s.chars().count() as i64;
    let out: String = if n < 0 && len + n > 0 {
        s.chars().skip((len + n) as usize).collect()
    } else if n >= 0 && len > n {
        s.chars().take(n as usize).collect()
    } else {
        s
    };
    Ok(out.into())
}

fn trim(args: Args<'_>) -> FuncResult {
    Ok(args.text(0).trim().into())
}

fn upper(args: Args<'_>) -> FuncResult {
    Ok(args.text(0).to_uppercase().into())
}

fn lower(args: Args<'_>) -> FuncResult {
    Ok(args.text(0).to_lowercase().into())
}

fn title(args: Args<'_>) -> FuncResult {
    Ok(title_case(&args.text(0)).into())
}

fn untitle(args: Args<'_>) -> FuncResult {
    Ok(map_words(&args.text(0), |w| with_first(w, |c| c.to_lowercase().collect())).into())
}

fn substr(args: Args<'_>) -> FuncResult {
    let chars: Vec<char> = args.text(2).chars().collect();
    let len = chars.len() as i64;
    let (start, end) = (args.int(0), args.int(1));
    let start = start.clamp(0, len) as usize;
    let end = (if end < 0 || end > len { len } else { end }) as usize;
    if start >= end {
        return Ok("".into());
    }
    Ok(chars[start..end].iter().collect::<String>().into())
}

fn repeat(args: Args<'_>) -> FuncResult {
    let text = args.text(1);
    let count = args.int(0).max(0);
    grown_len(text.len(), count)?;
    Ok(text.repeat(count as usize).into())
}

fn trim_all(args: Args<'_>) -> FuncResult {
    let cutset: Vec<char> = args.text(0).chars().collect();
    Ok(args.text(1).trim_matches(cutset.as_slice()).into())
}

fn trim_suffix(args: Args<'_>) -> FuncResult {
    let suffix = args.text(0);
    let s = args.text(1);
    Ok(s.strip_suffix(suffix.as_str()).unwrap_or(s.as_str()).into())
}

fn trim_prefix(args: Args<'_>) -> FuncResult {
    let prefix = args.text(0);
    let s = args.text(1);
    Ok(s.strip_prefix(prefix.as_str()).unwrap_or(s.as_str()).into())
}

fn nospace(args: Args<'_>) -> FuncResult {
    Ok(args
        .text(0)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .into())
}

fn initials(args: Args<'_>) -> FuncResult {
    Ok(args
        .text(0)
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .into())
}

fn swapcase(args: Args<'_>) -> FuncResult {
    let out: String = args
        .text(0)
        .chars()
        .flat_map(|c| -> Vec<char> {
            if c.is_uppercase() {
                c.to_lowercase().collect()
            } else if c.is_lowercase() {
                c.to_uppercase().collect()
            } else {
                vec![c]
            }
        })
        .collect();
    Ok(out.into())
}

fn snakecase(args: Args<'_>) -> FuncResult {
    Ok(args.text(0).to_snake_case().into())
}

fn camelcase(args: Args<'_>) -> FuncResult {
    Ok(args.text(0).to_upper_camel_case().into())
}

fn kebabcase(args: Args<'_>) -> FuncResult {
    Ok(args.text(0).to_kebab_case().into())
}

fn wrap(args: Args<'_>) -> FuncResult {
    let width = args.int(0).max(1) as usize;
    Ok(wrap_words(&args.text(1), width, "\n").into())
}

fn wrap_with(args: Args<'_>) -> FuncResult {
    let width = args.int(0).max(1) as usize;
    Ok(wrap_words(&args.text(2), width, &args.text(1)).into())
}

fn contains(args: Args<'_>) -> FuncResult {
    Ok(args.text(1).contains(args.text(0).as_str()).into())
}

fn has_prefix(args: Args<'_>) -> FuncResult {
    Ok(args.text(1).starts_with(args.text(0).as_str()).into())
}

fn has_suffix(args: Args<'_>) -> FuncResult {
    Ok(args.text(1).ends_with(args.text(0).as_str()).into())
}

fn quote(args: Args<'_>) -> FuncResult {
    let quoted: Vec<String> = args
        .all()
        .iter()
        .filter(|v| !v.is_nil())
        .map(|v| format!("{:?}", v.to_text()))
        .collect();
    Ok(quoted.join(" ").into())
}

fn squote(args: Args<'_>) -> FuncResult {
    let quoted: Vec<String> = args
        .all()
        .iter()
        .filter(|v| !v.is_nil())
        .map(|v| format!("'{}'", v.to_text()))
        .collect();
    Ok(quoted.join(" ").into())
}

fn cat(args: Args<'_>) -> FuncResult {
    let parts: Vec<String> = args
        .all()
        .iter()
        .filter(|v| !v.is_nil())
        .map(Value::to_text)
        .collect();
    Ok(parts.join(" ").into())
}

fn indent_text(spaces: i64, s: &str) -> Result<String, FuncError> {
    let lines = s.matches('\n').count() + 1;
    grown_len(lines, spaces)?;
    let pad = " ".repeat(spaces.max(0) as usize);
    Ok(format!("{}{}", pad, s.replace('\n', &format!("\n{}", pad))))
}

fn indent(args: Args<'_>) -> FuncResult {
    Ok(indent_text(args.int(0), &args.text(1))?.into())
}

fn nindent(args: Args<'_>) -> FuncResult {
    Ok(format!("\n{}", indent_text(args.int(0), &args.text(1))?).into())
}

fn replace(args: Args<'_>) -> FuncResult {
    Ok(args
        .text(2)
        .replace(args.text(0).as_str(), &args.text(1))
        .into())
}

fn plural(args: Args<'_>) -> FuncResult {
    let pick = if args.int(2) == 1 { 0 } else { 1 };
    Ok(args.text(pick).into())
}

fn split_map<'s>(parts: impl Iterator<Item = &'s str>) -> Value {
    let map: BTreeMap<String, Value> = parts
        .enumerate()
        .map(|(i, p)| (i.to_string(), Value::from(p)))
        .collect();
    Value::Map(map)
}

fn split(args: Args<'_>) -> FuncResult {
    let sep = args.text(0);
    let s = args.text(1);
    Ok(split_map(s.split(sep.as_str())))
}

fn splitn(args: Args<'_>) -> FuncResult {
    let sep = args.text(0);
    let n = args.int(1);
    let s = args.text(2);
    if n <= 0 {
        return Ok(Value::Map(BTreeMap::new()));
    }
    Ok(split_map(s.splitn(n as usize, sep.as_str())))
}

fn split_list(args: Args<'_>) -> FuncResult {
    let sep = args.text(0);
    Ok(args.text(1).split(sep.as_str()).map(Value::from).collect())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("abbrev", Arity::Exact(2), abbrev),
    Function::new("abbrevboth", Arity::Exact(3), abbrevboth),
    Function::new("trunc", Arity::Exact(2), trunc),
    Function::new("trim", Arity::Exact(1), trim),
    Function::new("upper", Arity::Exact(1), upper),
    Function::new("lower", Arity::Exact(1), lower),
    Function::new("title", Arity::Exact(1), title),
    Function::new("untitle", Arity::Exact(1), untitle),
    Function::new("substr", Arity::Exact(3), substr),
    Function::new("repeat", Arity::Exact(2), repeat),
    Function::new("trimall", Arity::Exact(2), trim_all),
    Function::new("trimAll", Arity::Exact(2), trim_all),
    Function::new("trimSuffix", Arity::Exact(2), trim_suffix),
    Function::new("trimPrefix", Arity::Exact(2), trim_prefix),
    Function::new("nospace", Arity::Exact(1), nospace),
    Function::new("initials", Arity::Exact(1), initials),
    Function::new("swapcase", Arity::Exact(1), swapcase),
    Function::new("snakecase", Arity::Exact(1), snakecase),
    Function::new("camelcase", Arity::Exact(1), camelcase),
    Function::new("kebabcase", Arity::Exact(1), kebabcase),
    Function::new("wrap", Arity::Exact(2), wrap),
    Function::new("wrapWith", Arity::Exact(3), wrap_with),
    Function::new("contains", Arity::Exact(2), contains),
    Function::new("hasPrefix", Arity::Exact(2), has_prefix),
    Function::new("hasSuffix", Arity::Exact(2), has_suffix),
    Function::new("quote", Arity::AtLeast(0), quote),
    Function::new("squote", Arity::AtLeast(0), squote),
    Function::new("cat", Arity::AtLeast(0), cat),
    Function::new("indent", Arity::Exact(2), indent),
    Function::new("nindent", Arity::Exact(2), nindent),
    Function::new("replace", Arity::Exact(3), replace),
    Function::new("plural", Arity::Exact(3), plural),
    Function::new("split", Arity::Exact(2), split),
    Function::new("splitn", Arity::Exact(3), splitn),
    Function::new("splitList", Arity::Exact(2), split_list),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn call(f: fn(Args<'_>) -> FuncResult, args: &[Value]) -> Value {
        f(Args::new(args)).unwrap()
    }

    fn call_result(f: fn(Args<'_>) -> FuncResult, args: &[Value]) -> FuncResult {
        f(Args::new(args))
    }

    #[test]
    fn test_abbrev() {
        assert_eq!(abbreviate("hello world", 5), "he...");
        assert_eq!(abbreviate("hello", 10), "hello");
        assert_eq!(abbreviate("hello world", 3), "hello world");
    }

    #[test]
    fn test_abbrevboth() {
        assert_eq!(abbreviate_both("abcdefghijklmno", 5, 10), "...fghi...");
        assert_eq!(abbreviate_both("abcdefghijklmno", 0, 10), "abcdefg...");
        assert_eq!(abbreviate_both("abcdefghijklmno", 12, 10), "...ijklmno");
    }

    #[test]
    fn test_trunc_both_directions() {
        assert_eq!(call(trunc, &[5.into(), "hello world".into()]), Value::from("hello"));
        assert_eq!(call(trunc, &[(-5).into(), "hello world".into()]), Value::from("world"));
        assert_eq!(call(trunc, &[50.into(), "short".into()]), Value::from("short"));
    }

    #[test]
    fn test_substr_bounds() {
        let s = Value::from("hello");
        assert_eq!(call(substr, &[1.into(), 3.into(), s.clone()]), Value::from("el"));
        assert_eq!(call(substr, &[1.into(), (-1).into(), s.clone()]), Value::from("ello"));
        assert_eq!(call(substr, &[4.into(), 2.into(), s]), Value::from(""));
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(call(snakecase, &["FirstName".into()]), Value::from("first_name"));
        assert_eq!(call(camelcase, &["http_server".into()]), Value::from("HttpServer"));
        assert_eq!(call(kebabcase, &["FirstName".into()]), Value::from("first-name"));
        assert_eq!(call(title, &["hello world".into()]), Value::from("Hello World"));
        assert_eq!(call(untitle, &["Hello World".into()]), Value::from("hello world"));
        assert_eq!(call(swapcase, &["Hello".into()]), Value::from("hELLO"));
        assert_eq!(call(initials, &["First Try".into()]), Value::from("FT"));
    }

    #[test]
    fn test_wrap_keeps_long_words() {
        assert_eq!(wrap_words("the quick brown fox", 10, "\n"), "the quick\nbrown fox");
        assert_eq!(wrap_words("supercalifragilistic ok", 5, "\n"), "supercalifragilistic\nok");
        assert_eq!(wrap_words("a b", 1, "<br>"), "a<br>b");
    }

    #[test]
    fn test_huge_counts_fail_instead_of_allocating() {
        for count in [i64::MAX, 1 << 40] {
            assert!(matches!(
                call_result(repeat, &[count.into(), "ab".into()]),
                Err(FuncError::Conversion(_))
            ));
            assert!(matches!(
                call_result(indent, &[count.into(), "a\nb".into()]),
                Err(FuncError::Conversion(_))
            ));
            assert!(call_result(nindent, &[count.into(), "a".into()]).is_err());
        }
        assert_eq!(call(repeat, &[3.into(), "ab".into()]), Value::from("ababab"));
        assert_eq!(call(repeat, &[(-1).into(), "ab".into()]), Value::from(""));
        assert_eq!(call(repeat, &[i64::MAX.into(), "".into()]), Value::from(""));
    }

    #[test]
    fn test_indent_and_nindent() {
        assert_eq!(call(indent, &[2.into(), "a\nb".into()]), Value::from("  a\n  b"));
        assert_eq!(call(nindent, &[2.into(), "a".into()]), Value::from("\n  a"));
    }

    #[test]
    fn test_quote_skips_nil() {
        let out = call(quote, &["a".into(), Value::Nil, 1.into()]);
        assert_eq!(out, Value::from("\"a\" \"1\""));
        assert_eq!(call(squote, &["a".into()]), Value::from("'a'"));
        assert_eq!(call(cat, &["a".into(), Value::Nil, "b".into()]), Value::from("a b"));
    }

    #[test]
    fn test_split_forms() {
        let m = call(split, &["$".into(), "foo$bar$baz".into()]);
        assert_eq!(m.as_map().unwrap()["1"], Value::from("bar"));
        assert!(!m.as_map().unwrap().contains_key("_1"));
        let m = call(splitn, &["$".into(), 2.into(), "foo$bar$baz".into()]);
        assert_eq!(m.as_map().unwrap()["1"], Value::from("bar$baz"));
        let l = call(split_list, &[",".into(), "a,b".into()]);
        assert_eq!(l, Value::from(vec!["a", "b"]));
    }

    #[test]
    fn test_replace_and_plural() {
        assert_eq!(
            call(replace, &[" ".into(), "-".into(), "a b c".into()]),
            Value::from("a-b-c")
        );
        assert_eq!(
            call(plural, &["one".into(), "many".into(), 1.into()]),
            Value::from("one")
        );
        assert_eq!(
            call(plural, &["one".into(), "many".into(), 2.into()]),
            Value::from("many")
        );
    }

    #[test]
    fn test_trim_family() {
        assert_eq!(call(trim_all, &["$".into(), "$5.00$".into()]), Value::from("5.00"));
        assert_eq!(call(trim_suffix, &["-".into(), "hello-".into()]), Value::from("hello"));
        assert_eq!(call(trim_prefix, &["-".into(), "-hello".into()]), Value::from("hello"));
        assert_eq!(call(nospace, &["a b  c".into()]), Value::from("abc"));
    }
}
