//! Sequence and mapping utilities.
//!
//! Lenient list functions return nil when handed something that is not a
//! sequence. Their `must*` siblings report a [`FuncError::Conversion`]
//! instead, and `mustFirst`/`mustLast`/`mustChunk` also reject the inputs for
//! which the lenient form silently returns nothing.
//!
//! Values handed to template functions are immutable, so `set`, `unset` and
//! `merge` return an updated mapping rather than editing their argument in
//! place. Rust callers that want the in-place form use [`merge`] directly.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{FuncError, FuncResult};
use crate::function::{Args, Arity, Function};
use crate::generic::{equal, is_empty, to_int};
use crate::value::Value;

/// Resolves Python-style `start`/`end` bounds against a length.
///
/// Negative indices count from the end, both bounds are clamped into
/// `[0, len]`, and an inverted range collapses to empty.
pub fn slice_range(len: usize, start: Option<i64>, end: Option<i64>) -> Range<usize> {
    let len_i = len as i64;
    let resolve = |idx: i64| -> usize {
        let idx = if idx < 0 { len_i + idx } else { idx };
        idx.clamp(0, len_i) as usize
    };
    let lo = start.map(resolve).unwrap_or(0);
    let hi = end.map(resolve).unwrap_or(len);
    if lo >= hi {
        lo..lo
    } else {
        lo..hi
    }
}

/// Half-open slice of `items`; never panics on out-of-range bounds.
pub fn slice(items: &[Value], start: Option<i64>, end: Option<i64>) -> Vec<Value> {
    items[slice_range(items.len(), start, end)].to_vec()
}

/// Splits `items` into groups of `size`; the last group may be shorter.
///
/// Returns `None` when `size` is not positive.
pub fn chunk(size: i64, items: &[Value]) -> Option<Vec<Value>> {
    if size <= 0 {
        return None;
    }
    Some(
        items
            .chunks(size as usize)
            .map(|group| Value::Seq(group.to_vec()))
            .collect(),
    )
}

/// Stable deduplication by structural equality; the first occurrence wins.
pub fn uniq(items: &[Value]) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !out.iter().any(|seen| equal(seen, item)) {
            out.push(item.clone());
        }
    }
    out
}

/// Copies every key of each source into `dst`, left to right, overwriting
/// existing keys. `dst` is modified in place and returned.
///
/// A `dst` that is not a mapping is left untouched.
pub fn merge<'a>(dst: &'a mut Value, srcs: &[Value]) -> &'a mut Value {
    if let Value::Map(target) = dst {
        for src in srcs {
            if let Value::Map(entries) = src.resolve() {
                for (k, v) in entries {
                    target.insert(k.clone(), v.clone());
                }
            }
        }
    }
    dst
}

/// Walks a dot-separated key path through nested mappings.
///
/// Every segment but the last must resolve to a mapping; the last may resolve
/// to any value.
pub fn dig(path: &str, dict: &BTreeMap<String, Value>) -> Result<Value, FuncError> {
    let mut current = dict;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let value = current
            .get(segment)
            .ok_or_else(|| FuncError::KeyNotFound(segment.to_string()))?;
        if segments.peek().is_none() {
            return Ok(value.clone());
        }
        match value.resolve() {
            Value::Map(next) => current = next,
            _ => {
                let next = segments.peek().copied().unwrap_or_default();
                return Err(FuncError::KeyNotFound(next.to_string()));
            }
        }
    }
    Ok(Value::Map(current.clone()))
}

/// Converts a value to a list of strings.
pub fn to_strings(v: &Value) -> Vec<String> {
    match v.resolve() {
        Value::Seq(items) => items.iter().map(Value::to_text).collect(),
        Value::Nil => Vec::new(),
        other => vec![other.to_text()],
    }
}

fn seq_arg<'a>(args: &Args<'a>, index: usize) -> Option<&'a [Value]> {
    args.value(index).resolve().as_seq()
}

fn require_seq<'a>(args: &Args<'a>, index: usize, op: &str) -> Result<&'a [Value], FuncError> {
    let v = args.value(index);
    seq_arg(args, index)
        .ok_or_else(|| FuncError::conversion(format!("cannot {} on type {}", op, v.type_name())))
}

fn map_arg<'a>(args: &Args<'a>, index: usize) -> Option<&'a BTreeMap<String, Value>> {
    args.value(index).resolve().as_map()
}

fn list(args: Args<'_>) -> FuncResult {
    Ok(Value::Seq(args.all().to_vec()))
}

fn dict(args: Args<'_>) -> FuncResult {
    let mut map = BTreeMap::new();
    for pair in args.all().chunks(2) {
        let key = pair[0].to_text();
        let value = pair.get(1).cloned().unwrap_or_else(|| Value::from(""));
        map.insert(key, value);
    }
    Ok(Value::Map(map))
}

fn get(args: Args<'_>) -> FuncResult {
    Ok(map_arg(&args, 0)
        .and_then(|m| m.get(&args.text(1)))
        .cloned()
        .unwrap_or_else(|| Value::from("")))
}

fn set(args: Args<'_>) -> FuncResult {
    let mut map = map_arg(&args, 0).cloned().unwrap_or_default();
    map.insert(args.text(1), args.value(2).clone());
    Ok(Value::Map(map))
}

fn unset(args: Args<'_>) -> FuncResult {
    let mut map = map_arg(&args, 0).cloned().unwrap_or_default();
    map.remove(&args.text(1));
    Ok(Value::Map(map))
}

fn has_key(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(
        map_arg(&args, 0).is_some_and(|m| m.contains_key(&args.text(1))),
    ))
}

fn pluck(args: Args<'_>) -> FuncResult {
    let key = args.text(0);
    Ok(args
        .rest(1)
        .iter()
        .filter_map(|d| d.resolve().as_map().and_then(|m| m.get(&key)).cloned())
        .collect())
}

fn keys(args: Args<'_>) -> FuncResult {
    Ok(args
        .all()
        .iter()
        .filter_map(|d| d.resolve().as_map())
        .flat_map(|m| m.keys().cloned().map(Value::Str))
        .collect())
}

fn values(args: Args<'_>) -> FuncResult {
    Ok(map_arg(&args, 0)
        .map(|m| m.values().cloned().collect())
        .unwrap_or_else(|| Value::Seq(Vec::new())))
}

fn pick(args: Args<'_>) -> FuncResult {
    let source = map_arg(&args, 0).cloned().unwrap_or_default();
    let picked = args
        .rest(1)
        .iter()
        .filter_map(|k| {
            let key = k.to_text();
            source.get(&key).map(|v| (key, v.clone()))
        })
        .collect();
    Ok(Value::Map(picked))
}

fn omit(args: Args<'_>) -> FuncResult {
    let dropped: Vec<String> = args.rest(1).iter().map(Value::to_text).collect();
    let kept = map_arg(&args, 0)
        .map(|m| {
            m.iter()
                .filter(|(k, _)| !dropped.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default();
    Ok(Value::Map(kept))
}

fn merge_fn(args: Args<'_>) -> FuncResult {
    let mut dst = args.value(0).resolve().clone();
    merge(&mut dst, args.rest(1));
    Ok(dst)
}

fn must_merge(args: Args<'_>) -> FuncResult {
    let dst = args.value(0);
    if map_arg(&args, 0).is_none() {
        return Err(FuncError::conversion(format!(
            "cannot merge into type {}",
            dst.type_name()
        )));
    }
    merge_fn(args)
}

fn dig_fn(args: Args<'_>) -> FuncResult {
    match map_arg(&args, 1) {
        Some(dict) => dig(&args.text(0), dict),
        None => Err(FuncError::KeyNotFound(args.text(0))),
    }
}

fn push(args: Args<'_>) -> FuncResult {
    let mut items = seq_arg(&args, 0).map(<[Value]>::to_vec).unwrap_or_default();
    items.push(args.value(1).clone());
    Ok(Value::Seq(items))
}

fn must_push(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "push")?;
    push(args)
}

fn prepend(args: Args<'_>) -> FuncResult {
    let mut items = vec![args.value(1).clone()];
    if let Some(rest) = seq_arg(&args, 0) {
        items.extend_from_slice(rest);
    }
    Ok(Value::Seq(items))
}

fn must_prepend(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "prepend")?;
    prepend(args)
}

fn first(args: Args<'_>) -> FuncResult {
    Ok(seq_arg(&args, 0)
        .and_then(|items| items.first())
        .cloned()
        .unwrap_or(Value::Nil))
}

fn must_first(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "find first")?
        .first()
        .cloned()
        .ok_or_else(|| FuncError::conversion("cannot get first element of empty list"))
}

fn rest(args: Args<'_>) -> FuncResult {
    Ok(seq_arg(&args, 0)
        .map(|items| Value::Seq(items.get(1..).unwrap_or(&[]).to_vec()))
        .unwrap_or(Value::Nil))
}

fn must_rest(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "find rest")?;
    rest(args)
}

fn last(args: Args<'_>) -> FuncResult {
    Ok(seq_arg(&args, 0)
        .and_then(|items| items.last())
        .cloned()
        .unwrap_or(Value::Nil))
}

fn must_last(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "find last")?
        .last()
        .cloned()
        .ok_or_else(|| FuncError::conversion("cannot get last element of empty list"))
}

fn initial(args: Args<'_>) -> FuncResult {
    Ok(seq_arg(&args, 0)
        .map(|items| Value::Seq(items[..items.len().saturating_sub(1)].to_vec()))
        .unwrap_or(Value::Nil))
}

fn must_initial(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "find initial")?;
    initial(args)
}

fn reverse(args: Args<'_>) -> FuncResult {
    Ok(seq_arg(&args, 0)
        .map(|items| items.iter().rev().cloned().collect())
        .unwrap_or(Value::Nil))
}

fn must_reverse(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "reverse")?;
    reverse(args)
}

fn uniq_fn(args: Args<'_>) -> FuncResult {
    Ok(seq_arg(&args, 0)
        .map(|items| Value::Seq(uniq(items)))
        .unwrap_or(Value::Nil))
}

fn must_uniq(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "find uniq")?;
    uniq_fn(args)
}

fn without(args: Args<'_>) -> FuncResult {
    let dropped = args.rest(1);
    Ok(seq_arg(&args, 0)
        .map(|items| {
            items
                .iter()
                .filter(|item| !dropped.iter().any(|d| equal(d, item)))
                .cloned()
                .collect()
        })
        .unwrap_or(Value::Nil))
}

fn must_without(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "find without")?;
    without(args)
}

fn has(args: Args<'_>) -> FuncResult {
    let needle = args.value(0);
    Ok(Value::Bool(
        seq_arg(&args, 1).is_some_and(|items| items.iter().any(|item| equal(item, needle))),
    ))
}

fn must_has(args: Args<'_>) -> FuncResult {
    require_seq(&args, 1, "find has")?;
    has(args)
}

fn slice_fn(args: Args<'_>) -> FuncResult {
    let start = args.all().get(1).map(to_int);
    let end = args.all().get(2).map(to_int);
    Ok(seq_arg(&args, 0)
        .map(|items| Value::Seq(slice(items, start, end)))
        .unwrap_or(Value::Nil))
}

fn must_slice(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "slice")?;
    slice_fn(args)
}

fn concat(args: Args<'_>) -> FuncResult {
    let mut out = Vec::new();
    for arg in args.all() {
        match arg.resolve() {
            Value::Seq(items) => out.extend_from_slice(items),
            other => out.push(other.clone()),
        }
    }
    Ok(Value::Seq(out))
}

fn chunk_fn(args: Args<'_>) -> FuncResult {
    Ok(seq_arg(&args, 1)
        .and_then(|items| chunk(args.int(0), items))
        .map(Value::Seq)
        .unwrap_or(Value::Nil))
}

fn must_chunk(args: Args<'_>) -> FuncResult {
    let items = require_seq(&args, 1, "chunk")?;
    let size = args.int(0);
    chunk(size, items)
        .map(Value::Seq)
        .ok_or_else(|| FuncError::conversion(format!("invalid chunk size {}", size)))
}

fn compact(args: Args<'_>) -> FuncResult {
    Ok(seq_arg(&args, 0)
        .map(|items| items.iter().filter(|v| !is_empty(v)).cloned().collect())
        .unwrap_or(Value::Nil))
}

fn must_compact(args: Args<'_>) -> FuncResult {
    require_seq(&args, 0, "compact")?;
    compact(args)
}

fn to_strings_fn(args: Args<'_>) -> FuncResult {
    Ok(to_strings(args.value(0)).into())
}

fn join(args: Args<'_>) -> FuncResult {
    Ok(Value::Str(to_strings(args.value(1)).join(&args.text(0))))
}

fn sort_alpha(args: Args<'_>) -> FuncResult {
    let mut items = to_strings(args.value(0));
    items.sort();
    Ok(items.into())
}

/// Largest sequence `until`, `untilStep` and `seq` will build.
const MAX_RANGE_LEN: i128 = 1 << 20;

/// Bound handling of a stepped range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Exclusive,
    Inclusive,
}

fn range_len(start: i64, stop: i64, step: i64, bound: Bound) -> i128 {
    let step = i128::from(step);
    let mut span = i128::from(stop) - i128::from(start);
    if bound == Bound::Inclusive {
        span += step.signum();
    }
    if step == 0 || span == 0 || (span > 0) != (step > 0) {
        return 0;
    }
    (span + step - step.signum()) / step
}

fn step_range(start: i64, stop: i64, step: i64, bound: Bound) -> FuncResult {
    let len = range_len(start, stop, step, bound);
    if len > MAX_RANGE_LEN {
        return Err(FuncError::conversion(format!(
            "range of {} elements exceeds the limit of {}",
            len, MAX_RANGE_LEN
        )));
    }
    let mut out = Vec::with_capacity(len as usize);
    let mut next = Some(start);
    while let Some(i) = next {
        if out.len() as i128 >= len {
            break;
        }
        out.push(Value::Int(i));
        // Stepping past the end of i64 ends the range.
        next = i.checked_add(step);
    }
    Ok(Value::Seq(out))
}

fn until(args: Args<'_>) -> FuncResult {
    let count = args.int(0);
    let step = if count < 0 { -1 } else { 1 };
    step_range(0, count, step, Bound::Exclusive)
}

fn until_step(args: Args<'_>) -> FuncResult {
    step_range(args.int(0), args.int(1), args.int(2), Bound::Exclusive)
}

/// `seq N`, `seq FIRST LAST` or `seq FIRST STEP LAST`, inclusive like seq(1).
fn seq(args: Args<'_>) -> FuncResult {
    let (start, stop, step) = match args.len() {
        1 => (1, args.int(0), 1),
        2 => {
            let (first, last) = (args.int(0), args.int(1));
            (first, last, if first <= last { 1 } else { -1 })
        }
        3 => (args.int(0), args.int(2), args.int(1)),
        _ => return Ok(Value::Seq(Vec::new())),
    };
    step_range(start, stop, step, Bound::Inclusive)
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("list", Arity::AtLeast(0), list),
    Function::new("tuple", Arity::AtLeast(0), list),
    Function::new("dict", Arity::AtLeast(0), dict),
    Function::new("get", Arity::Exact(2), get),
    Function::new("set", Arity::Exact(3), set),
    Function::new("unset", Arity::Exact(2), unset),
    Function::new("hasKey", Arity::Exact(2), has_key),
    Function::new("pluck", Arity::AtLeast(1), pluck),
    Function::new("keys", Arity::AtLeast(0), keys),
    Function::new("values", Arity::Exact(1), values),
    Function::new("pick", Arity::AtLeast(1), pick),
    Function::new("omit", Arity::AtLeast(1), omit),
    Function::new("merge", Arity::AtLeast(1), merge_fn),
    Function::new("mergeOverwrite", Arity::AtLeast(1), merge_fn),
    Function::new("mustMerge", Arity::AtLeast(1), must_merge),
    Function::new("mustMergeOverwrite", Arity::AtLeast(1), must_merge),
    Function::new("dig", Arity::Exact(2), dig_fn),
    Function::new("append", Arity::Exact(2), push),
    Function::new("push", Arity::Exact(2), push),
    Function::new("mustAppend", Arity::Exact(2), must_push),
    Function::new("mustPush", Arity::Exact(2), must_push),
    Function::new("prepend", Arity::Exact(2), prepend),
    Function::new("mustPrepend", Arity::Exact(2), must_prepend),
    Function::new("first", Arity::Exact(1), first),
    Function::new("mustFirst", Arity::Exact(1), must_first),
    Function::new("rest", Arity::Exact(1), rest),
    Function::new("mustRest", Arity::Exact(1), must_rest),
    Function::new("last", Arity::Exact(1), last),
    Function::new("mustLast", Arity::Exact(1), must_last),
    Function::new("initial", Arity::Exact(1), initial),
    Function::new("mustInitial", Arity::Exact(1), must_initial),
    Function::new("reverse", Arity::Exact(1), reverse),
    Function::new("mustReverse", Arity::Exact(1), must_reverse),
    Function::new("uniq", Arity::Exact(1), uniq_fn),
    Function::new("mustUniq", Arity::Exact(1), must_uniq),
    Function::new("without", Arity::AtLeast(1), without),
    Function::new("mustWithout", Arity::AtLeast(1), must_without),
    Function::new("has", Arity::Exact(2), has),
    Function::new("mustHas", Arity::Exact(2), must_has),
    Function::new("slice", Arity::Range(1, 3), slice_fn),
    Function::new("mustSlice", Arity::Range(1, 3), must_slice),
    Function::new("concat", Arity::AtLeast(0), concat),
    Function::new("chunk", Arity::Exact(2), chunk_fn),
    Function::new("mustChunk", Arity::Exact(2), must_chunk),
    Function::new("compact", Arity::Exact(1), compact),
    Function::new("mustCompact", Arity::Exact(1), must_compact),
    Function::new("toStrings", Arity::Exact(1), to_strings_fn),
    Function::new("join", Arity::Exact(2), join),
    Function::new("sortAlpha", Arity::Exact(1), sort_alpha),
    Function::new("until", Arity::Exact(1), until),
    Function::new("untilStep", Arity::Exact(3), until_step),
    Function::new("seq", Arity::AtLeast(0), seq),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Int).collect()
    }

    fn call(f: fn(Args<'_>) -> FuncResult, args: &[Value]) -> FuncResult {
        f(Args::new(args))
    }

    #[test]
    fn test_slice_negative_and_out_of_range() {
        let items = ints(&[1, 2, 3]);
        assert_eq!(slice(&items, Some(-2), Some(3)), ints(&[2, 3]));
        assert!(slice(&items, Some(100), Some(200)).is_empty());
        assert!(slice(&items, Some(2), Some(1)).is_empty());
        assert_eq!(slice(&items, None, None), items);
        assert_eq!(slice(&items, Some(1), None), ints(&[2, 3]));
    }

    #[test]
    fn test_chunk_sizes() {
        let groups = chunk(2, &ints(&[1, 2, 3, 4, 5])).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[2], Value::Seq(ints(&[5])));
        assert!(chunk(0, &ints(&[1])).is_none());
    }

    #[test]
    fn test_must_chunk_rejects_bad_size() {
        let args = [Value::Int(0), Value::Seq(ints(&[1, 2]))];
        assert!(call(must_chunk, &args).is_err());
        assert_eq!(call(chunk_fn, &args).unwrap(), Value::Nil);
    }

    #[test]
    fn test_merge_mutates_destination() {
        let mut dst = Value::map([("a", 1)]);
        let src = Value::map([("a", 2), ("b", 3)]);
        let returned = merge(&mut dst, &[src]);
        assert_eq!(*returned, Value::map([("a", 2), ("b", 3)]));
        // The destination itself observes the change.
        assert_eq!(dst, Value::map([("a", 2), ("b", 3)]));
    }

    #[test]
    fn test_merge_function_leaves_argument_alone() {
        let dst = Value::map([("a", 1)]);
        let args = [dst.clone(), Value::map([("a", 2)])];
        let merged = call(merge_fn, &args).unwrap();
        assert_eq!(merged, Value::map([("a", 2)]));
        assert_eq!(args[0], dst);
    }

    #[test]
    fn test_uniq_uses_structural_equality() {
        let items = vec![
            Value::map([("k", 1)]),
            Value::from("a"),
            Value::map([("k", 1)]),
            Value::from("a"),
            Value::from(1),
        ];
        let out = uniq(&items);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], Value::map([("k", 1)]));
    }

    #[test]
    fn test_dig_paths() {
        let dict = Value::map([("a", Value::map([("b", Value::map([("c", "deep")]))]))]);
        let dict = dict.as_map().unwrap();
        assert_eq!(dig("a.b.c", dict).unwrap(), Value::from("deep"));
        assert!(dig("a.b", dict).unwrap().as_map().is_some());
        let err = dig("a.x.c", dict).unwrap_err();
        assert!(matches!(err, FuncError::KeyNotFound(ref k) if k == "x"));
        assert!(dig("a.b.c.d", dict).is_err());
    }

    #[test]
    fn test_must_first_on_empty_list_fails() {
        assert!(call(must_first, &[Value::Seq(vec![])]).is_err());
        assert_eq!(call(first, &[Value::Seq(vec![])]).unwrap(), Value::Nil);
        assert!(call(must_last, &[Value::from("x")]).is_err());
    }

    #[test]
    fn test_must_compact_requires_sequence() {
        assert!(call(must_compact, &[Value::from("x")]).is_err());
        let out = call(compact, &[Value::from(vec![Value::from(""), Value::from("a")])]).unwrap();
        assert_eq!(out, Value::from(vec!["a"]));
    }

    #[test]
    fn test_dict_with_odd_arguments() {
        let out = call(dict, &["a".into(), 1.into(), "b".into()]).unwrap();
        assert_eq!(out, Value::map([("a", Value::Int(1)), ("b", Value::from(""))]));
    }

    #[test]
    fn test_pick_and_omit() {
        let source = Value::map([("a", 1), ("b", 2), ("c", 3)]);
        let picked = call(pick, &[source.clone(), "a".into(), "z".into()]).unwrap();
        assert_eq!(picked, Value::map([("a", 1)]));
        let omitted = call(omit, &[source, "a".into()]).unwrap();
        assert_eq!(omitted, Value::map([("b", 2), ("c", 3)]));
    }

    #[test]
    fn test_seq_forms() {
        assert_eq!(call(seq, &[3.into()]).unwrap(), Value::Seq(ints(&[1, 2, 3])));
        assert_eq!(call(seq, &[3.into(), 1.into()]).unwrap(), Value::Seq(ints(&[3, 2, 1])));
        assert_eq!(
            call(seq, &[0.into(), 2.into(), 5.into()]).unwrap(),
            Value::Seq(ints(&[0, 2, 4]))
        );
        assert_eq!(call(until, &[(-2).into()]).unwrap(), Value::Seq(ints(&[0, -1])));
    }

    #[test]
    fn test_ranges_near_integer_limits() {
        let max = Value::Int(i64::MAX);
        assert_eq!(
            call(until_step, &[1.into(), max.clone(), max.clone()]).unwrap(),
            Value::Seq(ints(&[1]))
        );
        assert_eq!(
            call(until_step, &[(i64::MAX - 1).into(), max.clone(), 5.into()]).unwrap(),
            Value::Seq(ints(&[i64::MAX - 1]))
        );
        assert_eq!(
            call(seq, &[(i64::MAX - 1).into(), max.clone()]).unwrap(),
            Value::Seq(ints(&[i64::MAX - 1, i64::MAX]))
        );
        assert_eq!(
            call(seq, &[(i64::MIN + 1).into(), Value::Int(i64::MIN)]).unwrap(),
            Value::Seq(ints(&[i64::MIN + 1, i64::MIN]))
        );
    }

    #[test]
    fn test_oversized_ranges_fail() {
        assert!(matches!(
            call(seq, &[Value::Int(i64::MAX)]),
            Err(FuncError::Conversion(_))
        ));
        assert!(matches!(
            call(until, &[Value::Int(i64::MIN)]),
            Err(FuncError::Conversion(_))
        ));
        assert_eq!(range_len(0, 10, 3, Bound::Exclusive), 4);
        assert_eq!(range_len(0, 9, 3, Bound::Inclusive), 4);
        assert_eq!(range_len(5, 0, -2, Bound::Exclusive), 3);
        assert_eq!(range_len(0, 10, -1, Bound::Exclusive), 0);
        assert_eq!(range_len(1, 0, 1, Bound::Inclusive), 0);
    }

    #[test]
    fn test_join_and_sort_alpha() {
        let items = Value::from(vec!["b", "a", "c"]);
        assert_eq!(call(join, &["-".into(), items.clone()]).unwrap(), Value::from("b-a-c"));
        assert_eq!(call(sort_alpha, &[items]).unwrap(), Value::from(vec!["a", "b", "c"]));
    }

    #[test]
    fn test_concat_flattens_one_level() {
        let out = call(
            concat,
            &[Value::from(vec![1, 2]), Value::from(3), Value::from(vec![4])],
        )
        .unwrap();
        assert_eq!(out, Value::Seq(ints(&[1, 2, 3, 4])));
    }
}
