//! Kind-dispatched operations over opaque values.
//!
//! The four core operations ([`equal`], [`is_empty`], [`to_int`]/[`to_float`]
//! and [`deep_copy`]) never fail. Absent or unsupported input degrades to a
//! zero, false or empty result. The template functions built on them
//! (`default`, `empty`, `coalesce`, comparisons, reflection) follow the same
//! lenient contract, with `mustDeepCopy` as the strict exception.

use crate::error::{FuncError, FuncResult};
use crate::function::{Args, Arity, Function};
use crate::value::{Record, Value};

/// Structural deep equality. Values of different kinds are never equal.
pub fn equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Seq(x), Value::Seq(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| equal(p, q))
        }
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| equal(v, w)))
        }
        (Value::Record(x), Value::Record(y)) => {
            x.name() == y.name()
                && x.fields().len() == y.fields().len()
                && x
                    .fields()
                    .iter()
                    .zip(y.fields())
                    .all(|((kx, vx), (ky, vy))| kx == ky && equal(vx, vy))
        }
        (Value::Ptr(x), Value::Ptr(y)) => match (x, y) {
            (None, None) => true,
            (Some(p), Some(q)) => equal(p, q),
            _ => false,
        },
        _ => false,
    }
}

/// Zero-value test.
///
/// `false`, `0`, `0.0`, `""`, empty sequences and mappings, nil and absent
/// indirections are empty. Records are never empty.
pub fn is_empty(v: &Value) -> bool {
    match v {
        Value::Nil => true,
        Value::Bool(b) => !b,
        Value::Int(i) => *i == 0,
        Value::Float(x) => *x == 0.0,
        Value::Str(s) => s.is_empty(),
        Value::Seq(items) => items.is_empty(),
        Value::Map(map) => map.is_empty(),
        Value::Record(_) => false,
        Value::Ptr(p) => p.is_none(),
    }
}

/// Best-effort integer coercion. Unparseable input yields `0`.
pub fn to_int(v: &Value) -> i64 {
    match v.resolve() {
        Value::Int(i) => *i,
        Value::Float(x) => *x as i64,
        Value::Str(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Best-effort float coercion. Unparseable input yields `0.0`.
pub fn to_float(v: &Value) -> f64 {
    match v.resolve() {
        Value::Float(x) => *x,
        Value::Int(i) => *i as f64,
        Value::Str(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Rebuilds `v` so that the result shares no structure with the input.
pub fn deep_copy(v: &Value) -> Value {
    match v {
        Value::Seq(items) => Value::Seq(items.iter().map(deep_copy).collect()),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), deep_copy(v)))
                .collect(),
        ),
        Value::Record(record) => {
            let copy = record
                .fields()
                .iter()
                .fold(Record::new(record.name()), |acc, (k, v)| {
                    acc.field(k.clone(), deep_copy(v))
                });
            Value::Record(copy)
        }
        Value::Ptr(None) => Value::Ptr(None),
        Value::Ptr(Some(inner)) => Value::Ptr(Some(Box::new(deep_copy(inner)))),
        scalar => scalar.clone(),
    }
}

/// Length of text (in bytes), sequences and mappings; `0` for anything else.
pub fn length(v: &Value) -> usize {
    match v.resolve() {
        Value::Str(s) => s.len(),
        Value::Seq(items) => items.len(),
        Value::Map(map) => map.len(),
        _ => 0,
    }
}

fn dfault(args: Args<'_>) -> FuncResult {
    let given = args.value(1);
    if args.len() < 2 || is_empty(given) {
        Ok(args.value(0).clone())
    } else {
        Ok(given.clone())
    }
}

fn empty(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(is_empty(args.value(0))))
}

fn coalesce(args: Args<'_>) -> FuncResult {
    Ok(args
        .all()
        .iter()
        .find(|v| !is_empty(v))
        .cloned()
        .unwrap_or(Value::Nil))
}

fn all(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(args.all().iter().all(|v| !is_empty(v))))
}

fn any(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(args.all().iter().any(|v| !is_empty(v))))
}

fn ternary(args: Args<'_>) -> FuncResult {
    if is_empty(args.value(2)) {
        Ok(args.value(1).clone())
    } else {
        Ok(args.value(0).clone())
    }
}

fn deep_copy_fn(args: Args<'_>) -> FuncResult {
    Ok(deep_copy(args.value(0)))
}

fn must_deep_copy(args: Args<'_>) -> FuncResult {
    match args.value(0) {
        Value::Nil => Err(FuncError::conversion("copy: cannot copy nil")),
        v => Ok(deep_copy(v)),
    }
}

fn type_of(args: Args<'_>) -> FuncResult {
    Ok(Value::Str(args.value(0).type_name()))
}

fn type_is(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(args.text(0) == args.value(1).type_name()))
}

fn type_is_like(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(args.value(1).type_name().contains(&args.text(0))))
}

fn kind_of(args: Args<'_>) -> FuncResult {
    Ok(Value::from(args.value(0).kind().as_str()))
}

fn kind_is(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(args.value(1).kind().as_str() == args.text(0)))
}

fn deep_equal(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(equal(args.value(0), args.value(1))))
}

fn ne(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(!equal(args.value(0), args.value(1))))
}

fn lt(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(args.float(0) < args.float(1)))
}

fn le(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(args.float(0) <= args.float(1)))
}

fn gt(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(args.float(0) > args.float(1)))
}

fn ge(args: Args<'_>) -> FuncResult {
    Ok(Value::Bool(args.float(0) >= args.float(1)))
}

fn len(args: Args<'_>) -> FuncResult {
    Ok(Value::from(length(args.value(0))))
}

fn fail(args: Args<'_>) -> FuncResult {
    Err(FuncError::Failed(args.text(0)))
}

fn to_string(args: Args<'_>) -> FuncResult {
    Ok(Value::Str(args.value(0).to_text()))
}

fn atoi(args: Args<'_>) -> FuncResult {
    // Only text is parsed; a float argument is not truncated here.
    let parsed = match args.value(0) {
        Value::Str(s) => s.parse().unwrap_or(0),
        Value::Int(i) => *i,
        _ => 0,
    };
    Ok(Value::Int(parsed))
}

fn int(args: Args<'_>) -> FuncResult {
    Ok(Value::Int(args.int(0)))
}

fn float(args: Args<'_>) -> FuncResult {
    Ok(Value::Float(args.float(0)))
}

fn hello(_: Args<'_>) -> FuncResult {
    Ok(Value::from("Hello!"))
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("hello", Arity::Exact(0), hello),
    Function::new("default", Arity::AtLeast(1), dfault),
    Function::new("empty", Arity::Exact(1), empty),
    Function::new("coalesce", Arity::AtLeast(0), coalesce),
    Function::new("all", Arity::AtLeast(0), all),
    Function::new("any", Arity::AtLeast(0), any),
    Function::new("ternary", Arity::Exact(3), ternary),
    Function::new("deepCopy", Arity::Exact(1), deep_copy_fn),
    Function::new("mustDeepCopy", Arity::Exact(1), must_deep_copy),
    Function::new("typeOf", Arity::Exact(1), type_of),
    Function::new("typeIs", Arity::Exact(2), type_is),
    Function::new("typeIsLike", Arity::Exact(2), type_is_like),
    Function::new("kindOf", Arity::Exact(1), kind_of),
    Function::new("kindIs", Arity::Exact(2), kind_is),
    Function::new("deepEqual", Arity::Exact(2), deep_equal),
    Function::new("eq", Arity::Exact(2), deep_equal),
    Function::new("ne", Arity::Exact(2), ne),
    Function::new("lt", Arity::Exact(2), lt),
    Function::new("le", Arity::Exact(2), le),
    Function::new("gt", Arity::Exact(2), gt),
    Function::new("ge", Arity::Exact(2), ge),
    Function::new("len", Arity::Exact(1), len),
    Function::new("fail", Arity::Exact(1), fail),
    Function::new("toString", Arity::Exact(1), to_string),
    Function::new("atoi", Arity::Exact(1), atoi),
    Function::new("int64", Arity::Exact(1), int),
    Function::new("int", Arity::Exact(1), int),
    Function::new("toInt", Arity::Exact(1), int),
    Function::new("float64", Arity::Exact(1), float),
    Function::new("toDecimal", Arity::Exact(1), float),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn call(f: fn(Args<'_>) -> FuncResult, args: &[Value]) -> Value {
        f(Args::new(args)).unwrap()
    }

    #[test]
    fn test_equal_is_structural() {
        let a = Value::from(vec![Value::map([("k", 1)]), Value::from("x")]);
        let b = Value::from(vec![Value::map([("k", 1)]), Value::from("x")]);
        assert!(equal(&a, &b));
        assert!(!equal(&Value::from(1), &Value::from(1.0)));
        assert!(!equal(&Value::from(1), &Value::from("1")));
    }

    #[test]
    fn test_is_empty_by_kind() {
        assert!(is_empty(&Value::Nil));
        assert!(is_empty(&Value::Bool(false)));
        assert!(is_empty(&Value::Int(0)));
        assert!(is_empty(&Value::Float(0.0)));
        assert!(is_empty(&Value::from("")));
        assert!(is_empty(&Value::Seq(vec![])));
        assert!(is_empty(&Value::Map(BTreeMap::new())));
        assert!(is_empty(&Value::Ptr(None)));
        assert!(!is_empty(&Value::Record(Record::new("Empty"))));
        assert!(!is_empty(&Value::from(" ")));
    }

    #[test]
    fn test_numeric_coercion_is_total() {
        assert_eq!(to_int(&Value::from("42")), 42);
        assert_eq!(to_int(&Value::from("4.2")), 0);
        assert_eq!(to_int(&Value::from(3.9)), 3);
        assert_eq!(to_int(&Value::Seq(vec![])), 0);
        assert_eq!(to_float(&Value::from("2.5")), 2.5);
        assert_eq!(to_float(&Value::from("nope")), 0.0);
        assert_eq!(to_float(&Value::from(2)), 2.0);
    }

    #[test]
    fn test_deep_copy_is_isolated() {
        let original = Value::map([("inner", Value::from(vec![Value::from(1)]))]);
        let mut copy = deep_copy(&original);
        if let Value::Map(map) = &mut copy {
            map.insert("added".into(), Value::from(true));
        }
        assert_eq!(original.as_map().unwrap().len(), 1);
        assert_eq!(copy.as_map().unwrap().len(), 2);
    }

    #[test]
    fn test_default_picks_given_when_not_empty() {
        assert_eq!(call(dfault, &["d".into(), "x".into()]), Value::from("x"));
        assert_eq!(call(dfault, &["d".into(), "".into()]), Value::from("d"));
        assert_eq!(call(dfault, &["d".into()]), Value::from("d"));
    }

    #[test]
    fn test_coalesce_and_ternary() {
        let args = [Value::Nil, Value::from(""), Value::from("x")];
        assert_eq!(call(coalesce, &args), Value::from("x"));
        assert_eq!(call(coalesce, &[Value::Nil]), Value::Nil);
        assert_eq!(
            call(ternary, &["yes".into(), "no".into(), true.into()]),
            Value::from("yes")
        );
        assert_eq!(
            call(ternary, &["yes".into(), "no".into(), false.into()]),
            Value::from("no")
        );
    }

    #[test]
    fn test_must_deep_copy_rejects_nil() {
        assert!(must_deep_copy(Args::new(&[Value::Nil])).is_err());
        assert!(deep_copy_fn(Args::new(&[Value::Nil])).is_ok());
    }

    #[test]
    fn test_reflection() {
        assert_eq!(call(type_of, &[Value::from(1)]), Value::from("int"));
        assert_eq!(
            call(kind_is, &["slice".into(), Value::Seq(vec![])]),
            Value::Bool(true)
        );
        assert_eq!(
            call(type_is_like, &["interface".into(), Value::Seq(vec![])]),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_fail_surfaces_message() {
        let err = fail(Args::new(&["boom".into()])).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
