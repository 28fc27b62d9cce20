//! Integer and float arithmetic.
//!
//! Integer operations wrap on overflow. Integer division or modulo by zero
//! yields 0 rather than failing the render. Float division follows IEEE 754,
//! so `divf` by zero gives an infinity (or NaN for `0 / 0`).

use crate::error::FuncResult;
use crate::function::{Args, Arity, Function};
use crate::generic::{to_float, to_int};
use crate::value::Value;

fn ints<'a>(args: &Args<'a>) -> impl Iterator<Item = i64> + 'a {
    args.all().iter().map(to_int)
}

fn floats<'a>(args: &Args<'a>) -> impl Iterator<Item = f64> + 'a {
    args.all().iter().map(to_float)
}

fn add1(args: Args<'_>) -> FuncResult {
    Ok(Value::Int(args.int(0).wrapping_add(1)))
}

fn add(args: Args<'_>) -> FuncResult {
    Ok(Value::Int(ints(&args).fold(0, i64::wrapping_add)))
}

fn sub(args: Args<'_>) -> FuncResult {
    Ok(Value::Int(args.int(0).wrapping_sub(args.int(1))))
}

fn div(args: Args<'_>) -> FuncResult {
    Ok(Value::Int(args.int(0).checked_div(args.int(1)).unwrap_or(0)))
}

fn modulo(args: Args<'_>) -> FuncResult {
    Ok(Value::Int(args.int(0).checked_rem(args.int(1)).unwrap_or(0)))
}

fn mul(args: Args<'_>) -> FuncResult {
    Ok(Value::Int(ints(&args).fold(1, i64::wrapping_mul)))
}

fn max(args: Args<'_>) -> FuncResult {
    Ok(Value::Int(ints(&args).max().unwrap_or(0)))
}

fn min(args: Args<'_>) -> FuncResult {
    Ok(Value::Int(ints(&args).min().unwrap_or(0)))
}

fn add1f(args: Args<'_>) -> FuncResult {
    Ok(Value::Float(args.float(0) + 1.0))
}

fn addf(args: Args<'_>) -> FuncResult {
    Ok(Value::Float(floats(&args).sum()))
}

fn subf(args: Args<'_>) -> FuncResult {
    let mut values = floats(&args);
    let first = values.next().unwrap_or(0.0);
    Ok(Value::Float(values.fold(first, |acc, v| acc - v)))
}

fn divf(args: Args<'_>) -> FuncResult {
    let mut values = floats(&args);
    let first = values.next().unwrap_or(0.0);
    Ok(Value::Float(values.fold(first, |acc, v| acc / v)))
}

fn mulf(args: Args<'_>) -> FuncResult {
    Ok(Value::Float(floats(&args).product()))
}

fn maxf(args: Args<'_>) -> FuncResult {
    Ok(Value::Float(floats(&args).reduce(f64::max).unwrap_or(0.0)))
}

fn minf(args: Args<'_>) -> FuncResult {
    Ok(Value::Float(floats(&args).reduce(f64::min).unwrap_or(0.0)))
}

fn ceil(args: Args<'_>) -> FuncResult {
    Ok(Value::Float(args.float(0).ceil()))
}

fn floor(args: Args<'_>) -> FuncResult {
    Ok(Value::Float(args.float(0).floor()))
}

/// `round VALUE [PRECISION [THRESHOLD]]`, rounding up once the fractional part
/// reaches the threshold (0.5 by default).
fn round(args: Args<'_>) -> FuncResult {
    let value = args.float(0);
    let precision = args.int(1).clamp(-300, 300) as i32;
    let threshold = if args.len() > 2 { args.float(2) } else { 0.5 };
    let pow = 10f64.powi(precision);
    let digit = pow * value;
    let fraction = digit.fract().abs();
    let rounded = if fraction >= threshold {
        if digit >= 0.0 {
            digit.ceil()
        } else {
            digit.floor()
        }
    } else {
        digit.trunc()
    };
    Ok(Value::Float(rounded / pow))
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("add1", Arity::Exact(1), add1),
    Function::new("add", Arity::AtLeast(0), add),
    Function::new("sub", Arity::Exact(2), sub),
    Function::new("div", Arity::Exact(2), div),
    Function::new("mod", Arity::Exact(2), modulo),
    Function::new("mul", Arity::AtLeast(0), mul),
    Function::new("max", Arity::AtLeast(1), max),
    Function::new("biggest", Arity::AtLeast(1), max),
    Function::new("min", Arity::AtLeast(1), min),
    Function::new("add1f", Arity::Exact(1), add1f),
    Function::new("addf", Arity::AtLeast(0), addf),
    Function::new("subf", Arity::AtLeast(1), subf),
    Function::new("divf", Arity::AtLeast(1), divf),
    Function::new("mulf", Arity::AtLeast(0), mulf),
    Function::new("maxf", Arity::AtLeast(1), maxf),
    Function::new("minf", Arity::AtLeast(1), minf),
    Function::new("ceil", Arity::Exact(1), ceil),
    Function::new("floor", Arity::Exact(1), floor),
    Function::new("round", Arity::Range(1, 3), round),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn call(f: fn(Args<'_>) -> FuncResult, args: &[Value]) -> Value {
        f(Args::new(args)).unwrap()
    }

    #[test]
    fn test_integer_ops() {
        assert_eq!(call(add, &[1.into(), "2".into(), 3.into()]), Value::Int(6));
        assert_eq!(call(sub, &[5.into(), 7.into()]), Value::Int(-2));
        assert_eq!(call(mul, &[2.into(), 3.into(), 4.into()]), Value::Int(24));
        assert_eq!(call(add1, &[Value::Nil]), Value::Int(1));
        assert_eq!(call(max, &[1.into(), 9.into(), 3.into()]), Value::Int(9));
        assert_eq!(call(min, &[4.into(), (-1).into()]), Value::Int(-1));
    }

    #[test]
    fn test_integer_and_float_division_by_zero() {
        assert_eq!(call(div, &[10.into(), 0.into()]), Value::Int(0));
        assert_eq!(call(modulo, &[10.into(), 0.into()]), Value::Int(0));
        assert_eq!(call(div, &[10.into(), 3.into()]), Value::Int(3));
        assert_eq!(call(modulo, &[10.into(), 3.into()]), Value::Int(1));
        assert_eq!(call(divf, &[1.0.into(), 0.0.into()]), Value::Float(f64::INFINITY));
        assert_eq!(call(divf, &[(-1).into(), 0.into()]), Value::Float(f64::NEG_INFINITY));
    }

    #[test]
    fn test_float_ops() {
        assert_eq!(call(addf, &[1.5.into(), 2.into()]), Value::Float(3.5));
        assert_eq!(call(subf, &[10.into(), 2.5.into()]), Value::Float(7.5));
        assert_eq!(call(mulf, &[1.5.into(), 2.into()]), Value::Float(3.0));
        assert_eq!(call(divf, &[10.into(), 4.into()]), Value::Float(2.5));
        assert_eq!(call(maxf, &[1.5.into(), 2.5.into()]), Value::Float(2.5));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(call(round, &[123.555555.into(), 3.into()]), Value::Float(123.556));
        assert_eq!(call(round, &[2.4.into(), 0.into()]), Value::Float(2.0));
        assert_eq!(call(round, &[2.5.into(), 0.into()]), Value::Float(3.0));
        assert_eq!(call(ceil, &[1.2.into()]), Value::Float(2.0));
        assert_eq!(call(floor, &[1.8.into()]), Value::Float(1.0));
    }
}
