//! Function descriptors and argument access.
//!
//! Every template function has the same shape, `fn(Args<'_>) -> FuncResult`.
//! A [`Function`] pairs that pointer with its name, its accepted argument
//! count and whether it is hermetic.

use std::fmt;

use crate::error::{FuncError, FuncResult};
use crate::generic;
use crate::value::{Value, NIL};

/// Signature shared by all template functions.
pub type Func = fn(Args<'_>) -> FuncResult;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    /// Inclusive range.
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(lo, hi) => (lo..=hi).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }

    /// Whether the function takes a variable number of arguments.
    pub fn is_variadic(self) -> bool {
        !matches!(self, Arity::Exact(_))
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range(lo, hi) => write!(f, "{}..{}", lo, hi),
            Arity::AtLeast(n) => write!(f, "{}+", n),
        }
    }
}

/// A named template function.
#[derive(Clone, Copy)]
pub struct Function {
    name: &'static str,
    arity: Arity,
    hermetic: bool,
    func: Func,
}

impl Function {
    /// Declares a hermetic function.
    pub const fn new(name: &'static str, arity: Arity, func: Func) -> Self {
        Self {
            name,
            arity,
            hermetic: true,
            func,
        }
    }

    /// Marks the function as depending on time, randomness or the environment.
    pub const fn impure(mut self) -> Self {
        self.hermetic = false;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// True if identical arguments always produce identical output.
    pub fn is_hermetic(&self) -> bool {
        self.hermetic
    }

    /// Checks the argument count and invokes the function.
    pub fn call(&self, args: &[Value]) -> FuncResult {
        if !self.arity.accepts(args.len()) {
            return Err(FuncError::Arity {
                name: self.name,
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.func)(Args::new(args))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("hermetic", &self.hermetic)
            .finish()
    }
}

/// Positional arguments of a call, with lenient accessors.
///
/// Out-of-range positions read as nil, so optional trailing arguments can be
/// fetched without bounds checks.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn all(&self) -> &'a [Value] {
        self.values
    }

    /// Arguments from position `from` onward.
    pub fn rest(&self, from: usize) -> &'a [Value] {
        self.values.get(from..).unwrap_or(&[])
    }

    pub fn value(&self, index: usize) -> &'a Value {
        self.values.get(index).unwrap_or(&NIL)
    }

    pub fn text(&self, index: usize) -> String {
        match self.value(index) {
            Value::Nil => String::new(),
            other => other.to_text(),
        }
    }

    pub fn int(&self, index: usize) -> i64 {
        generic::to_int(self.value(index))
    }

    pub fn float(&self, index: usize) -> f64 {
        generic::to_float(self.value(index))
    }

    /// Integer argument if present, otherwise `default`.
    pub fn int_or(&self, index: usize, default: i64) -> i64 {
        match self.values.get(index) {
            Some(v) => generic::to_int(v),
            None => default,
        }
    }
}
