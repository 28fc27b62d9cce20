//! Random strings, integers and UUIDs.
//!
//! These draw from the thread-local generator and are NOT suitable for
//! secrets: do not use them for passwords, tokens or keys.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::FuncResult;
use crate::function::{Args, Arity, Function};
use crate::value::Value;

const ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const DIGITS: &[u8] = b"0123456789";

/// `count` characters drawn uniformly from `charset`.
pub fn random_from(charset: &[u8], count: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

fn count_arg(args: &Args<'_>) -> usize {
    args.int(0).max(0) as usize
}

fn rand_alpha(args: Args<'_>) -> FuncResult {
    Ok(random_from(ALPHA, count_arg(&args)).into())
}

fn rand_alpha_num(args: Args<'_>) -> FuncResult {
    Ok(random_from(ALNUM, count_arg(&args)).into())
}

fn rand_numeric(args: Args<'_>) -> FuncResult {
    Ok(random_from(DIGITS, count_arg(&args)).into())
}

// Printable ASCII, space through tilde.
fn rand_ascii(args: Args<'_>) -> FuncResult {
    let mut rng = rand::thread_rng();
    let out: String = (0..count_arg(&args))
        .map(|_| rng.gen_range(b' '..=b'~') as char)
        .collect();
    Ok(out.into())
}

/// Base64 of `count` random bytes.
fn rand_bytes(args: Args<'_>) -> FuncResult {
    let mut bytes = vec![0u8; count_arg(&args)];
    rand::thread_rng().fill(bytes.as_mut_slice());
    Ok(STANDARD.encode(bytes).into())
}

/// Integer in `[min, max)`; an empty range yields `min`.
fn rand_int(args: Args<'_>) -> FuncResult {
    let (min, max) = (args.int(0), args.int(1));
    if max <= min {
        return Ok(Value::Int(min));
    }
    Ok(Value::Int(rand::thread_rng().gen_range(min..max)))
}

fn uuidv4(_: Args<'_>) -> FuncResult {
    Ok(uuid::Uuid::new_v4().to_string().into())
}

fn shuffle(args: Args<'_>) -> FuncResult {
    let mut chars: Vec<char> = args.text(0).chars().collect();
    chars.shuffle(&mut rand::thread_rng());
    Ok(chars.into_iter().collect::<String>().into())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("randAlpha", Arity::Exact(1), rand_alpha).impure(),
    Function::new("randAlphaNum", Arity::Exact(1), rand_alpha_num).impure(),
    Function::new("randNumeric", Arity::Exact(1), rand_numeric).impure(),
    Function::new("randAscii", Arity::Exact(1), rand_ascii).impure(),
    Function::new("randBytes", Arity::Exact(1), rand_bytes).impure(),
    Function::new("randInt", Arity::Exact(2), rand_int).impure(),
    Function::new("uuidv4", Arity::Exact(0), uuidv4).impure(),
    Function::new("shuffle", Arity::Exact(1), shuffle).impure(),
];
