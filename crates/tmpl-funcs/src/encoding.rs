//! Digests, binary-to-text encodings and JSON/YAML conversion.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use data_encoding::BASE32;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::error::{FuncError, FuncResult};
use crate::function::{Args, Arity, Function};
use crate::value::Value;

/// Hex digest of `input` with any RustCrypto hasher.
pub fn hex_digest<D: Digest>(input: &[u8]) -> String {
    hex::encode(D::digest(input))
}

pub fn base64_decode(input: &str) -> Result<String, FuncError> {
    STANDARD
        .decode(input)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| FuncError::Encoding(e.to_string()))
}

pub fn base32_decode(input: &str) -> Result<String, FuncError> {
    BASE32
        .decode(input.as_bytes())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| FuncError::Encoding(e.to_string()))
}

fn sha1sum(args: Args<'_>) -> FuncResult {
    Ok(hex_digest::<Sha1>(args.text(0).as_bytes()).into())
}

fn sha256sum(args: Args<'_>) -> FuncResult {
    Ok(hex_digest::<Sha256>(args.text(0).as_bytes()).into())
}

fn sha512sum(args: Args<'_>) -> FuncResult {
    Ok(hex_digest::<Sha512>(args.text(0).as_bytes()).into())
}

fn md5sum(args: Args<'_>) -> FuncResult {
    Ok(hex_digest::<Md5>(args.text(0).as_bytes()).into())
}

fn adler32sum(args: Args<'_>) -> FuncResult {
    Ok(adler::adler32_slice(args.text(0).as_bytes()).to_string().into())
}

fn b64enc(args: Args<'_>) -> FuncResult {
    Ok(STANDARD.encode(args.text(0)).into())
}

// A failed decode renders the decoder's message instead of failing.
fn b64dec(args: Args<'_>) -> FuncResult {
    Ok(base64_decode(&args.text(0))
        .unwrap_or_else(|e| e.to_string())
        .into())
}

fn b32enc(args: Args<'_>) -> FuncResult {
    Ok(BASE32.encode(args.text(0).as_bytes()).into())
}

fn b32dec(args: Args<'_>) -> FuncResult {
    Ok(base32_decode(&args.text(0))
        .unwrap_or_else(|e| e.to_string())
        .into())
}

fn from_json(args: Args<'_>) -> FuncResult {
    Ok(serde_json::from_str(&args.text(0)).unwrap_or_else(|_| Value::from("")))
}

fn must_from_json(args: Args<'_>) -> FuncResult {
    Ok(serde_json::from_str(&args.text(0))?)
}

fn to_json(args: Args<'_>) -> FuncResult {
    Ok(serde_json::to_string(args.value(0))
        .unwrap_or_default()
        .into())
}

fn must_to_json(args: Args<'_>) -> FuncResult {
    Ok(serde_json::to_string(args.value(0))?.into())
}

fn to_pretty_json(args: Args<'_>) -> FuncResult {
    Ok(serde_json::to_string_pretty(args.value(0))
        .unwrap_or_default()
        .into())
}

fn must_to_pretty_json(args: Args<'_>) -> FuncResult {
    Ok(serde_json::to_string_pretty(args.value(0))?.into())
}

fn from_yaml(args: Args<'_>) -> FuncResult {
    Ok(serde_yaml::from_str(&args.text(0)).unwrap_or_else(|_| Value::from("")))
}

fn must_from_yaml(args: Args<'_>) -> FuncResult {
    Ok(serde_yaml::from_str(&args.text(0))?)
}

fn to_yaml(args: Args<'_>) -> FuncResult {
    Ok(serde_yaml::to_string(args.value(0))
        .unwrap_or_default()
        .into())
}

fn must_to_yaml(args: Args<'_>) -> FuncResult {
    Ok(serde_yaml::to_string(args.value(0))?.into())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("sha1sum", Arity::Exact(1), sha1sum),
    Function::new("sha256sum", Arity::Exact(1), sha256sum),
    Function::new("sha512sum", Arity::Exact(1), sha512sum),
    Function::new("md5sum", Arity::Exact(1), md5sum),
    Function::new("adler32sum", Arity::Exact(1), adler32sum),
    Function::new("b64enc", Arity::Exact(1), b64enc),
    Function::new("b64dec", Arity::Exact(1), b64dec),
    Function::new("b32enc", Arity::Exact(1), b32enc),
    Function::new("b32dec", Arity::Exact(1), b32dec),
    Function::new("fromJson", Arity::Exact(1), from_json),
    Function::new("mustFromJson", Arity::Exact(1), must_from_json),
    Function::new("toJson", Arity::Exact(1), to_json),
    Function::new("mustToJson", Arity::Exact(1), must_to_json),
    Function::new("toPrettyJson", Arity::Exact(1), to_pretty_json),
    Function::new("mustToPrettyJson", Arity::Exact(1), must_to_pretty_json),
    Function::new("toRawJson", Arity::Exact(1), to_json),
    Function::new("mustToRawJson", Arity::Exact(1), must_to_json),
    Function::new("fromYaml", Arity::Exact(1), from_yaml),
    Function::new("mustFromYaml", Arity::Exact(1), must_from_yaml),
    Function::new("toYaml", Arity::Exact(1), to_yaml),
    Function::new("mustToYaml", Arity::Exact(1), must_to_yaml),
];
