//! tmpl-funcs - Type-generic helper functions for environment templates.
//!
//! A library of type-generic helper functions meant to be installed into a
//! template engine. Values arrive as an opaque [`Value`] whose kind is only
//! known at runtime; every function dispatches on that kind.
//!
//! # Quick Start
//!
//! ```rust
//! use tmpl_funcs::{build_table, Value};
//!
//! let table = build_table();
//! let out = table.call("upper", &[Value::from("hello")]).unwrap();
//! assert_eq!(out, Value::from("HELLO"));
//! ```
//!
//! # Lenient and strict variants
//!
//! Most functions never fail: bad input degrades to nil, zero, false or the
//! empty string. Where silently degrading would hide a real mistake there is
//! a `must*` sibling (`mustFirst`, `mustCompact`, `mustFromJson`, ...) that
//! returns a [`FuncError`] instead.
//!
//! # Hermetic table
//!
//! [`build_hermetic_table`] leaves out every function that reads the clock,
//! a random source, the process environment or the network, so that output
//! depends only on the template and its context.
//!
//! The random helpers (`randAlpha`, `randBytes`, `uuidv4`, ...) make no
//! cryptographic guarantee. Never use them to produce secrets.

mod collections;
mod crypto;
mod dates;
mod encoding;
mod error;
mod function;
mod generic;
mod math;
mod paths;
mod pattern;
mod random;
mod registry;
mod strings;
mod system;
mod urls;
mod value;
mod version;

pub use collections::{chunk, dig, merge, slice, slice_range, to_strings, uniq};
pub use error::{FuncError, FuncResult};
pub use function::{Args, Arity, Func, Function};
pub use generic::{deep_copy, equal, is_empty, length, to_float, to_int};
pub use registry::{build_hermetic_table, build_table, FunctionTable};
pub use value::{Kind, Record, Value};

/// Helpers usable from Rust without going through the function table.
pub mod helpers {
    pub use crate::crypto::{decrypt_aes, encrypt_aes, pem};
    pub use crate::dates::{format_duration, format_layout, parse_duration, to_time, Zone};
    pub use crate::encoding::{base32_decode, base64_decode, hex_digest};
    pub use crate::paths::{base, clean, dir, ext};
    pub use crate::strings::{abbreviate, abbreviate_both, title_case, wrap_words};
    pub use crate::system::{expand_env, lookup_host};
    pub use crate::urls::{join as url_join, parse_parts as url_parts};
    pub use crate::version::{compare as semver_cmp, parse_loose as parse_version, satisfies};
}
