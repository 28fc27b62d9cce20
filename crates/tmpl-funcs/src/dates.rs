//! Time and duration functions.
//!
//! Times travel through templates as RFC 3339 strings (or integer unix
//! seconds on input); durations travel as Go-style strings such as
//! `1h2m3s`. Format strings use the reference-time layout
//! `Mon Jan 2 15:04:05 MST 2006`.
//!
//! Everything here depends on the clock or the host time zone, so none of
//! these functions are part of the hermetic table.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, SecondsFormat, Utc};

use crate::error::{FuncError, FuncResult};
use crate::function::{Args, Arity, Function};
use crate::value::Value;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A display zone accepted by `dateInZone` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Utc,
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    /// `UTC`, `Local`, or a numeric offset like `+05:30` / `-0800`.
    pub fn parse(name: &str) -> Option<Zone> {
        match name {
            "" | "UTC" | "Z" => Some(Zone::Utc),
            "Local" => Some(Zone::Local),
            other => parse_offset(other).map(Zone::Fixed),
        }
    }

    pub fn apply(self, t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            Zone::Utc => t.with_timezone(&Utc).fixed_offset(),
            Zone::Local => t.with_timezone(&Local).fixed_offset(),
            Zone::Fixed(offset) => t.with_timezone(&offset),
        }
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, body) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = body.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// The zero time, `0001-01-01T00:00:00Z`.
pub fn zero_time() -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
        .and_utc()
        .fixed_offset()
}

fn from_unix(secs: i64, nanos: u32) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(secs, nanos).map(|t| t.with_timezone(&Local).fixed_offset())
}

/// Interprets a template value as an instant.
///
/// Integers and floats are unix seconds shown in the local zone; strings are
/// RFC 3339 timestamps or decimal unix seconds.
pub fn to_time(v: &Value) -> Option<DateTime<FixedOffset>> {
    match v.resolve() {
        Value::Int(secs) => from_unix(*secs, 0),
        Value::Float(secs) => {
            let whole = secs.floor();
            let nanos = ((secs - whole) * NANOS_PER_SECOND as f64) as u32;
            from_unix(whole as i64, nanos)
        }
        Value::Str(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .or_else(|| s.trim().parse::<i64>().ok().and_then(|n| from_unix(n, 0))),
        _ => None,
    }
}

fn rfc3339(t: DateTime<FixedOffset>) -> Value {
    Value::Str(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[derive(Clone, Copy)]
enum Piece {
    Chrono(&'static str),
    /// Offset that prints `Z` for UTC.
    Zulu(&'static str),
    ZoneName,
    Fraction(usize, bool),
}

// Longest tokens first so `2006` wins over `2` and `January` over `Jan`.
const LAYOUT: &[(&str, Piece)] = &[
    ("January", Piece::Chrono("%B")),
    ("Monday", Piece::Chrono("%A")),
    ("Z07:00", Piece::Zulu("%:z")),
    ("Z0700", Piece::Zulu("%z")),
    ("-07:00", Piece::Chrono("%:z")),
    ("-0700", Piece::Chrono("%z")),
    (".000000000", Piece::Fraction(9, false)),
    (".999999999", Piece::Fraction(9, true)),
    (".000000", Piece::Fraction(6, false)),
    (".999999", Piece::Fraction(6, true)),
    (".000", Piece::Fraction(3, false)),
    (".999", Piece::Fraction(3, true)),
    ("2006", Piece::Chrono("%Y")),
    ("Jan", Piece::Chrono("%b")),
    ("Mon", Piece::Chrono("%a")),
    ("MST", Piece::ZoneName),
    ("002", Piece::Chrono("%j")),
    ("_2", Piece::Chrono("%e")),
    ("01", Piece::Chrono("%m")),
    ("02", Piece::Chrono("%d")),
    ("03", Piece::Chrono("%I")),
    ("04", Piece::Chrono("%M")),
    ("05", Piece::Chrono("%S")),
    ("06", Piece::Chrono("%y")),
    ("15", Piece::Chrono("%H")),
    ("PM", Piece::Chrono("%p")),
    ("pm", Piece::Chrono("%P")),
    ("1", Piece::Chrono("%-m")),
    ("2", Piece::Chrono("%-d")),
    ("3", Piece::Chrono("%-I")),
    ("4", Piece::Chrono("%-M")),
    ("5", Piece::Chrono("%-S")),
];

fn render_piece(t: &DateTime<FixedOffset>, piece: Piece) -> String {
    let utc = t.offset().local_minus_utc() == 0;
    match piece {
        Piece::Chrono(pattern) => t.format(pattern).to_string(),
        Piece::Zulu(_) if utc => "Z".to_string(),
        Piece::Zulu(pattern) => t.format(pattern).to_string(),
        Piece::ZoneName if utc => "UTC".to_string(),
        Piece::ZoneName => t.format("%:z").to_string(),
        Piece::Fraction(width, trim) => {
            let nanos = format!("{:09}", t.timestamp_subsec_nanos() % NANOS_PER_SECOND as u32);
            let mut digits = nanos[..width].to_string();
            if trim {
                digits = digits.trim_end_matches('0').to_string();
                if digits.is_empty() {
                    return String::new();
                }
            }
            format!(".{}", digits)
        }
    }
}

/// Formats `t` with a reference-time layout such as `2006-01-02 15:04`.
///
/// Text that is not a layout token is copied through unchanged.
pub fn format_layout(t: &DateTime<FixedOffset>, layout: &str) -> String {
    let mut out = String::with_capacity(layout.len() + 8);
    let mut rest = layout;
    'scan: while let Some(c) = rest.chars().next() {
        for (token, piece) in LAYOUT {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(&render_piece(t, *piece));
                rest = tail;
                continue 'scan;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Parses a duration such as `1h30m`, `-1.5h` or `250ms` into nanoseconds.
pub fn parse_duration(input: &str) -> Option<i64> {
    let (negative, mut rest) = match input.as_bytes().first()? {
        b'-' => (true, &input[1..]),
        b'+' => (false, &input[1..]),
        _ => (false, input),
    };
    if rest == "0" {
        return Some(0);
    }
    if rest.is_empty() {
        return None;
    }
    let mut total: f64 = 0.0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];
        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => return None,
        };
        rest = &rest[unit_len..];
        total += number * scale;
    }
    if total > i64::MAX as f64 {
        return None;
    }
    let nanos = total.round() as i64;
    Some(if negative { -nanos } else { nanos })
}

fn fraction(value: u64, scale: u64) -> String {
    let whole = value / scale;
    let rem = value % scale;
    if rem == 0 {
        return whole.to_string();
    }
    let width = scale.to_string().len() - 1;
    let digits = format!("{:0width$}", rem, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Formats nanoseconds the way Go prints a `time.Duration`.
pub fn format_duration(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }
    let sign = if nanos < 0 { "-" } else { "" };
    let u = nanos.unsigned_abs();
    let ns = NANOS_PER_SECOND as u64;
    if u < ns {
        let (scale, unit) = match u {
            0..=999 => (1, "ns"),
            1_000..=999_999 => (1_000, "µs"),
            _ => (1_000_000, "ms"),
        };
        return format!("{}{}{}", sign, fraction(u, scale), unit);
    }
    let hours = u / (3600 * ns);
    let minutes = (u / (60 * ns)) % 60;
    let seconds = fraction(u % (60 * ns), ns);
    let mut out = sign.to_string();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&format!("{}s", seconds));
    out
}

/// Duration argument: a duration string, or whole seconds.
fn duration_arg(v: &Value) -> i64 {
    match v.resolve() {
        Value::Str(s) => parse_duration(s)
            .or_else(|| s.parse::<i64>().ok().map(|secs| secs.saturating_mul(NANOS_PER_SECOND)))
            .unwrap_or(0),
        Value::Int(secs) => secs.saturating_mul(NANOS_PER_SECOND),
        Value::Float(secs) => (secs * NANOS_PER_SECOND as f64) as i64,
        _ => 0,
    }
}

fn round_to_second(nanos: i64) -> i64 {
    let half = NANOS_PER_SECOND / 2;
    let rem = nanos % NANOS_PER_SECOND;
    let base = nanos - rem;
    let rounded = if rem >= half {
        base.checked_add(NANOS_PER_SECOND)
    } else if rem <= -half {
        base.checked_sub(NANOS_PER_SECOND)
    } else {
        None
    };
    rounded.unwrap_or(base)
}

fn now(_: Args<'_>) -> FuncResult {
    Ok(rfc3339(Local::now().fixed_offset()))
}

fn ago(args: Args<'_>) -> FuncResult {
    let input = args.value(0);
    let Some(t) = to_time(input) else {
        return Ok(match input.resolve() {
            Value::Str(s) => format!("cannot parse {:?} as a time", s).into(),
            _ => "".into(),
        });
    };
    let elapsed = Utc::now()
        .signed_duration_since(t)
        .num_nanoseconds()
        .unwrap_or(i64::MAX);
    Ok(format_duration(round_to_second(elapsed)).into())
}

fn date(args: Args<'_>) -> FuncResult {
    let t = to_time(args.value(1)).unwrap_or_else(zero_time);
    Ok(format_layout(&t, &args.text(0)).into())
}

fn date_in_zone(args: Args<'_>) -> FuncResult {
    let Some(zone) = Zone::parse(&args.text(2)) else {
        return Ok("".into());
    };
    let t = zone.apply(to_time(args.value(1)).unwrap_or_else(zero_time));
    Ok(format_layout(&t, &args.text(0)).into())
}

fn date_modify(args: Args<'_>) -> FuncResult {
    let t = to_time(args.value(1)).unwrap_or_else(zero_time);
    let shifted = parse_duration(&args.text(0))
        .map(|d| t + chrono::Duration::nanoseconds(d))
        .unwrap_or(t);
    Ok(rfc3339(shifted))
}

fn must_date_modify(args: Args<'_>) -> FuncResult {
    let shift = args.text(0);
    let d = parse_duration(&shift)
        .ok_or_else(|| FuncError::conversion(format!("invalid duration {:?}", shift)))?;
    let t = to_time(args.value(1)).ok_or_else(|| {
        FuncError::conversion(format!("unable to convert {} to a time", args.value(1)))
    })?;
    Ok(rfc3339(t + chrono::Duration::nanoseconds(d)))
}

fn html_date(args: Args<'_>) -> FuncResult {
    let t = to_time(args.value(0)).unwrap_or_else(zero_time);
    Ok(t.format("%Y-%m-%d").to_string().into())
}

fn html_date_in_zone(args: Args<'_>) -> FuncResult {
    let Some(zone) = Zone::parse(&args.text(1)) else {
        return Ok("".into());
    };
    let t = zone.apply(to_time(args.value(0)).unwrap_or_else(zero_time));
    Ok(t.format("%Y-%m-%d").to_string().into())
}

fn to_date(args: Args<'_>) -> FuncResult {
    Ok(rfc3339(to_time(args.value(0)).unwrap_or_else(zero_time)))
}

fn must_to_date(args: Args<'_>) -> FuncResult {
    to_time(args.value(0)).map(rfc3339).ok_or_else(|| {
        FuncError::conversion(format!("unable to convert {} to a time", args.value(0)))
    })
}

fn duration(args: Args<'_>) -> FuncResult {
    Ok(format_duration(duration_arg(args.value(0))).into())
}

fn duration_round(args: Args<'_>) -> FuncResult {
    Ok(format_duration(round_to_second(duration_arg(args.value(0)))).into())
}

fn unix_epoch(args: Args<'_>) -> FuncResult {
    let t = to_time(args.value(0)).unwrap_or_else(zero_time);
    Ok(t.timestamp().to_string().into())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("now", Arity::Exact(0), now).impure(),
    Function::new("ago", Arity::Exact(1), ago).impure(),
    Function::new("date", Arity::Exact(2), date).impure(),
    Function::new("dateInZone", Arity::Exact(3), date_in_zone).impure(),
    Function::new("date_in_zone", Arity::Exact(3), date_in_zone).impure(),
    Function::new("dateModify", Arity::Exact(2), date_modify).impure(),
    Function::new("date_modify", Arity::Exact(2), date_modify).impure(),
    Function::new("mustDateModify", Arity::Exact(2), must_date_modify).impure(),
    Function::new("must_date_modify", Arity::Exact(2), must_date_modify).impure(),
    Function::new("htmlDate", Arity::Exact(1), html_date).impure(),
    Function::new("htmlDateInZone", Arity::Exact(2), html_date_in_zone).impure(),
    Function::new("toDate", Arity::Exact(1), to_date).impure(),
    Function::new("mustToDate", Arity::Exact(1), must_to_date).impure(),
    Function::new("duration", Arity::Exact(1), duration).impure(),
    Function::new("durationRound", Arity::Exact(1), duration_round).impure(),
    Function::new("unixEpoch", Arity::Exact(1), unix_epoch).impure(),
];
