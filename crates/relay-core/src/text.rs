// SPDX-License-Identifier: Apache-2.0
//! Canonical text encoding and decoding for values.
//!
//! Every primitive kind has one canonical text form:
//!
//! - `BOOL`: `TRUE` / `FALSE` (parsing also accepts `1` / `0`)
//! - integer kinds: decimal, optional sign, `_` separators accepted on parse
//! - bit-string kinds: decimal; parsing also accepts `2#`, `8#` and `16#`
//!   based literals
//! - `REAL` / `LREAL`: exponent form (`{:e}`)
//! - `DATE` / `LDATE`: `YYYY-MM-DD` (proleptic civil calendar)
//! - `TIME_OF_DAY`: `HH:MM:SS.fff`, `LTIME_OF_DAY`: `HH:MM:SS.fffffffff`
//! - `DATE_AND_TIME` / `LDATE_AND_TIME`: date, `-`, time of day
//! - `TIME`: `<n>ms`, `LTIME`: `<n>ns`
//! - `CHAR` / `WCHAR`: the bare character
//! - `STRING`: `'...'` with `$$` and `$'` escapes; `WSTRING`: `"..."` with
//!   `$$` and `$"` escapes
//!
//! A concrete value also accepts its own `TYPENAME#` prefix on parse. The
//! `Any` placeholder encodes as the fixed literal `ND (ANY)` and decodes a
//! `TypeName#payload` tag by resolving the name through the interned-string
//! table and the type registry, constructing the concrete value in place and
//! re-delegating the parse.
//!
//! The maximum canonical text length per kind (including the terminating
//! NUL) lives in a static table indexed by the numeric type id; for the
//! string kinds the entry is a per-character multiplier instead of an
//! absolute bound.

use thiserror::Error;

use crate::registry;
use crate::types::TypeId;
use crate::value::Value;

/// Fixed canonical text of the `Any` placeholder.
pub const ANY_TEXT: &str = "ND (ANY)";

/// Errors produced by the canonical text codec.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    /// The destination buffer cannot hold the kind's maximum canonical text.
    #[error("text buffer too small: required {required}, capacity {capacity}")]
    BufferTooSmall {
        /// Bytes the kind may need, including the terminating NUL.
        required: usize,
        /// Bytes the caller supplied.
        capacity: usize,
    },
    /// The input does not form a valid literal of the expected kind.
    #[error("malformed {kind} literal")]
    Malformed {
        /// Canonical name of the kind being parsed.
        kind: &'static str,
    },
    /// A tagged literal for an `Any` placeholder is missing the `#`
    /// delimiter.
    #[error("tagged literal is missing the `#` delimiter")]
    MissingTag,
    /// The tag names a type the registry does not know.
    #[error("unknown type name in tagged literal")]
    UnknownTypeName,
    /// The value is valid in memory but has no canonical text form (for
    /// example a date beyond year 9999).
    #[error("value has no canonical text form")]
    Unrepresentable,
}

/// Maximum canonical text length per type id, including the terminating NUL.
///
/// Indexed by `TypeId as usize` — the numeric order of the enum is
/// load-bearing here. For `String`/`WString` the entry is the per-character
/// multiplier; structural kinds have no text form and carry 0.
const TEXT_BUFFER_SIZES: [usize; 35] = [
    9,  // Any: "ND (ANY)"
    6,  // Bool: "FALSE"
    5,  // SInt: "-128"
    7,  // Int: "-32768"
    12, // DInt: "-2147483648"
    21, // LInt: "-9223372036854775808"
    5,  // USInt: "255" (sized like SInt)
    7,  // UInt: "65535" (sized like Int)
    12, // UDInt: "4294967295" (sized like DInt)
    22, // ULInt: "18446744073709551615"
    9,  // Byte: decimal, sized for an 8-bit pattern
    17, // Word: decimal, sized for a 16-bit pattern
    33, // DWord: decimal, sized for a 32-bit pattern
    65, // LWord: decimal, sized for a 64-bit pattern
    11, // Date: "9999-12-31"
    13, // TimeOfDay: "23:59:59.999"
    24, // DateAndTime: "9999-12-31-23:59:59.999"
    23, // Time: "-9223372036854775808ms"
    3,  // Char: one 8-bit character, up to two UTF-8 bytes
    4,  // WChar: one 16-bit character, up to three UTF-8 bytes
    11, // LDate: "2554-07-21"
    19, // LTimeOfDay: "23:59:59.999999999"
    30, // LDateAndTime: "2554-07-21-23:34:33.709551615"
    23, // LTime: "-9223372036854775808ns"
    17, // Real: "-1.1754944e-38"
    25, // LReal: "-2.2250738585072014e-308"
    2,  // String: per-character multiplier
    4,  // WString: per-character multiplier
    0, 0, 0, 0, 0, 0, 0, // structural kinds: no text form
];

/// Raw table entry for a type id: an absolute bound for scalar kinds, a
/// per-character multiplier for the string kinds, 0 for structural kinds.
#[must_use]
pub fn text_buffer_entry(id: TypeId) -> usize {
    TEXT_BUFFER_SIZES[id as usize]
}

const NS_PER_DAY: u64 = 86_400_000_000_000;
const MS_PER_DAY: u64 = 86_400_000;

impl Value {
    /// Buffer size needed by [`Value::to_text`], including the terminating
    /// NUL. O(1) for scalar kinds; for strings the static table entry is a
    /// per-character multiplier applied to the current content plus the two
    /// quotes and the NUL.
    #[must_use]
    pub fn text_buffer_size(&self) -> usize {
        match self {
            Self::String(s) => text_buffer_entry(TypeId::String) * s.len() + 3,
            Self::WString(s) => text_buffer_entry(TypeId::WString) * s.chars().count() + 3,
            other => text_buffer_entry(other.type_id()),
        }
    }

    /// Writes the canonical, NUL-terminated text form into `buf` and returns
    /// the length excluding the NUL.
    ///
    /// # Errors
    /// [`TextError::BufferTooSmall`] when `buf` is smaller than
    /// [`Value::text_buffer_size`]; [`TextError::Unrepresentable`] when the
    /// stored quantity has no canonical form (date beyond year 9999, time of
    /// day beyond one day, an unpaired wide character).
    pub fn to_text(&self, buf: &mut [u8]) -> Result<usize, TextError> {
        let required = self.text_buffer_size();
        if buf.len() < required {
            return Err(TextError::BufferTooSmall {
                required,
                capacity: buf.len(),
            });
        }
        let rendered = render(self)?;
        // The table bounds every canonical form; a longer rendering would be
        // a table bug, not a caller error.
        debug_assert!(rendered.len() < required);
        if rendered.len() + 1 > buf.len() {
            return Err(TextError::BufferTooSmall {
                required: rendered.len() + 1,
                capacity: buf.len(),
            });
        }
        buf[..rendered.len()].copy_from_slice(rendered.as_bytes());
        buf[rendered.len()] = 0;
        Ok(rendered.len())
    }

    /// Parses `text` into this value and returns the number of bytes
    /// consumed.
    ///
    /// On a concrete value the canonical payload is expected, optionally
    /// prefixed by the value's own type name and `#`. On an `Any`
    /// placeholder a `TypeName#payload` tag is required; failure resets the
    /// value to `Any`.
    pub fn from_text(&mut self, text: &str) -> Result<usize, TextError> {
        if self.type_id() == TypeId::Any {
            return from_text_any(self, text);
        }
        let (payload, offset) = strip_type_prefix(self.type_id(), text);
        let consumed = parse_into(self, payload)?;
        Ok(offset + consumed)
    }
}

fn from_text_any(slot: &mut Value, text: &str) -> Result<usize, TextError> {
    let hash = text.find('#').ok_or(TextError::MissingTag)?;
    let name = text[..hash].to_ascii_uppercase();
    let ty = registry::type_from_name(&name).ok_or(TextError::UnknownTypeName)?;
    let Some(concrete) = Value::default_for(ty) else {
        return Err(TextError::UnknownTypeName);
    };
    if ty == TypeId::Any {
        return Err(TextError::UnknownTypeName);
    }
    *slot = concrete;
    match slot.from_text(text) {
        Ok(consumed) => Ok(consumed),
        Err(err) => {
            // Change back to an unparameterized placeholder on any failure.
            *slot = Value::Any;
            Err(err)
        }
    }
}

fn strip_type_prefix(id: TypeId, text: &str) -> (&str, usize) {
    if let Some(pos) = text.find('#') {
        if text[..pos].eq_ignore_ascii_case(id.name()) {
            return (&text[pos + 1..], pos + 1);
        }
    }
    (text, 0)
}

fn render(value: &Value) -> Result<String, TextError> {
    Ok(match value {
        Value::Any => ANY_TEXT.to_owned(),
        Value::Bool(true) => "TRUE".to_owned(),
        Value::Bool(false) => "FALSE".to_owned(),
        Value::SInt(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::DInt(v) => v.to_string(),
        Value::LInt(v) => v.to_string(),
        Value::USInt(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::UDInt(v) => v.to_string(),
        Value::ULInt(v) => v.to_string(),
        Value::Byte(v) => v.to_string(),
        Value::Word(v) => v.to_string(),
        Value::DWord(v) => v.to_string(),
        Value::LWord(v) => v.to_string(),
        Value::Date(days) => render_date(*days)?,
        Value::TimeOfDay(ms) => render_time_of_day(u64::from(*ms), 1_000, 3)?,
        Value::DateAndTime(ms) => {
            let date = render_date(ms / MS_PER_DAY)?;
            let tod = render_time_of_day(ms % MS_PER_DAY, 1_000, 3)?;
            format!("{date}-{tod}")
        }
        Value::Time(ms) => format!("{ms}ms"),
        Value::Char(c) => char::from(*c).to_string(),
        Value::WChar(w) => char::from_u32(u32::from(*w))
            .ok_or(TextError::Unrepresentable)?
            .to_string(),
        Value::LDate(ns) => render_date(ns / NS_PER_DAY)?,
        Value::LTimeOfDay(ns) => render_time_of_day(*ns, 1_000_000_000, 9)?,
        Value::LDateAndTime(ns) => {
            let date = render_date(ns / NS_PER_DAY)?;
            let tod = render_time_of_day(ns % NS_PER_DAY, 1_000_000_000, 9)?;
            format!("{date}-{tod}")
        }
        Value::LTime(ns) => format!("{ns}ns"),
        Value::Real(v) => format!("{v:e}"),
        Value::LReal(v) => format!("{v:e}"),
        Value::String(s) => quote(s, '\''),
        Value::WString(s) => quote(s, '"'),
    })
}

fn render_date(days: u64) -> Result<String, TextError> {
    let (year, month, day) = civil_from_days(days as i64);
    if !(0..=9999).contains(&year) {
        return Err(TextError::Unrepresentable);
    }
    Ok(format!("{year:04}-{month:02}-{day:02}"))
}

/// Renders a sub-day quantity as `HH:MM:SS.<fraction>`; `per_second` is the
/// stored resolution and `digits` the canonical fraction width.
fn render_time_of_day(raw: u64, per_second: u64, digits: usize) -> Result<String, TextError> {
    let total_seconds = raw / per_second;
    if total_seconds >= 86_400 {
        return Err(TextError::Unrepresentable);
    }
    let fraction = raw % per_second;
    let (h, m, s) = (
        total_seconds / 3600,
        total_seconds % 3600 / 60,
        total_seconds % 60,
    );
    Ok(format!("{h:02}:{m:02}:{s:02}.{fraction:0digits$}"))
}

fn quote(text: &str, q: char) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(q);
    for c in text.chars() {
        if c == '$' || c == q {
            out.push('$');
        }
        out.push(c);
    }
    out.push(q);
    out
}

fn parse_into(value: &mut Value, payload: &str) -> Result<usize, TextError> {
    match value {
        // `Any` is handled by the tagged path before this is reached.
        Value::Any => Err(TextError::MissingTag),
        Value::Bool(slot) => parse_bool(payload, slot),
        Value::SInt(slot) => parse_signed(payload, "SINT", i64::from(i8::MIN), i64::from(i8::MAX))
            .map(|(v, n)| {
                *slot = v as i8;
                n
            }),
        Value::Int(slot) => parse_signed(payload, "INT", i64::from(i16::MIN), i64::from(i16::MAX))
            .map(|(v, n)| {
                *slot = v as i16;
                n
            }),
        Value::DInt(slot) => {
            parse_signed(payload, "DINT", i64::from(i32::MIN), i64::from(i32::MAX)).map(|(v, n)| {
                *slot = v as i32;
                n
            })
        }
        Value::LInt(slot) => parse_signed(payload, "LINT", i64::MIN, i64::MAX).map(|(v, n)| {
            *slot = v;
            n
        }),
        Value::USInt(slot) => parse_unsigned(payload, "USINT", u64::from(u8::MAX), false).map(
            |(v, n)| {
                *slot = v as u8;
                n
            },
        ),
        Value::UInt(slot) => parse_unsigned(payload, "UINT", u64::from(u16::MAX), false).map(
            |(v, n)| {
                *slot = v as u16;
                n
            },
        ),
        Value::UDInt(slot) => parse_unsigned(payload, "UDINT", u64::from(u32::MAX), false).map(
            |(v, n)| {
                *slot = v as u32;
                n
            },
        ),
        Value::ULInt(slot) => parse_unsigned(payload, "ULINT", u64::MAX, false).map(|(v, n)| {
            *slot = v;
            n
        }),
        Value::Byte(slot) => {
            parse_unsigned(payload, "BYTE", u64::from(u8::MAX), true).map(|(v, n)| {
                *slot = v as u8;
                n
            })
        }
        Value::Word(slot) => {
            parse_unsigned(payload, "WORD", u64::from(u16::MAX), true).map(|(v, n)| {
                *slot = v as u16;
                n
            })
        }
        Value::DWord(slot) => {
            parse_unsigned(payload, "DWORD", u64::from(u32::MAX), true).map(|(v, n)| {
                *slot = v as u32;
                n
            })
        }
        Value::LWord(slot) => parse_unsigned(payload, "LWORD", u64::MAX, true).map(|(v, n)| {
            *slot = v;
            n
        }),
        Value::Date(slot) => parse_date(payload).map(|(days, n)| {
            *slot = days;
            n
        }),
        Value::TimeOfDay(slot) => parse_time_of_day(payload, 1_000, 3).map(|(ms, n)| {
            *slot = ms as u32;
            n
        }),
        Value::DateAndTime(slot) => parse_date_and_time(payload, 1_000, 3, MS_PER_DAY).map(
            |(ms, n)| {
                *slot = ms;
                n
            },
        ),
        Value::Time(slot) => parse_duration(payload, "TIME", "ms").map(|(v, n)| {
            *slot = v;
            n
        }),
        Value::Char(slot) => parse_char(payload, 0xFF, "CHAR").map(|(c, n)| {
            *slot = c as u8;
            n
        }),
        Value::WChar(slot) => parse_char(payload, 0xFFFF, "WCHAR").map(|(c, n)| {
            *slot = c as u16;
            n
        }),
        Value::LDate(slot) => parse_date(payload).map(|(days, n)| {
            *slot = days.saturating_mul(NS_PER_DAY);
            n
        }),
        Value::LTimeOfDay(slot) => parse_time_of_day(payload, 1_000_000_000, 9).map(|(ns, n)| {
            *slot = ns;
            n
        }),
        Value::LDateAndTime(slot) => parse_date_and_time(payload, 1_000_000_000, 9, NS_PER_DAY)
            .map(|(ns, n)| {
                *slot = ns;
                n
            }),
        Value::LTime(slot) => parse_duration(payload, "LTIME", "ns").map(|(v, n)| {
            *slot = v;
            n
        }),
        Value::Real(slot) => parse_float(payload, "REAL").map(|(v, n)| {
            *slot = v as f32;
            n
        }),
        Value::LReal(slot) => parse_float(payload, "LREAL").map(|(v, n)| {
            *slot = v;
            n
        }),
        Value::String(slot) => parse_quoted(payload, '\'', "STRING").map(|(s, n)| {
            *slot = s;
            n
        }),
        Value::WString(slot) => parse_quoted(payload, '"', "WSTRING").map(|(s, n)| {
            *slot = s;
            n
        }),
    }
}

fn parse_bool(payload: &str, slot: &mut bool) -> Result<usize, TextError> {
    let head = payload.as_bytes();
    if head.len() >= 4 && head[..4].eq_ignore_ascii_case(b"TRUE") {
        *slot = true;
        Ok(4)
    } else if head.len() >= 5 && head[..5].eq_ignore_ascii_case(b"FALSE") {
        *slot = false;
        Ok(5)
    } else if head.first() == Some(&b'1') {
        *slot = true;
        Ok(1)
    } else if head.first() == Some(&b'0') {
        *slot = false;
        Ok(1)
    } else {
        Err(TextError::Malformed { kind: "BOOL" })
    }
}

/// Scans a decimal token (optional sign, digits, `_` separators) and returns
/// the cleaned digits and the scanned length.
fn scan_decimal(payload: &str, signed: bool) -> (String, usize) {
    let mut cleaned = String::new();
    let mut len = 0;
    for (i, c) in payload.char_indices() {
        if i == 0 && signed && (c == '+' || c == '-') {
            if c == '-' {
                cleaned.push(c);
            }
            len = c.len_utf8();
            continue;
        }
        if c.is_ascii_digit() {
            cleaned.push(c);
            len = i + 1;
        } else if c == '_' && !cleaned.is_empty() {
            len = i + 1;
        } else {
            break;
        }
    }
    (cleaned, len)
}

fn parse_signed(
    payload: &str,
    kind: &'static str,
    min: i64,
    max: i64,
) -> Result<(i64, usize), TextError> {
    let (digits, len) = scan_decimal(payload, true);
    let parsed: i64 = digits
        .parse()
        .map_err(|_| TextError::Malformed { kind })?;
    if parsed < min || parsed > max {
        return Err(TextError::Malformed { kind });
    }
    Ok((parsed, len))
}

fn parse_unsigned(
    payload: &str,
    kind: &'static str,
    max: u64,
    based_literals: bool,
) -> Result<(u64, usize), TextError> {
    if based_literals {
        for (prefix, radix) in [("2#", 2), ("8#", 8), ("16#", 16)] {
            if let Some(rest) = payload.strip_prefix(prefix) {
                let mut end = 0;
                for (i, c) in rest.char_indices() {
                    if c.is_digit(radix) || c == '_' {
                        end = i + c.len_utf8();
                    } else {
                        break;
                    }
                }
                let cleaned: String = rest[..end].chars().filter(|&c| c != '_').collect();
                let parsed = u64::from_str_radix(&cleaned, radix)
                    .map_err(|_| TextError::Malformed { kind })?;
                if parsed > max {
                    return Err(TextError::Malformed { kind });
                }
                return Ok((parsed, prefix.len() + end));
            }
        }
    }
    let (digits, len) = scan_decimal(payload, false);
    let parsed: u64 = digits
        .parse()
        .map_err(|_| TextError::Malformed { kind })?;
    if parsed > max {
        return Err(TextError::Malformed { kind });
    }
    Ok((parsed, len))
}

fn parse_float(payload: &str, kind: &'static str) -> Result<(f64, usize), TextError> {
    let mut end = 0;
    for (i, c) in payload.char_indices() {
        let part_of_float = c.is_ascii_digit()
            || matches!(c, '+' | '-' | '.' | '_')
            || matches!(c, 'e' | 'E' | 'i' | 'n' | 'f' | 'a' | 'N' | 'A' | 'I' | 'F');
        if part_of_float {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    let cleaned: String = payload[..end].chars().filter(|&c| c != '_').collect();
    let parsed: f64 = cleaned
        .parse()
        .map_err(|_| TextError::Malformed { kind })?;
    Ok((parsed, end))
}

fn parse_duration(
    payload: &str,
    kind: &'static str,
    unit: &str,
) -> Result<(i64, usize), TextError> {
    let (digits, len) = scan_decimal(payload, true);
    let parsed: i64 = digits
        .parse()
        .map_err(|_| TextError::Malformed { kind })?;
    if !payload[len..].starts_with(unit) {
        return Err(TextError::Malformed { kind });
    }
    Ok((parsed, len + unit.len()))
}

fn parse_fixed_digits(payload: &str, count: usize, kind: &'static str) -> Result<u64, TextError> {
    if payload.len() < count || !payload.as_bytes()[..count].iter().all(u8::is_ascii_digit) {
        return Err(TextError::Malformed { kind });
    }
    payload[..count]
        .parse()
        .map_err(|_| TextError::Malformed { kind })
}

/// Parses `YYYY-MM-DD` into days since 1970-01-01. Pre-epoch dates have no
/// representation in the stored day count and are rejected.
fn parse_date(payload: &str) -> Result<(u64, usize), TextError> {
    const KIND: &str = "DATE";
    let year = parse_fixed_digits(payload, 4, KIND)?;
    expect_byte(payload, 4, b'-', KIND)?;
    let month = parse_fixed_digits(&payload[5..], 2, KIND)?;
    expect_byte(payload, 7, b'-', KIND)?;
    let day = parse_fixed_digits(&payload[8..], 2, KIND)?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(TextError::Malformed { kind: KIND });
    }
    let days = days_from_civil(year as i64, month as u32, day as u32);
    if days < 0 {
        return Err(TextError::Malformed { kind: KIND });
    }
    Ok((days as u64, 10))
}

fn expect_byte(payload: &str, at: usize, byte: u8, kind: &'static str) -> Result<(), TextError> {
    if payload.as_bytes().get(at) == Some(&byte) {
        Ok(())
    } else {
        Err(TextError::Malformed { kind })
    }
}

/// Parses `HH:MM:SS` with an optional fraction of up to `digits` digits,
/// returning the quantity at `per_second` resolution.
fn parse_time_of_day(
    payload: &str,
    per_second: u64,
    digits: usize,
) -> Result<(u64, usize), TextError> {
    const KIND: &str = "TIME_OF_DAY";
    let h = parse_fixed_digits(payload, 2, KIND)?;
    expect_byte(payload, 2, b':', KIND)?;
    let m = parse_fixed_digits(&payload[3..], 2, KIND)?;
    expect_byte(payload, 5, b':', KIND)?;
    let s = parse_fixed_digits(&payload[6..], 2, KIND)?;
    if h >= 24 || m >= 60 || s >= 60 {
        return Err(TextError::Malformed { kind: KIND });
    }
    let mut total = (h * 3600 + m * 60 + s) * per_second;
    let mut consumed = 8;
    if payload.as_bytes().get(8) == Some(&b'.') {
        let rest = &payload[9..];
        let avail = rest
            .bytes()
            .take(digits)
            .take_while(u8::is_ascii_digit)
            .count();
        if avail == 0 {
            return Err(TextError::Malformed { kind: KIND });
        }
        let fraction: u64 = parse_fixed_digits(rest, avail, KIND)?;
        let scale = 10u64.pow((digits - avail) as u32);
        total += fraction * scale;
        consumed = 9 + avail;
    }
    Ok((total, consumed))
}

fn parse_date_and_time(
    payload: &str,
    per_second: u64,
    digits: usize,
    per_day: u64,
) -> Result<(u64, usize), TextError> {
    const KIND: &str = "DATE_AND_TIME";
    let (days, date_len) = parse_date(payload)?;
    expect_byte(payload, date_len, b'-', KIND)?;
    let (tod, tod_len) = parse_time_of_day(&payload[date_len + 1..], per_second, digits)?;
    let total = days
        .checked_mul(per_day)
        .and_then(|d| d.checked_add(tod))
        .ok_or(TextError::Malformed { kind: KIND })?;
    Ok((total, date_len + 1 + tod_len))
}

fn parse_char(payload: &str, max: u32, kind: &'static str) -> Result<(u32, usize), TextError> {
    let c = payload
        .chars()
        .next()
        .ok_or(TextError::Malformed { kind })?;
    let code = c as u32;
    if code > max {
        return Err(TextError::Malformed { kind });
    }
    Ok((code, c.len_utf8()))
}

fn parse_quoted(payload: &str, q: char, kind: &'static str) -> Result<(String, usize), TextError> {
    let mut chars = payload.char_indices();
    match chars.next() {
        Some((_, c)) if c == q => {}
        _ => return Err(TextError::Malformed { kind }),
    }
    let mut out = String::new();
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            if c == '$' || c == q {
                out.push(c);
                escaped = false;
            } else {
                return Err(TextError::Malformed { kind });
            }
        } else if c == '$' {
            escaped = true;
        } else if c == q {
            return Ok((out, i + c.len_utf8()));
        } else {
            out.push(c);
        }
    }
    Err(TextError::Malformed { kind })
}

/// Days since 1970-01-01 to civil `(year, month, day)`.
/// Standard era-based conversion over the proleptic Gregorian calendar.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (if m <= 2 { y + 1 } else { y }, m as u32, d as u32)
}

/// Civil `(year, month, day)` to days since 1970-01-01.
fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = i64::from(if m > 2 { m - 3 } else { m + 9 });
    let doy = (153 * mp + 2) / 5 + i64::from(d) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
