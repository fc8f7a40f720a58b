//! Implicit and explicit tag resolution.
//!
//! Plain scalars get their tag from their text using the YAML 1.2 core
//! schema (with the `<<` merge key added). Explicit tags from the source
//! are normalized to [`Tag`] variants.

use crate::Tag;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?(0x[0-9a-fA-F]+|0o[0-7]+|0b[01]+|[0-9]+)$").unwrap());

static FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?|[-+]?\.(inf|Inf|INF)|\.(nan|NaN|NAN))$",
    )
    .unwrap()
});

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9]{4}-[0-9]{2}-[0-9]{2}([Tt ][0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?([Zz]|[-+][0-9]{2}:[0-9]{2})?)?$",
    )
    .unwrap()
});

/// Tag a plain (unquoted, untagged) scalar would resolve to.
///
/// The emitter uses the same function to decide whether a string needs
/// quoting, so both directions always agree.
pub fn resolve_plain(value: &str) -> Tag {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => return Tag::Null,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => return Tag::Bool,
        "<<" => return Tag::Merge,
        _ => {}
    }

    // Everything numeric or date-like starts with one of these.
    match value.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '+' || c == '-' || c == '.' => {}
        _ => return Tag::Str,
    }

    if INT_RE.is_match(value) {
        Tag::Int
    } else if FLOAT_RE.is_match(value) {
        Tag::Float
    } else if parse_timestamp(value).is_some() {
        Tag::Timestamp
    } else {
        Tag::Str
    }
}

/// A parsed `!!timestamp` value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Timestamp {
    Date(NaiveDate),
    Local(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

/// Whether `value` has the digit layout of a timestamp, valid or not.
pub(crate) fn looks_like_timestamp(value: &str) -> bool {
    TIMESTAMP_RE.is_match(value)
}

/// Parse a YAML timestamp. `None` unless the text has the timestamp layout
/// and names a real date and time.
pub(crate) fn parse_timestamp(value: &str) -> Option<Timestamp> {
    if !looks_like_timestamp(value) {
        return None;
    }
    if value.len() == 10 {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .map(Timestamp::Date);
    }

    // Normalize the separators YAML allows but RFC 3339 parsers may not.
    let mut normalized: String = value
        .char_indices()
        .map(|(i, c)| match c {
            't' | ' ' if i == 10 => 'T',
            'z' => 'Z',
            c => c,
        })
        .collect();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(Timestamp::Zoned(datetime));
    }
    if normalized.ends_with('Z') {
        normalized.pop();
    }
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(Timestamp::Local)
}

/// Whether `value` is in the float grammar, including integer-looking
/// decimal literals such as `1` (valid under an explicit `!!float`).
pub(crate) fn is_float_literal(value: &str) -> bool {
    FLOAT_RE.is_match(value)
}

/// Whether `value` is one of the `.inf` / `.nan` spellings.
pub(crate) fn is_special_float(value: &str) -> bool {
    let unsigned = value.strip_prefix(['-', '+']).unwrap_or(value);
    matches!(
        unsigned,
        ".inf" | ".Inf" | ".INF" | ".nan" | ".NaN" | ".NAN"
    )
}

/// Normalize an explicit tag from the parser.
///
/// Both the `!!` shorthand and its expanded `tag:yaml.org,2002:` form map to
/// the core variants. The non-specific `!` tag means "string"; depending on
/// the scanner it arrives either as handle `!` or as suffix `!`.
pub(crate) fn resolve_explicit(tag: &yaml_rust2::parser::Tag) -> Tag {
    match tag.handle.as_str() {
        "!!" | Tag::CORE_PREFIX => Tag::from_core_suffix(&tag.suffix),
        "!" if tag.suffix.is_empty() => Tag::Str,
        "" if tag.suffix == "!" => Tag::Str,
        "" => match tag.suffix.strip_prefix(Tag::CORE_PREFIX) {
            Some(suffix) => Tag::from_core_suffix(suffix),
            None => Tag::Other(tag.suffix.clone()),
        },
        handle => Tag::Other(format!("{}{}", handle, tag.suffix)),
    }
}
