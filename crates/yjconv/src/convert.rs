//! YAML node tree to JSON value conversion.

use crate::parser::parse_bytes;
use crate::resolve::{Timestamp, is_float_literal, is_special_float, parse_timestamp};
use crate::{Error, NodeId, NodeKind, Result, SourceInfo, Stage, Tag, Tree};
use chrono::{NaiveDateTime, Timelike};
use serde_json::{Map, Number, Value};

/// Precision used to read `!!float` scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatPrecision {
    /// Parse at 32 bits and widen, so `3.4028235e+38` and
    /// `3.4028234663852886e+38` produce the same JSON number.
    #[default]
    Single,
    /// Parse at full 64-bit precision.
    Double,
}

/// Options for the YAML→JSON direction.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub float_precision: FloatPrecision,
}

impl ConvertOptions {
    pub fn with_float_precision(mut self, float_precision: FloatPrecision) -> Self {
        self.float_precision = float_precision;
        self
    }
}

/// Convert YAML text to compact JSON bytes.
///
/// Object keys keep the order in which they first appear; when a key is
/// repeated (directly or through a merge key) the last value wins.
///
/// # Example
///
/// ```rust
/// let json = yjconv::yaml_to_json(b"a: 1\nb: [true, ~]\n").unwrap();
/// assert_eq!(json, br#"{"a":1,"b":[true,null]}"#);
/// ```
pub fn yaml_to_json(yaml: &[u8]) -> Result<Vec<u8>> {
    yaml_to_json_with(yaml, &ConvertOptions::default())
}

/// [`yaml_to_json`] with explicit options.
pub fn yaml_to_json_with(yaml: &[u8], options: &ConvertOptions) -> Result<Vec<u8>> {
    let value = to_json_value(yaml, options).map_err(|e| e.context("yaml_to_json"))?;
    let json = serde_json::to_vec(&value)
        .map_err(|e| Error::codec(Stage::EncodeJson, e).context("yaml_to_json"))?;
    tracing::debug!(input = yaml.len(), output = json.len(), "converted YAML to JSON");
    Ok(json)
}

/// Convert YAML text to an in-memory JSON value.
pub fn yaml_to_value(yaml: &[u8], options: &ConvertOptions) -> Result<Value> {
    to_json_value(yaml, options).map_err(|e| e.context("yaml_to_json"))
}

pub(crate) fn to_json_value(yaml: &[u8], options: &ConvertOptions) -> Result<Value> {
    let mut tree = parse_bytes(yaml)?;
    tracing::trace!(nodes = tree.len(), "parsed YAML tree");
    convert_with(&mut tree, options)
}

/// Convert a parsed tree with default options.
pub fn convert(tree: &mut Tree) -> Result<Value> {
    convert_with(tree, &ConvertOptions::default())
}

/// Convert a parsed tree to a JSON value.
///
/// Scalars used as mapping keys whose tag is `bool`, `int`, `float` or
/// `timestamp` are retagged `str` in place, so their literal text becomes the
/// key. No other part of the tree is modified.
pub fn convert_with(tree: &mut Tree, options: &ConvertOptions) -> Result<Value> {
    let root = tree
        .root()
        .ok_or_else(|| Error::conversion("tree has no root node", None))?;
    Converter { tree, options }.node(root)
}

struct Converter<'a> {
    tree: &'a mut Tree,
    options: &'a ConvertOptions,
}

impl Converter<'_> {
    fn node(&mut self, id: NodeId) -> Result<Value> {
        let node = &self.tree[id];
        match node.kind {
            NodeKind::Document => {
                let child = match node.children.as_slice() {
                    [child] => *child,
                    children => {
                        return Err(Error::conversion(
                            format!("document must have exactly one child, found {}", children.len()),
                            Some(node.source_info),
                        ));
                    }
                };
                self.node(child)
            }
            NodeKind::Sequence => {
                let children = node.children.clone();
                let mut items = Vec::with_capacity(children.len());
                for child in children {
                    items.push(self.node(child)?);
                }
                Ok(Value::Array(items))
            }
            NodeKind::Mapping => self.mapping(id),
            NodeKind::Scalar => self.scalar(id),
            NodeKind::Alias => Err(Error::unimplemented("alias", Some(node.source_info))),
        }
    }

    fn mapping(&mut self, id: NodeId) -> Result<Value> {
        let entries = self.tree.mapping_entries(id)?;
        let mut map = Map::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.key(key)?;
            let value = self.node(value)?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn key(&mut self, id: NodeId) -> Result<String> {
        let node = &mut self.tree[id];
        if node.kind == NodeKind::Alias {
            return Err(Error::unimplemented("alias", Some(node.source_info)));
        }
        if node.kind != NodeKind::Scalar {
            return Err(Error::conversion(
                format!("mapping key must be a scalar, found {}", node.kind),
                Some(node.source_info),
            ));
        }
        if node.tag.is_key_coercible() {
            node.tag = Tag::Str;
        }
        let location = node.source_info;
        match self.scalar(id)? {
            Value::String(key) => Ok(key),
            other => Err(Error::conversion(
                format!("mapping key must convert to a string, found {}", other),
                Some(location),
            )),
        }
    }

    fn scalar(&self, id: NodeId) -> Result<Value> {
        let node = &self.tree[id];
        let text = node.value.as_str();
        let location = Some(node.source_info);
        match &node.tag {
            Tag::Null => Ok(Value::Null),
            Tag::Bool => convert_bool(text, location),
            Tag::Str => Ok(Value::String(text.to_string())),
            Tag::Int => convert_int(text, location),
            Tag::Float => convert_float(text, self.options.float_precision, location),
            Tag::Timestamp => convert_timestamp(text, location).map(Value::String),
            Tag::Binary => Err(Error::unimplemented("binary scalar", location)),
            tag => Err(Error::malformed(tag, text, "tag is not valid on a scalar", location)),
        }
    }
}

fn convert_bool(text: &str, location: Option<SourceInfo>) -> Result<Value> {
    match text {
        "true" | "True" | "TRUE" => Ok(Value::Bool(true)),
        "false" | "False" | "FALSE" => Ok(Value::Bool(false)),
        _ => Err(Error::malformed(Tag::Bool, text, "invalid boolean", location)),
    }
}

fn convert_int(text: &str, location: Option<SourceInfo>) -> Result<Value> {
    let malformed = |reason: &str| Error::malformed(Tag::Int, text, reason, location);

    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = if let Some(digits) = unsigned.strip_prefix("0x") {
        (16, digits)
    } else if let Some(digits) = unsigned.strip_prefix("0o") {
        (8, digits)
    } else if let Some(digits) = unsigned.strip_prefix("0b") {
        (2, digits)
    } else {
        (10, unsigned)
    };
    // from_str_radix would accept a second sign.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(malformed("invalid integer"));
    }
    let magnitude =
        u64::from_str_radix(digits, radix).map_err(|e| malformed(&e.to_string()))?;

    if negative {
        i64::try_from(-(magnitude as i128))
            .map(Value::from)
            .map_err(|_| malformed("integer is out of range"))
    } else if let Ok(n) = i64::try_from(magnitude) {
        Ok(Value::from(n))
    } else {
        Ok(Value::from(magnitude))
    }
}

fn convert_float(
    text: &str,
    precision: FloatPrecision,
    location: Option<SourceInfo>,
) -> Result<Value> {
    if is_special_float(text) {
        return Err(Error::conversion(
            format!("float {:?} cannot be represented in JSON", text),
            location,
        ));
    }
    let malformed = |reason: &str| Error::malformed(Tag::Float, text, reason, location);
    if !is_float_literal(text) {
        return Err(malformed("invalid float"));
    }

    let value = match precision {
        FloatPrecision::Single => text
            .parse::<f32>()
            .map(f64::from)
            .map_err(|e| malformed(&e.to_string()))?,
        FloatPrecision::Double => text.parse::<f64>().map_err(|e| malformed(&e.to_string()))?,
    };
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| malformed("float is out of range"))
}

/// Parse a YAML timestamp and render it in RFC 3339 form.
fn convert_timestamp(text: &str, location: Option<SourceInfo>) -> Result<String> {
    let timestamp = parse_timestamp(text)
        .ok_or_else(|| Error::malformed(Tag::Timestamp, text, "invalid timestamp", location))?;

    Ok(match timestamp {
        Timestamp::Date(date) => date.format("%Y-%m-%d").to_string(),
        Timestamp::Local(datetime) => render_datetime(&datetime),
        Timestamp::Zoned(datetime) => {
            let mut rendered = render_datetime(&datetime.naive_local());
            if datetime.offset().local_minus_utc() == 0 {
                rendered.push('Z');
            } else {
                rendered.push_str(&datetime.format("%:z").to_string());
            }
            rendered
        }
    })
}

fn render_datetime(datetime: &NaiveDateTime) -> String {
    let mut rendered = datetime.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = datetime.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        rendered.push('.');
        rendered.push_str(fraction.trim_end_matches('0'));
    }
    rendered
}
