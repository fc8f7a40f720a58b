//! Typed encoding and decoding through the JSON converters.
//!
//! Values are serialized with `serde_json` and turned into YAML by the
//! JSON→YAML path; YAML is turned into JSON first and then deserialized, so
//! the serde attributes of a type (`rename`, `default`, `flatten`, ...) apply
//! to YAML exactly as they do to JSON.

use crate::convert::to_json_value;
use crate::format::render_yaml;
use crate::{ConvertOptions, Error, FloatPrecision, FormatOptions, Result, Stage};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Options for typed decoding.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Reject input keys the target type does not consume.
    pub deny_unknown_fields: bool,
    /// Read floats at 64-bit precision instead of 32-bit.
    pub preserve_numeric_precision: bool,
}

impl DecodeOptions {
    pub fn deny_unknown_fields(mut self) -> Self {
        self.deny_unknown_fields = true;
        self
    }

    pub fn preserve_numeric_precision(mut self) -> Self {
        self.preserve_numeric_precision = true;
        self
    }

    fn convert_options(&self) -> ConvertOptions {
        let precision = if self.preserve_numeric_precision {
            FloatPrecision::Double
        } else {
            FloatPrecision::Single
        };
        ConvertOptions::default().with_float_precision(precision)
    }
}

/// Serialize `value` as YAML with the default indentation.
pub fn marshal<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    marshal_with(value, &FormatOptions::default())
}

/// Serialize `value` as YAML.
pub fn marshal_with<T: Serialize + ?Sized>(value: &T, options: &FormatOptions) -> Result<Vec<u8>> {
    let encode = || -> Result<String> {
        let json = serde_json::to_vec(value).map_err(|e| Error::codec(Stage::EncodeJson, e))?;
        render_yaml(&json, options).map_err(|e| e.context("converting JSON to YAML"))
    };
    let yaml = encode().map_err(|e| e.context("marshal"))?;
    tracing::debug!(output = yaml.len(), "marshaled value to YAML");
    Ok(yaml.into_bytes())
}

/// Deserialize a `T` from YAML text.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Config {
///     name: String,
///     port: u16,
/// }
///
/// let config: Config = yjconv::unmarshal(b"name: web\nport: 8080\n").unwrap();
/// assert_eq!(config.name, "web");
/// assert_eq!(config.port, 8080);
/// ```
pub fn unmarshal<T: DeserializeOwned>(yaml: &[u8]) -> Result<T> {
    unmarshal_with(yaml, &DecodeOptions::default())
}

/// Deserialize a `T` from YAML text with explicit options.
pub fn unmarshal_with<T: DeserializeOwned>(yaml: &[u8], options: &DecodeOptions) -> Result<T> {
    decode(yaml, options).map_err(|e| e.context("unmarshal"))
}

fn decode<T: DeserializeOwned>(yaml: &[u8], options: &DecodeOptions) -> Result<T> {
    let value = to_json_value(yaml, &options.convert_options())
        .map_err(|e| e.context("converting YAML to JSON"))?;

    if !options.deny_unknown_fields {
        return T::deserialize(value).map_err(|e| Error::codec(Stage::DecodeJson, e));
    }

    let mut unknown = Vec::new();
    let decoded = serde_ignored::deserialize(value, |path| unknown.push(path.to_string()))
        .map_err(|e| Error::codec(Stage::DecodeJson, e))?;
    if !unknown.is_empty() {
        let fields: Vec<String> = unknown.iter().map(|path| format!("`{}`", path)).collect();
        return Err(Error::codec(
            Stage::DecodeJson,
            format!("unknown field {}", fields.join(", ")),
        ));
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Server {
        host: String,
        port: u16,
    }

    #[test]
    fn test_unmarshal_struct() {
        let server: Server = unmarshal(b"host: localhost\nport: 8080\n").unwrap();
        assert_eq!(
            server,
            Server {
                host: "localhost".into(),
                port: 8080
            }
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored_by_default() {
        let server: Server = unmarshal(b"host: a\nport: 1\nextra: true\n").unwrap();
        assert_eq!(server.host, "a");
    }

    #[test]
    fn test_deny_unknown_fields_reports_path() {
        let options = DecodeOptions::default().deny_unknown_fields();
        let err = unmarshal_with::<Server>(b"host: a\nport: 1\nextra: true\n", &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CodecFailure);
        assert_eq!(
            err.to_string(),
            "unmarshal: decode JSON failed: unknown field `extra`"
        );
    }

    #[test]
    fn test_type_mismatch_is_codec_failure() {
        let err = unmarshal::<Server>(b"host: a\nport: many\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CodecFailure);
        assert!(err.to_string().starts_with("unmarshal: decode JSON failed"));
    }

    #[test]
    fn test_conversion_errors_keep_their_kind() {
        let err = unmarshal::<Server>(b"host: !!binary aGk=\nport: 1\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented);
        assert!(
            err.to_string()
                .starts_with("unmarshal: converting YAML to JSON: binary scalar not implemented"),
            "{}",
            err
        );

        let err = unmarshal::<Server>(b"host: a\nport: !!int x1\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedScalar);
        assert!(err.to_string().starts_with("unmarshal: converting YAML to JSON: malformed"));
    }

    #[test]
    fn test_marshal_struct() {
        let server = Server {
            host: "true".into(),
            port: 80,
        };
        assert_eq!(
            String::from_utf8(marshal(&server).unwrap()).unwrap(),
            "host: \"true\"\nport: 80\n"
        );
    }

    #[test]
    fn test_preserve_numeric_precision() {
        let default: f64 = unmarshal(b"0.1").unwrap();
        assert_eq!(default, f64::from(0.1f32));

        let options = DecodeOptions::default().preserve_numeric_precision();
        let precise: f64 = unmarshal_with(b"0.1", &options).unwrap();
        assert_eq!(precise, 0.1);
    }
}
