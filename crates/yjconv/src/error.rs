//! Error types for YAML/JSON conversion.

use crate::SourceInfo;
use std::fmt;
use thiserror::Error;

/// Result type alias for yjconv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The category of a conversion failure.
///
/// Context wrapping never changes the kind, so callers can branch on it no
/// matter how deep the error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Scalar text does not match the grammar of its tag.
    MalformedScalar,
    /// A YAML feature that is intentionally not supported.
    Unimplemented,
    /// The node tree is structurally invalid for conversion.
    ConversionFailure,
    /// The underlying text parser, emitter or JSON codec failed.
    CodecFailure,
}

/// The codec stage that produced a [`Error::Codec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParseYaml,
    EmitYaml,
    EncodeJson,
    DecodeJson,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ParseYaml => "parse YAML",
            Stage::EmitYaml => "emit YAML",
            Stage::EncodeJson => "encode JSON",
            Stage::DecodeJson => "decode JSON",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while converting between YAML and JSON.
#[derive(Debug, Error)]
pub enum Error {
    /// Scalar text that cannot be read as its tag.
    #[error("malformed {tag} scalar {value:?}: {reason}{}", at(.location))]
    MalformedScalar {
        tag: String,
        value: String,
        reason: String,
        location: Option<SourceInfo>,
    },

    /// Unsupported YAML construct.
    #[error("{feature} not implemented{}", at(.location))]
    Unimplemented {
        feature: &'static str,
        location: Option<SourceInfo>,
    },

    /// Structurally invalid node tree.
    #[error("{message}{}", at(.location))]
    ConversionFailure {
        message: String,
        location: Option<SourceInfo>,
    },

    /// Failure of the YAML parser/emitter or the JSON codec.
    #[error("{stage} failed: {source}")]
    Codec {
        stage: Stage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error annotated with the operation it surfaced from.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

fn at(location: &Option<SourceInfo>) -> String {
    match location {
        Some(location) => format!(" at {}", location),
        None => String::new(),
    }
}

impl Error {
    pub fn malformed(
        tag: impl fmt::Display,
        value: impl Into<String>,
        reason: impl Into<String>,
        location: Option<SourceInfo>,
    ) -> Self {
        Error::MalformedScalar {
            tag: tag.to_string(),
            value: value.into(),
            reason: reason.into(),
            location,
        }
    }

    pub fn unimplemented(feature: &'static str, location: Option<SourceInfo>) -> Self {
        Error::Unimplemented { feature, location }
    }

    pub fn conversion(message: impl Into<String>, location: Option<SourceInfo>) -> Self {
        Error::ConversionFailure {
            message: message.into(),
            location,
        }
    }

    pub fn codec(
        stage: Stage,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Codec {
            stage,
            source: source.into(),
        }
    }

    /// Wrap this error with the name of the operation that failed.
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The kind of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedScalar { .. } => ErrorKind::MalformedScalar,
            Error::Unimplemented { .. } => ErrorKind::Unimplemented,
            Error::ConversionFailure { .. } => ErrorKind::ConversionFailure,
            Error::Codec { .. } => ErrorKind::CodecFailure,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// Source location of the innermost error, when one was recorded.
    pub fn location(&self) -> Option<SourceInfo> {
        match self {
            Error::MalformedScalar { location, .. }
            | Error::Unimplemented { location, .. }
            | Error::ConversionFailure { location, .. } => *location,
            Error::Codec { .. } => None,
            Error::Context { source, .. } => source.location(),
        }
    }
}

impl From<yaml_rust2::scanner::ScanError> for Error {
    fn from(err: yaml_rust2::scanner::ScanError) -> Self {
        Error::codec(Stage::ParseYaml, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::codec(Stage::DecodeJson, err)
    }
}

impl From<fmt::Error> for Error {
    fn from(err: fmt::Error) -> Self {
        Error::codec(Stage::EmitYaml, err)
    }
}
