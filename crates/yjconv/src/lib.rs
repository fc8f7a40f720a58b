//! # yjconv
//!
//! Bidirectional YAML ↔ JSON conversion over a generic node tree.
//!
//! YAML text is parsed by `yaml-rust2` into a [`Tree`] of [`Node`]s that keep
//! their resolved tag, presentation style and source location. From there:
//!
//! - [`convert`] turns a tree into a `serde_json::Value` (merge keys expanded,
//!   non-string keys coerced to their literal text, floats normalized);
//! - [`format`] restyles a tree for block output and [`emit`] writes it back
//!   as YAML text.
//!
//! JSON is a subset of YAML, so [`json_to_yaml`] reuses the same parser.
//! [`marshal`] and [`unmarshal`] layer `serde` types on top of both paths.
//!
//! ## Example
//!
//! ```rust
//! let json = yjconv::yaml_to_json(b"name: web\nports: [80, 443]\n").unwrap();
//! assert_eq!(json, br#"{"name":"web","ports":[80,443]}"#);
//!
//! let yaml = yjconv::json_to_yaml(&json, yjconv::DEFAULT_INDENT).unwrap();
//! assert_eq!(yaml, b"name: web\nports:\n  - 80\n  - 443\n");
//! ```

mod convert;
mod emitter;
mod error;
mod format;
mod marshal;
mod node;
mod parser;
mod resolve;
mod source_info;

pub use convert::{
    ConvertOptions, FloatPrecision, convert, convert_with, yaml_to_json, yaml_to_json_with,
    yaml_to_value,
};
pub use emitter::{DEFAULT_INDENT, emit};
pub use error::{Error, ErrorKind, Result, Stage};
pub use format::{FormatOptions, format, json_to_yaml, json_to_yaml_with};
pub use marshal::{DecodeOptions, marshal, marshal_with, unmarshal, unmarshal_with};
pub use node::{AnchorId, MAX_MERGE_DEPTH, Node, NodeId, NodeKind, Style, Tag, Tree};
pub use parser::{parse, parse_bytes};
pub use resolve::resolve_plain;
pub use source_info::SourceInfo;
