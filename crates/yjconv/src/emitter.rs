//! YAML text emitter for styled node trees.
//!
//! Collections are written in block layout unless they are empty or styled
//! [`Style::Flow`]. Scalars honor their style when it can represent the value
//! faithfully and fall back to double quotes otherwise. No `---` marker is
//! written and the output always ends with a newline.

use crate::resolve::{looks_like_timestamp, resolve_plain};
use crate::{Error, NodeId, NodeKind, Result, Style, Tag, Tree};
use std::fmt::Write;

/// Indentation width used when none is given.
pub const DEFAULT_INDENT: usize = 2;

/// Longest key YAML allows in the implicit `key: value` form.
const MAX_IMPLICIT_KEY_LEN: usize = 1024;

/// Render `tree` as YAML text.
///
/// Widths outside `2..=9` fall back to [`DEFAULT_INDENT`].
pub fn emit(tree: &Tree, indent: usize) -> Result<String> {
    let indent = if (2..=9).contains(&indent) {
        indent
    } else {
        tracing::debug!(indent, "indent out of range, using default");
        DEFAULT_INDENT
    };
    let root = tree
        .root()
        .ok_or_else(|| Error::conversion("tree has no root node", None))?;

    let mut emitter = Emitter {
        tree,
        indent,
        out: String::new(),
    };
    emitter.root(root)?;
    Ok(emitter.out)
}

struct Emitter<'a> {
    tree: &'a Tree,
    indent: usize,
    out: String,
}

impl Emitter<'_> {
    fn root(&mut self, id: NodeId) -> Result<()> {
        let node = &self.tree[id];
        if node.kind == NodeKind::Document {
            return match node.children.as_slice() {
                [child] => self.root(*child),
                children => Err(Error::conversion(
                    format!("document must have exactly one child, found {}", children.len()),
                    Some(node.source_info),
                )),
            };
        }

        if self.is_block_collection(id) {
            self.block(id, 0, false)
        } else {
            self.inline_value(id, 0)
        }
    }

    /// Non-empty collection that is not flow styled.
    fn is_block_collection(&self, id: NodeId) -> bool {
        let node = &self.tree[id];
        matches!(node.kind, NodeKind::Sequence | NodeKind::Mapping)
            && !node.children.is_empty()
            && node.style != Style::Flow
    }

    /// Write a block collection whose entries start at column `col`. With
    /// `inline_first` the cursor is already at `col` on the first line.
    fn block(&mut self, id: NodeId, col: usize, inline_first: bool) -> Result<()> {
        let node = &self.tree[id];
        match node.kind {
            NodeKind::Sequence => {
                for (index, &item) in node.children.iter().enumerate() {
                    if index > 0 || !inline_first {
                        self.pad(col);
                    }
                    self.out.push_str("- ");
                    if self.is_block_collection(item) {
                        self.block(item, col + 2, true)?;
                    } else {
                        self.inline_value(item, col)?;
                    }
                }
            }
            NodeKind::Mapping => {
                if node.children.len() % 2 != 0 {
                    return Err(Error::conversion(
                        "mapping node has an odd number of children",
                        Some(node.source_info),
                    ));
                }
                for (index, pair) in node.children.chunks_exact(2).enumerate() {
                    if index > 0 || !inline_first {
                        self.pad(col);
                    }
                    if self.key(pair[0])? {
                        self.out.push('\n');
                        self.pad(col);
                    }
                    self.out.push(':');
                    let value = pair[1];
                    if self.is_block_collection(value) {
                        self.out.push('\n');
                        let nested = col + self.indent;
                        self.block(value, nested, false)?;
                    } else {
                        self.out.push(' ');
                        self.inline_value(value, col)?;
                    }
                }
            }
            kind => {
                return Err(Error::conversion(
                    format!("expected a collection, found {}", kind),
                    Some(node.source_info),
                ));
            }
        }
        Ok(())
    }

    /// Write a scalar or flow collection followed by a newline. Block scalar
    /// content is indented relative to `col`, the column of the owning entry.
    fn inline_value(&mut self, id: NodeId, col: usize) -> Result<()> {
        let node = &self.tree[id];
        match node.kind {
            NodeKind::Scalar if node.style.is_block_scalar() => {
                if let Some(block) = block_scalar(&node.value, node.style, col + self.indent) {
                    self.out.push_str(&block);
                    return Ok(());
                }
                write_double_quoted(&mut self.out, &node.value)?;
            }
            NodeKind::Scalar => self.scalar(id)?,
            NodeKind::Sequence | NodeKind::Mapping => self.flow(id)?,
            NodeKind::Alias => return Err(Error::unimplemented("alias", Some(node.source_info))),
            NodeKind::Document => {
                return Err(Error::conversion(
                    "document node nested inside a document",
                    Some(node.source_info),
                ));
            }
        }
        self.out.push('\n');
        Ok(())
    }

    fn flow(&mut self, id: NodeId) -> Result<()> {
        let node = &self.tree[id];
        match node.kind {
            NodeKind::Sequence => {
                self.out.push('[');
                for (index, &item) in node.children.iter().enumerate() {
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.flow(item)?;
                }
                self.out.push(']');
            }
            NodeKind::Mapping => {
                self.out.push('{');
                for (index, pair) in node.children.chunks(2).enumerate() {
                    let [key, value] = pair else {
                        return Err(Error::conversion(
                            "mapping node has an odd number of children",
                            Some(node.source_info),
                        ));
                    };
                    if index > 0 {
                        self.out.push_str(", ");
                    }
                    self.key(*key)?;
                    self.out.push_str(": ");
                    self.flow(*value)?;
                }
                self.out.push('}');
            }
            NodeKind::Scalar if node.style.is_block_scalar() => {
                write_double_quoted(&mut self.out, &node.value)?;
            }
            NodeKind::Scalar => self.scalar(id)?,
            NodeKind::Alias => return Err(Error::unimplemented("alias", Some(node.source_info))),
            NodeKind::Document => {
                return Err(Error::conversion(
                    "document node nested inside a document",
                    Some(node.source_info),
                ));
            }
        }
        Ok(())
    }

    /// Write a mapping key. Keys too long for the implicit `key: value`
    /// form get a `? ` indicator, and the result is `true`; the caller then
    /// starts the value on its own `: ` line in block context.
    fn key(&mut self, id: NodeId) -> Result<bool> {
        let node = &self.tree[id];
        let start = self.out.len();
        match node.kind {
            NodeKind::Scalar if node.style.is_block_scalar() => {
                write_double_quoted(&mut self.out, &node.value)?;
            }
            NodeKind::Scalar => self.scalar(id)?,
            NodeKind::Alias => return Err(Error::unimplemented("alias", Some(node.source_info))),
            _ => {
                return Err(Error::unimplemented("complex mapping key", Some(node.source_info)));
            }
        }

        let explicit = self.out[start..].chars().count() > MAX_IMPLICIT_KEY_LEN;
        if explicit {
            self.out.insert_str(start, "? ");
        }
        Ok(explicit)
    }

    /// Write a single-line scalar: plain, single- or double-quoted.
    fn scalar(&mut self, id: NodeId) -> Result<()> {
        let node = &self.tree[id];
        let value = node.value.as_str();

        if node.tag == Tag::Null && value.is_empty() {
            self.out.push_str("null");
            return Ok(());
        }

        match node.style {
            Style::DoubleQuoted => write_double_quoted(&mut self.out, value),
            Style::SingleQuoted if can_single_quote(value) => {
                self.out.push('\'');
                self.out.push_str(&value.replace('\'', "''"));
                self.out.push('\'');
                Ok(())
            }
            _ if can_be_plain(&node.tag, value) => {
                self.out.push_str(value);
                Ok(())
            }
            _ => write_double_quoted(&mut self.out, value),
        }
    }

    fn pad(&mut self, col: usize) {
        self.out.extend(std::iter::repeat_n(' ', col));
    }
}

/// Whether `value` written plain reads back as `tag` with the same text.
fn can_be_plain(tag: &Tag, value: &str) -> bool {
    match tag {
        Tag::Str => !has_plain_hazard(value) && !is_ambiguous(value),
        tag if resolve_plain(value) == *tag => true,
        _ => !has_plain_hazard(value),
    }
}

/// Text that a plain scalar cannot carry unchanged.
fn has_plain_hazard(value: &str) -> bool {
    value.is_empty()
        || value.starts_with([' ', '\t'])
        || value.ends_with([' ', '\t', ':'])
        || value.starts_with([
            '&', '*', '?', '|', '-', '<', '>', '=', '!', '%', '@', '`', '#', ',', '[', ']', '{',
            '}', '"', '\'', ':',
        ])
        || value.contains(": ")
        || value.contains(" #")
        || value.contains(['{', '}', '[', ']', ','])
        || value.chars().any(needs_escape)
}

/// Strings that some YAML reader would resolve to a non-string value.
fn is_ambiguous(value: &str) -> bool {
    resolve_plain(value) != Tag::Str
        || matches!(
            value,
            "yes" | "Yes" | "YES" | "no" | "No" | "NO" | "on" | "On" | "ON" | "off" | "Off" | "OFF"
        )
        || value.starts_with('.')
        || value.starts_with("0x")
        || looks_like_timestamp(value)
        || value.parse::<f64>().is_ok()
}

fn can_single_quote(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(|c| c == '\t' || needs_escape(c))
}

/// Characters that can only appear escaped in a double-quoted scalar.
fn needs_escape(c: char) -> bool {
    matches!(c, '\0'..='\x1f' | '\x7f' | '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn write_double_quoted(out: &mut String, value: &str) -> Result<()> {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if needs_escape(c) => write!(out, "\\u{:04x}", c as u32)?,
            c => out.push(c),
        }
    }
    out.push('"');
    Ok(())
}

/// Render a literal or folded block scalar, header included, with content
/// lines at column `col`. `None` when the block cannot reproduce `value`.
fn block_scalar(value: &str, style: Style, col: usize) -> Option<String> {
    let body = value.trim_end_matches('\n');
    let trailing = value.len() - body.len();
    if body.is_empty() || value.chars().any(|c| c != '\t' && needs_escape(c) && c != '\n') {
        return None;
    }
    // Leading indentation would need an explicit indentation indicator.
    let first = body.split('\n').find(|line| !line.is_empty())?;
    if first.starts_with([' ', '\t']) {
        return None;
    }

    let lines: Vec<&str> = body.split('\n').collect();
    let folded = style == Style::Folded
        && !value.starts_with('\n')
        && !lines.iter().any(|line| line.starts_with([' ', '\t']));

    let mut out = String::from(if folded { ">" } else { "|" });
    out.push_str(match trailing {
        0 => "-",
        1 => "",
        _ => "+",
    });
    out.push('\n');

    for (index, line) in lines.iter().enumerate() {
        if folded && index > 0 && !line.is_empty() {
            out.push('\n');
        }
        if !line.is_empty() {
            out.extend(std::iter::repeat_n(' ', col));
            out.push_str(line);
        }
        out.push('\n');
    }
    for _ in 1..trailing {
        out.push('\n');
    }
    Some(out)
}
