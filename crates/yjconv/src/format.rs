//! JSON to YAML conversion: styling pass plus the public entry points.
//!
//! JSON text is a subset of YAML, so the input is read by the YAML parser.
//! The resulting tree carries flow collections and quoted strings; `format`
//! rewrites those styles into idiomatic block YAML before emitting.

use crate::emitter::{DEFAULT_INDENT, emit};
use crate::parser::parse_bytes;
use crate::resolve::resolve_plain;
use crate::{Error, NodeId, NodeKind, Result, Style, Tag, Tree};

/// Options for the JSON→YAML direction.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl FormatOptions {
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Convert JSON text to block-style YAML.
///
/// # Example
///
/// ```rust
/// let yaml = yjconv::json_to_yaml(br#"{"a":["b","c"]}"#, 2).unwrap();
/// assert_eq!(yaml, b"a:\n  - b\n  - c\n");
/// ```
pub fn json_to_yaml(json: &[u8], indent: usize) -> Result<Vec<u8>> {
    json_to_yaml_with(json, &FormatOptions::default().with_indent(indent))
}

/// [`json_to_yaml`] with explicit options.
pub fn json_to_yaml_with(json: &[u8], options: &FormatOptions) -> Result<Vec<u8>> {
    let yaml = render_yaml(json, options).map_err(|e| e.context("json_to_yaml"))?;
    tracing::debug!(input = json.len(), output = yaml.len(), "converted JSON to YAML");
    Ok(yaml.into_bytes())
}

pub(crate) fn render_yaml(json: &[u8], options: &FormatOptions) -> Result<String> {
    let mut tree = parse_bytes(json)?;
    format(&mut tree)?;
    emit(&tree, options.indent)
}

/// Assign presentation styles to every node of `tree`.
///
/// Collections become block style. Scalars become plain, except strings that
/// would read back as another type (those stay quoted) and multi-line text
/// (literal, or folded if it already was). Only `style` fields change.
pub fn format(tree: &mut Tree) -> Result<()> {
    let Some(root) = tree.root() else {
        return Ok(());
    };

    let mut pending = vec![root];
    while let Some(id) = pending.pop() {
        style_node(tree, id)?;
        // Reversed so children are styled in document order.
        pending.extend(tree[id].children.iter().rev().copied());
    }
    Ok(())
}

fn style_node(tree: &mut Tree, id: NodeId) -> Result<()> {
    let node = &mut tree[id];
    node.style = match node.kind {
        NodeKind::Document => Style::Any,
        NodeKind::Sequence | NodeKind::Mapping => Style::Block,
        NodeKind::Scalar => scalar_style(&node.tag, &node.value, node.style),
        NodeKind::Alias => return Err(Error::unimplemented("alias", Some(node.source_info))),
    };
    Ok(())
}

fn scalar_style(tag: &Tag, value: &str, current: Style) -> Style {
    if value.contains('\n') {
        return match current {
            Style::Folded => Style::Folded,
            _ => Style::Literal,
        };
    }
    if *tag == Tag::Str && resolve_plain(value) != Tag::Str {
        return match current {
            Style::SingleQuoted => Style::SingleQuoted,
            _ => Style::DoubleQuoted,
        };
    }
    Style::Plain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, parse};
    use pretty_assertions::assert_eq;

    fn styles(yaml: &str) -> Vec<Style> {
        let mut tree = parse(yaml).unwrap();
        format(&mut tree).unwrap();
        let document = tree.root().unwrap();
        let collection = tree[document].children[0];
        tree[collection]
            .children
            .iter()
            .map(|&id| tree[id].style)
            .collect()
    }

    #[test]
    fn test_ambiguous_strings_keep_quotes() {
        assert_eq!(
            styles(r#"["1", 'true', "x", "", "2001-12-15", 1, true]"#),
            vec![
                Style::DoubleQuoted,
                Style::SingleQuoted,
                Style::Plain,
                Style::DoubleQuoted,
                Style::DoubleQuoted,
                Style::Plain,
                Style::Plain,
            ]
        );
    }

    #[test]
    fn test_multiline_strings_become_blocks() {
        let yaml = "- \"a\\nb\"\n- >\n  a\n\n  b\n";
        assert_eq!(styles(yaml), vec![Style::Literal, Style::Folded]);
    }

    #[test]
    fn test_collections_become_block() {
        let mut tree = parse(r#"{"a": [1, {"b": 2}]}"#).unwrap();
        format(&mut tree).unwrap();
        let document = tree.root().unwrap();
        let mapping = tree[document].children[0];
        let seq = tree[mapping].children[1];
        assert_eq!(tree[mapping].style, Style::Block);
        assert_eq!(tree[seq].style, Style::Block);
        assert_eq!(tree[tree[seq].children[1]].style, Style::Block);
    }

    #[test]
    fn test_format_leaves_values_alone() {
        let mut tree = parse(r#"{"k": "2001-12-15", "n": 3.5}"#).unwrap();
        let before: Vec<String> = tree.nodes().map(|node| node.value.clone()).collect();
        format(&mut tree).unwrap();
        let after: Vec<String> = tree.nodes().map(|node| node.value.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_alias_is_unimplemented() {
        let mut tree = parse("a: &x 1\nb: *x\n").unwrap();
        let err = format(&mut tree).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented);
    }

    #[test]
    fn test_indent_option() {
        let options = FormatOptions::default().with_indent(4);
        let yaml = render_yaml(br#"{"a":{"b":[1]}}"#, &options).unwrap();
        assert_eq!(yaml, "a:\n    b:\n        - 1\n");
    }
}
