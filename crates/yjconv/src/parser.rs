//! YAML parser that builds [`Tree`]s.

use crate::resolve::{resolve_explicit, resolve_plain};
use crate::{AnchorId, Error, Node, NodeId, NodeKind, Result, SourceInfo, Stage, Style, Tag, Tree};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse YAML from a string, producing a node [`Tree`].
///
/// This parses a single YAML document. If the input contains multiple
/// documents, only the first one is parsed. Input without any document
/// (empty or comment-only) yields a document holding a single null scalar.
///
/// # Example
///
/// ```rust
/// use yjconv::{parse, NodeKind};
///
/// let tree = parse("title: My Document").unwrap();
/// let document = tree.root().unwrap();
/// let mapping = tree[document].children[0];
/// assert_eq!(tree[mapping].kind, NodeKind::Mapping);
/// ```
///
/// # Errors
///
/// Returns a codec error if the text is not well-formed YAML.
pub fn parse(content: &str) -> Result<Tree> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new();

    parser
        .load(&mut builder, false) // false = single document only
        .map_err(Error::from)?;

    builder.result()
}

/// Parse YAML from raw bytes, which must be UTF-8.
pub fn parse_bytes(content: &[u8]) -> Result<Tree> {
    let text = std::str::from_utf8(content).map_err(|e| Error::codec(Stage::ParseYaml, e))?;
    parse(text)
}

/// Builder that implements MarkedEventReceiver to construct a [`Tree`].
struct TreeBuilder {
    tree: Tree,

    /// Open documents, sequences and mappings, innermost last.
    stack: Vec<NodeId>,

    /// First structural problem seen. The parser keeps delivering events
    /// after it, so later events are ignored.
    error: Option<Error>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            tree: Tree::new(),
            stack: Vec::new(),
            error: None,
        }
    }

    fn result(mut self) -> Result<Tree> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.tree.root().is_none() {
            tracing::trace!("no YAML document found, using a null document");
            self.tree = Tree::with_document(Node::scalar("", Tag::Null, Style::Plain));
        }
        Ok(self.tree)
    }

    fn add(&mut self, node: Node) -> NodeId {
        let id = self.tree.push(node);
        match self.stack.last() {
            Some(&parent) => self.tree.add_child(parent, id),
            None => self.tree.set_root(id),
        }
        id
    }

    fn close(&mut self, kind: NodeKind) {
        match self.stack.pop() {
            Some(id) if self.tree[id].kind == kind => {}
            _ => {
                self.error = Some(Error::conversion(
                    format!("unbalanced {} end event", kind),
                    None,
                ));
            }
        }
    }

    fn handle(&mut self, ev: Event, marker: Marker) {
        let source_info = SourceInfo::from_marker(&marker);
        match ev {
            Event::Nothing | Event::StreamStart | Event::StreamEnd => {}

            Event::DocumentStart => {
                let node = Node::new(NodeKind::Document, Tag::Untagged).with_source_info(source_info);
                let id = self.add(node);
                self.stack.push(id);
            }
            Event::DocumentEnd => self.close(NodeKind::Document),

            Event::Scalar(value, style, anchor_id, tag) => {
                let style = scalar_style(style);
                let tag = match &tag {
                    Some(tag) => resolve_explicit(tag),
                    None if style == Style::Plain => resolve_plain(&value),
                    None => Tag::Str,
                };
                let node = Node::scalar(value, tag, style)
                    .with_anchor(anchor(anchor_id))
                    .with_source_info(source_info);
                self.add(node);
            }

            Event::SequenceStart(anchor_id, tag) => {
                let tag = tag.as_ref().map_or(Tag::Seq, resolve_explicit);
                let node = Node::new(NodeKind::Sequence, tag)
                    .with_anchor(anchor(anchor_id))
                    .with_source_info(source_info);
                let id = self.add(node);
                self.stack.push(id);
            }
            Event::SequenceEnd => self.close(NodeKind::Sequence),

            Event::MappingStart(anchor_id, tag) => {
                let tag = tag.as_ref().map_or(Tag::Map, resolve_explicit);
                let node = Node::new(NodeKind::Mapping, tag)
                    .with_anchor(anchor(anchor_id))
                    .with_source_info(source_info);
                let id = self.add(node);
                self.stack.push(id);
            }
            Event::MappingEnd => self.close(NodeKind::Mapping),

            Event::Alias(anchor_id) => {
                let target = AnchorId(anchor_id);
                if !self.tree.has_anchor(target) {
                    self.error = Some(Error::conversion(
                        "alias refers to an undefined anchor",
                        Some(source_info),
                    ));
                    return;
                }
                self.add(Node::alias(target).with_source_info(source_info));
            }
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        self.handle(ev, marker);
    }
}

/// yaml-rust2 reports anchor id 0 for nodes without an anchor.
fn anchor(anchor_id: usize) -> Option<AnchorId> {
    (anchor_id != 0).then_some(AnchorId(anchor_id))
}

fn scalar_style(style: TScalarStyle) -> Style {
    match style {
        TScalarStyle::SingleQuoted => Style::SingleQuoted,
        TScalarStyle::DoubleQuoted => Style::DoubleQuoted,
        TScalarStyle::Literal => Style::Literal,
        TScalarStyle::Folded => Style::Folded,
        _ => Style::Plain,
    }
}
