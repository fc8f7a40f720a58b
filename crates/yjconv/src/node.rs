//! Arena-backed node tree shared by both conversion directions.
//!
//! A [`Tree`] owns every [`Node`] of one document. Parents refer to their
//! children by [`NodeId`], and alias nodes refer to their anchored node by
//! [`AnchorId`] through the tree's anchor table, so a document never holds
//! cyclic ownership even when an alias points back into an ancestor.

use crate::{Error, Result, SourceInfo};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Longest chain of merge keys `Tree::mapping_entries` will follow.
pub const MAX_MERGE_DEPTH: usize = 256;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identifier of an anchor (`&name`) as assigned by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Sequence,
    Mapping,
    Scalar,
    Alias,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Document => "document",
            NodeKind::Sequence => "sequence",
            NodeKind::Mapping => "mapping",
            NodeKind::Scalar => "scalar",
            NodeKind::Alias => "alias",
        };
        f.write_str(name)
    }
}

/// Semantic type of a node.
///
/// The core YAML tags are closed variants; anything else (custom tags,
/// unknown `tag:yaml.org,2002:` suffixes) is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// Document and alias nodes carry no tag of their own.
    Untagged,
    Null,
    Bool,
    Str,
    Int,
    Float,
    Timestamp,
    Binary,
    Seq,
    Map,
    Merge,
    Other(String),
}

impl Tag {
    /// Prefix that the `!!` handle expands to.
    pub const CORE_PREFIX: &'static str = "tag:yaml.org,2002:";

    /// Map the suffix of a `!!suffix` tag to its variant.
    pub fn from_core_suffix(suffix: &str) -> Tag {
        match suffix {
            "null" => Tag::Null,
            "bool" => Tag::Bool,
            "str" => Tag::Str,
            "int" => Tag::Int,
            "float" => Tag::Float,
            "timestamp" => Tag::Timestamp,
            "binary" => Tag::Binary,
            "seq" => Tag::Seq,
            "map" => Tag::Map,
            "merge" => Tag::Merge,
            other => Tag::Other(format!("{}{}", Tag::CORE_PREFIX, other)),
        }
    }

    /// Tags whose scalars are re-read as strings when used as mapping keys.
    pub fn is_key_coercible(&self) -> bool {
        matches!(self, Tag::Bool | Tag::Int | Tag::Float | Tag::Timestamp)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = match self {
            Tag::Untagged => return f.write_str("untagged"),
            Tag::Other(tag) => return f.write_str(tag),
            Tag::Null => "null",
            Tag::Bool => "bool",
            Tag::Str => "str",
            Tag::Int => "int",
            Tag::Float => "float",
            Tag::Timestamp => "timestamp",
            Tag::Binary => "binary",
            Tag::Seq => "seq",
            Tag::Map => "map",
            Tag::Merge => "merge",
        };
        write!(f, "!!{}", core)
    }
}

/// Presentation hint. Never affects the resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// No preference; the emitter picks.
    #[default]
    Any,
    /// Indented multi-line collection.
    Block,
    /// Inline `[..]` / `{..}` collection.
    Flow,
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|` block scalar.
    Literal,
    /// `>` block scalar.
    Folded,
}

impl Style {
    pub fn is_quoted(self) -> bool {
        matches!(self, Style::SingleQuoted | Style::DoubleQuoted)
    }

    pub fn is_block_scalar(self) -> bool {
        matches!(self, Style::Literal | Style::Folded)
    }
}

/// One element of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub tag: Tag,
    /// Literal text of a scalar; empty for every other kind.
    pub value: String,
    /// Children in document order. Mappings store keys and values
    /// alternately: `[k0, v0, k1, v1, ..]`.
    pub children: Vec<NodeId>,
    /// The anchor defined on this node, or for an alias node the anchor it
    /// refers to.
    pub anchor: Option<AnchorId>,
    pub style: Style,
    pub source_info: SourceInfo,
}

impl Node {
    pub fn new(kind: NodeKind, tag: Tag) -> Self {
        Self {
            kind,
            tag,
            value: String::new(),
            children: Vec::new(),
            anchor: None,
            style: Style::Any,
            source_info: SourceInfo::default(),
        }
    }

    pub fn scalar(value: impl Into<String>, tag: Tag, style: Style) -> Self {
        Self {
            value: value.into(),
            style,
            ..Node::new(NodeKind::Scalar, tag)
        }
    }

    pub fn alias(anchor: AnchorId) -> Self {
        Self {
            anchor: Some(anchor),
            ..Node::new(NodeKind::Alias, Tag::Untagged)
        }
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_source_info(mut self, source_info: SourceInfo) -> Self {
        self.source_info = source_info;
        self
    }
}

/// All nodes of a single document plus its anchor table.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    anchors: HashMap<AnchorId, NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document whose only child is `value`.
    pub fn with_document(value: Node) -> Self {
        let mut tree = Tree::new();
        let document = tree.push(Node::new(NodeKind::Document, Tag::Untagged));
        let child = tree.push(value);
        tree.add_child(document, child);
        tree.set_root(document);
        tree
    }

    /// Add a node to the arena. A node carrying an anchor (other than an
    /// alias) becomes the target of that anchor, replacing any earlier one.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let (Some(anchor), false) = (node.anchor, node.kind == NodeKind::Alias) {
            if let Some(previous) = self.anchors.insert(anchor, id) {
                tracing::trace!(anchor = anchor.0, previous = previous.index(), "anchor redefined");
            }
            tracing::trace!(anchor = anchor.0, node = id.index(), "registered anchor");
        }
        self.nodes.push(node);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self[parent].children.push(child);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn has_anchor(&self, anchor: AnchorId) -> bool {
        self.anchors.contains_key(&anchor)
    }

    /// The node an alias refers to.
    pub fn alias_target(&self, alias: NodeId) -> Option<NodeId> {
        let node = &self[alias];
        if node.kind != NodeKind::Alias {
            return None;
        }
        node.anchor.and_then(|anchor| self.anchors.get(&anchor).copied())
    }

    /// Key/value pairs of a mapping with merge keys expanded.
    ///
    /// When the first key is tagged `!!merge`, the pairs of the mapping its
    /// alias refers to come first (expanded the same way), followed by the
    /// mapping's own remaining pairs. Duplicate keys are returned as they
    /// appear; deciding which one wins is up to the caller.
    ///
    /// A merge chain longer than [`MAX_MERGE_DEPTH`] or one that loops back
    /// on itself is a conversion failure.
    pub fn mapping_entries(&self, mapping: NodeId) -> Result<Vec<(NodeId, NodeId)>> {
        let chain = self.merge_chain(mapping)?;

        // Deepest merge source first, the mapping itself last.
        let mut entries = Vec::new();
        for &id in chain.iter().rev() {
            let pairs = self[id].children.chunks_exact(2);
            entries.extend(
                pairs
                    .filter(|pair| self[pair[0]].tag != Tag::Merge)
                    .map(|pair| (pair[0], pair[1])),
            );
        }
        Ok(entries)
    }

    /// `mapping` followed by each mapping its merge key pulls in, in order.
    fn merge_chain(&self, mapping: NodeId) -> Result<Vec<NodeId>> {
        let mut chain = vec![mapping];
        let mut seen = HashSet::from([mapping]);
        let mut current = mapping;

        while let Some(target) = self.merge_source(current)? {
            if !seen.insert(target) {
                return Err(Error::conversion(
                    "merge key refers to a mapping that is already being merged",
                    Some(self[current].source_info),
                ));
            }
            if chain.len() > MAX_MERGE_DEPTH {
                return Err(Error::conversion(
                    format!("merge keys nested deeper than {} levels", MAX_MERGE_DEPTH),
                    Some(self[current].source_info),
                ));
            }
            tracing::trace!(
                mapping = current.index(),
                target = target.index(),
                "expanding merge key"
            );
            chain.push(target);
            current = target;
        }
        Ok(chain)
    }

    /// Check the shape of a mapping and return the mapping its leading merge
    /// key refers to, if it has one.
    fn merge_source(&self, mapping: NodeId) -> Result<Option<NodeId>> {
        let node = &self[mapping];
        if node.kind != NodeKind::Mapping {
            return Err(Error::conversion(
                format!("expected a mapping node, found {}", node.kind),
                Some(node.source_info),
            ));
        }
        if node.children.len() % 2 != 0 {
            return Err(Error::conversion(
                format!(
                    "mapping node has an odd number of children ({})",
                    node.children.len()
                ),
                Some(node.source_info),
            ));
        }

        let mut source = None;
        for (index, pair) in node.children.chunks_exact(2).enumerate() {
            if self[pair[0]].tag != Tag::Merge {
                continue;
            }
            if index != 0 {
                return Err(Error::conversion(
                    "merge key `<<` must be the first key of its mapping",
                    Some(self[pair[0]].source_info),
                ));
            }
            source = Some(self.merge_target(pair[1])?);
        }
        Ok(source)
    }

    fn merge_target(&self, value: NodeId) -> Result<NodeId> {
        let node = &self[value];
        if node.kind != NodeKind::Alias {
            return Err(Error::conversion(
                format!("merge key value must be an alias, found {}", node.kind),
                Some(node.source_info),
            ));
        }
        let target = self.alias_target(value).ok_or_else(|| {
            Error::conversion("alias refers to an undefined anchor", Some(node.source_info))
        })?;
        if self[target].kind != NodeKind::Mapping {
            return Err(Error::conversion(
                format!(
                    "merge key alias must refer to a mapping, found {}",
                    self[target].kind
                ),
                Some(node.source_info),
            ));
        }
        Ok(target)
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}
