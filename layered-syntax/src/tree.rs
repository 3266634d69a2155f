//! Read-only constituency trees.
//!
//! A [`SynTree`] stores its nodes in preorder; [`SynId`] indexes into that
//! storage. Terminals are leaf nodes whose tag is the word itself, so a
//! preterminal is a node with exactly one terminal child.

use crate::errors::{SyntaxError, SyntaxResult};
use crate::head_rules;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node within its [`SynTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SynId(pub usize);

impl fmt::Display for SynId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// One constituent (or terminal word) of a parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynNode {
    tag: String,
    parent: Option<SynId>,
    children: Vec<SynId>,
    head: Option<SynId>,
    /// Inclusive sentence-relative token span.
    start_token: usize,
    end_token: usize,
    has_mention: bool,
}

impl SynNode {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn parent(&self) -> Option<SynId> {
        self.parent
    }

    pub fn children(&self) -> &[SynId] {
        &self.children
    }

    /// The head child, `None` for terminals.
    pub fn head(&self) -> Option<SynId> {
        self.head
    }

    pub fn start_token(&self) -> usize {
        self.start_token
    }

    pub fn end_token(&self) -> usize {
        self.end_token
    }

    pub fn has_mention(&self) -> bool {
        self.has_mention
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

/// Unlinked tree shape produced by the reader before ids are assigned.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawNode {
    pub tag: String,
    pub children: Vec<RawNode>,
    /// A word rather than a constituent that happens to be empty.
    pub leaf: bool,
}

impl RawNode {
    pub fn leaf(word: impl Into<String>) -> Self {
        Self {
            tag: word.into(),
            children: Vec::new(),
            leaf: true,
        }
    }

    pub fn branch(tag: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self {
            tag: tag.into(),
            children,
            leaf: false,
        }
    }
}

/// A parsed sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynTree {
    nodes: Vec<SynNode>,
    /// Terminal node for each token index.
    terminals: Vec<SynId>,
}

impl SynTree {
    pub(crate) fn from_raw(raw: RawNode) -> Self {
        let mut tree = SynTree {
            nodes: Vec::new(),
            terminals: Vec::new(),
        };
        tree.insert_raw(raw, None);
        tree
    }

    fn insert_raw(&mut self, raw: RawNode, parent: Option<SynId>) -> SynId {
        let id = SynId(self.nodes.len());
        let start_token = self.terminals.len();
        self.nodes.push(SynNode {
            tag: raw.tag,
            parent,
            children: Vec::new(),
            head: None,
            start_token,
            end_token: start_token,
            has_mention: false,
        });

        if raw.leaf {
            self.terminals.push(id);
            return id;
        }
        if raw.children.is_empty() {
            return id;
        }

        let mut children = Vec::with_capacity(raw.children.len());
        for child in raw.children {
            children.push(self.insert_raw(child, Some(id)));
        }

        let child_tags: Vec<&str> = children.iter().map(|c| self.nodes[c.0].tag.as_str()).collect();
        let head_idx = head_rules::head_child_index(&self.nodes[id.0].tag, &child_tags);
        let head = children[head_idx];
        let end_token = self.terminals.len() - 1;

        let node = &mut self.nodes[id.0];
        node.children = children;
        node.head = Some(head);
        node.end_token = end_token;
        id
    }

    /// Fallback parse used when the parser produced nothing usable: a flat
    /// `FRAG` of preterminals under `TOP`.
    ///
    /// Each entry is `(word, part-of-speech)`.
    pub fn default_parse(tokens: &[(&str, &str)]) -> Self {
        let preterminals = tokens
            .iter()
            .map(|(word, pos)| RawNode::branch(*pos, vec![RawNode::leaf(*word)]))
            .collect();
        let frag = RawNode::branch(crate::tags::FRAG, preterminals);
        SynTree::from_raw(RawNode::branch(crate::tags::TOP, vec![frag]))
    }

    pub fn root(&self) -> SynId {
        SynId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: SynId) -> &SynNode {
        &self.nodes[id.0]
    }

    pub fn try_node(&self, id: SynId) -> SyntaxResult<&SynNode> {
        self.nodes.get(id.0).ok_or(SyntaxError::UnknownNode(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = SynId> {
        (0..self.nodes.len()).map(SynId)
    }

    pub fn tag(&self, id: SynId) -> &str {
        &self.nodes[id.0].tag
    }

    pub fn parent(&self, id: SynId) -> Option<SynId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: SynId) -> &[SynId] {
        &self.nodes[id.0].children
    }

    pub fn n_children(&self, id: SynId) -> usize {
        self.nodes[id.0].children.len()
    }

    pub fn child(&self, id: SynId, index: usize) -> Option<SynId> {
        self.nodes[id.0].children.get(index).copied()
    }

    pub fn head(&self, id: SynId) -> Option<SynId> {
        self.nodes[id.0].head
    }

    /// A word. An empty constituent is neither a terminal nor a preterminal.
    pub fn is_terminal(&self, id: SynId) -> bool {
        let node = &self.nodes[id.0];
        node.children.is_empty() && self.terminal(node.start_token) == Some(id)
    }

    pub fn is_preterminal(&self, id: SynId) -> bool {
        let children = &self.nodes[id.0].children;
        children.len() == 1 && self.is_terminal(children[0])
    }

    pub fn has_mention(&self, id: SynId) -> bool {
        self.nodes[id.0].has_mention
    }

    pub(crate) fn mark_mention(&mut self, id: SynId) {
        self.nodes[id.0].has_mention = true;
    }

    pub fn start_token(&self, id: SynId) -> usize {
        self.nodes[id.0].start_token
    }

    pub fn end_token(&self, id: SynId) -> usize {
        self.nodes[id.0].end_token
    }

    pub fn n_tokens(&self) -> usize {
        self.terminals.len()
    }

    /// Terminal node at a token index.
    pub fn terminal(&self, token: usize) -> Option<SynId> {
        self.terminals.get(token).copied()
    }

    /// The word of a token.
    pub fn word(&self, token: usize) -> Option<&str> {
        self.terminal(token).map(|id| self.tag(id))
    }

    /// Terminal immediately before this node's span.
    pub fn prev_terminal(&self, id: SynId) -> Option<SynId> {
        let start = self.start_token(id);
        if start == 0 {
            return None;
        }
        self.terminal(start - 1)
    }

    /// Follows head children down to the preterminal (or terminal) heading `id`.
    pub fn head_preterminal(&self, id: SynId) -> SynId {
        let mut current = id;
        while !self.is_preterminal(current) && !self.is_terminal(current) {
            match self.head(current) {
                Some(head) => current = head,
                None => break,
            }
        }
        current
    }

    /// The head word of a constituent; a terminal is its own head word.
    pub fn head_word(&self, id: SynId) -> &str {
        let pre = self.head_preterminal(id);
        if self.is_terminal(pre) {
            return self.tag(pre);
        }
        self.children(pre).first().map_or("", |&word| self.tag(word))
    }

    /// Token index of the head word.
    pub fn head_token(&self, id: SynId) -> usize {
        self.start_token(self.head_preterminal(id))
    }

    /// Words covered by the node, space separated.
    pub fn text(&self, id: SynId) -> String {
        if self.children(id).is_empty() && !self.is_terminal(id) {
            return String::new();
        }
        (self.start_token(id)..=self.end_token(id))
            .filter_map(|t| self.word(t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First node in preorder with the given tag and covered text.
    pub fn find(&self, tag: &str, text: &str) -> Option<SynId> {
        self.ids()
            .find(|&id| !self.is_terminal(id) && self.tag(id) == tag && self.text(id) == text)
    }

    /// Walks from `id` up through its ancestors (excluding `id`).
    pub fn ancestors(&self, id: SynId) -> impl Iterator<Item = SynId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Renders the tree back to bracketed form.
    pub fn to_bracketed(&self, id: SynId) -> String {
        if self.is_terminal(id) {
            return self.tag(id).to_string();
        }
        if self.children(id).is_empty() {
            return format!("({})", self.tag(id));
        }
        let inner: Vec<String> = self.children(id).iter().map(|&c| self.to_bracketed(c)).collect();
        format!("({} {})", self.tag(id), inner.join(" "))
    }
}
