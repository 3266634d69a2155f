//! The semantic tree: an arena of [`SemNode`]s rewritten in five phases.
//!
//! A sentence's tree is built by a [`SemTreeBuilder`], then rewritten in
//! place by [`SemArena::simplify`], [`SemArena::fix_links`],
//! [`SemArena::regularize`], [`SemArena::create_traces`] and
//! [`SemArena::create_propositions`], and finally flattened by
//! [`SemArena::list_propositions`].
//!
//! Nodes are referenced by [`NodeId`]. Child lists are plain vectors and
//! every splice keeps the parent links in step, so a node is always listed by
//! exactly one parent. Phase code walks a snapshot of a child list and writes
//! a new list back rather than editing the list it is iterating.

mod branch;
mod display;
mod link;
mod mention;
mod opp;
mod trace;
mod verify;

pub use branch::Branch;
pub use display::SemTreeDisplay;
pub use link::Link;
pub use mention::MentionNode;
pub use opp::{Opp, Satellites};
pub use trace::Trace;

use crate::builder::SemTreeBuilder;
use crate::config::PropositionConfig;
use crate::errors::{SemTreeError, SemTreeResult};
use crate::proposition::PredType;
use layered_syntax::{MentionIndex, MentionSet, SynId, SynTree};
use std::fmt;

/// Handle to a node of one sentence's tree.
///
/// The generation ties the id to the arena contents it was allocated in;
/// once the arena is reset the id no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.index)
    }
}

/// Discriminant of [`NodeKind`], for dispatching without holding a borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemNodeType {
    Branch,
    Opp,
    Link,
    Mention,
    Trace,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Branch(Branch),
    Opp(Opp),
    Link(Link),
    Mention(MentionNode),
    Trace(Trace),
}

impl NodeKind {
    pub fn node_type(&self) -> SemNodeType {
        match self {
            NodeKind::Branch(_) => SemNodeType::Branch,
            NodeKind::Opp(_) => SemNodeType::Opp,
            NodeKind::Link(_) => SemNodeType::Link,
            NodeKind::Mention(_) => SemNodeType::Mention,
            NodeKind::Trace(_) => SemNodeType::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Originating syntax node.
    syn: Option<SynId>,
    /// Cleared once some ancestor's `regularize` claims this node.
    tangential: bool,
    kind: NodeKind,
}

impl SemNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn syn(&self) -> Option<SynId> {
        self.syn
    }

    pub fn is_tangential(&self) -> bool {
        self.tangential
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> SemNodeType {
        self.kind.node_type()
    }

    /// Mentions and traces can fill an argument slot as an entity.
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, NodeKind::Mention(_) | NodeKind::Trace(_))
    }
}

/// Read-only inputs shared by every phase of one sentence.
#[derive(Clone, Copy)]
pub struct Sentence<'a> {
    pub tree: &'a SynTree,
    pub mentions: &'a MentionSet,
    pub config: &'a PropositionConfig,
}

/// What a phase needs besides the arena: the sentence and the language
/// strategy answering its linguistic questions.
#[derive(Clone, Copy)]
pub struct PhaseContext<'a> {
    pub sentence: Sentence<'a>,
    pub builder: &'a dyn SemTreeBuilder,
}

impl<'a> PhaseContext<'a> {
    pub fn tree(&self) -> &'a SynTree {
        self.sentence.tree
    }

    pub fn config(&self) -> &'a PropositionConfig {
        self.sentence.config
    }
}

/// Node storage for one sentence.
#[derive(Debug, Default)]
pub struct SemArena {
    nodes: Vec<SemNode>,
    generation: u32,
}

impl SemArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every node. Ids handed out before the reset become stale.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a tangential node and adopts `children`, detaching them from
    /// any previous parent.
    pub fn alloc(&mut self, kind: NodeKind, syn: Option<SynId>, children: Vec<NodeId>) -> NodeId {
        let id = NodeId {
            index: self.nodes.len(),
            generation: self.generation,
        };
        self.nodes.push(SemNode {
            parent: None,
            children: Vec::new(),
            syn,
            tangential: true,
            kind,
        });
        self.set_children(id, children);
        id
    }

    fn is_live(&self, id: NodeId) -> bool {
        id.generation == self.generation && id.index < self.nodes.len()
    }

    pub fn try_node(&self, id: NodeId) -> SemTreeResult<&SemNode> {
        if self.is_live(id) {
            Ok(&self.nodes[id.index])
        } else {
            Err(SemTreeError::StaleNode(id))
        }
    }

    /// # Panics
    ///
    /// On an id from an earlier sentence.
    pub fn node(&self, id: NodeId) -> &SemNode {
        assert!(self.is_live(id), "stale sem node {:?}", id);
        &self.nodes[id.index]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut SemNode {
        assert!(self.is_live(id), "stale sem node {:?}", id);
        &mut self.nodes[id.index]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn syn(&self, id: NodeId) -> Option<SynId> {
        self.node(id).syn
    }

    pub fn set_syn(&mut self, id: NodeId, syn: Option<SynId>) {
        self.node_mut(id).syn = syn;
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn node_type(&self, id: NodeId) -> SemNodeType {
        self.node(id).node_type()
    }

    pub fn is_reference(&self, id: NodeId) -> bool {
        self.node(id).is_reference()
    }

    pub fn is_tangential(&self, id: NodeId) -> bool {
        self.node(id).tangential
    }

    /// Marks a node as load-bearing. Never undone.
    pub fn claim(&mut self, id: NodeId) {
        self.node_mut(id).tangential = false;
    }

    pub fn as_branch(&self, id: NodeId) -> Option<&Branch> {
        match &self.node(id).kind {
            NodeKind::Branch(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_branch_mut(&mut self, id: NodeId) -> Option<&mut Branch> {
        match &mut self.node_mut(id).kind {
            NodeKind::Branch(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_opp(&self, id: NodeId) -> Option<&Opp> {
        match &self.node(id).kind {
            NodeKind::Opp(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_opp_mut(&mut self, id: NodeId) -> Option<&mut Opp> {
        match &mut self.node_mut(id).kind {
            NodeKind::Opp(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_link(&self, id: NodeId) -> Option<&Link> {
        match &self.node(id).kind {
            NodeKind::Link(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_link_mut(&mut self, id: NodeId) -> Option<&mut Link> {
        match &mut self.node_mut(id).kind {
            NodeKind::Link(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_mention(&self, id: NodeId) -> Option<&MentionNode> {
        match &self.node(id).kind {
            NodeKind::Mention(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mention_mut(&mut self, id: NodeId) -> Option<&mut MentionNode> {
        match &mut self.node_mut(id).kind {
            NodeKind::Mention(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_trace(&self, id: NodeId) -> Option<&Trace> {
        match &self.node(id).kind {
            NodeKind::Trace(t) => Some(t),
            _ => None,
        }
    }

    /// Predicate type of an OPP node.
    pub fn pred_type(&self, id: NodeId) -> Option<PredType> {
        self.as_opp(id).map(|o| o.pred_type)
    }

    /// The sole child, if there is exactly one.
    pub fn only_child(&self, id: NodeId) -> Option<NodeId> {
        match self.children(id) {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn position_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let pos = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, pos))
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Replaces the child list of `parent`. Former children left out of the
    /// new list become orphans.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for &child in &children {
            if self.node(child).parent != Some(parent) {
                self.detach(child);
            }
        }
        let old = std::mem::take(&mut self.node_mut(parent).children);
        for child in old {
            if !children.contains(&child) {
                self.node_mut(child).parent = None;
            }
        }
        for &child in &children {
            self.node_mut(child).parent = Some(parent);
        }
        self.node_mut(parent).children = children;
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, 0, child);
    }

    /// Inserts at `index` (clamped to the list length) after detaching.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let list = &mut self.node_mut(parent).children;
        let at = index.min(list.len());
        list.insert(at, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Removes `id` from its parent, leaving it (and its subtree) orphaned.
    pub fn prune_out(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Splices `id` out, its children taking its place in the parent's list.
    /// A root has nowhere to splice into and is left alone.
    pub fn replace_with_children(&mut self, id: NodeId) -> bool {
        let Some((parent, pos)) = self.position_in_parent(id) else {
            return false;
        };
        let children = std::mem::take(&mut self.node_mut(id).children);
        for &child in &children {
            self.node_mut(child).parent = Some(parent);
        }
        let siblings = &mut self.node_mut(parent).children;
        siblings.remove(pos);
        for (offset, child) in children.into_iter().enumerate() {
            siblings.insert(pos + offset, child);
        }
        self.node_mut(id).parent = None;
        true
    }

    /// Puts `replacement` where `id` was; `id` keeps its own children.
    pub fn replace_with_node(&mut self, id: NodeId, replacement: NodeId) -> bool {
        self.detach(replacement);
        let Some((parent, pos)) = self.position_in_parent(id) else {
            return false;
        };
        self.node_mut(parent).children[pos] = replacement;
        self.node_mut(replacement).parent = Some(parent);
        self.node_mut(id).parent = None;
        true
    }

    /// Mention a reference resolves to, following trace sources.
    pub fn reference_mention(&self, id: NodeId) -> Option<MentionIndex> {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            match &self.node(current).kind {
                NodeKind::Mention(m) => return Some(m.mention),
                NodeKind::Trace(t) => current = t.source?,
                _ => return None,
            }
        }
        None
    }

    /// `id` and everything below it, in preorder.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn display<'a>(&'a self, root: NodeId, tree: &'a SynTree) -> SemTreeDisplay<'a> {
        SemTreeDisplay::new(self, root, tree)
    }

    // Phase dispatch. Each variant module adds its own `impl SemArena`.

    /// Structural clean-up.
    pub fn simplify(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        match self.node_type(id) {
            SemNodeType::Branch => self.simplify_branch(id, cx),
            SemNodeType::Opp => self.simplify_opp(id, cx),
            SemNodeType::Link => self.simplify_link(id, cx),
            SemNodeType::Mention => self.simplify_mention(id, cx),
            SemNodeType::Trace => {}
        }
    }

    fn simplify_children(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        for child in self.children(id).to_vec() {
            self.simplify(child, cx);
        }
    }

    /// Moves links to the predicates they modify.
    pub fn fix_links(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        match self.node_type(id) {
            SemNodeType::Branch => self.fix_branch_links(id, cx),
            SemNodeType::Link => self.fix_link(id, cx),
            SemNodeType::Mention => self.fix_mention_links(id, cx),
            SemNodeType::Opp | SemNodeType::Trace => self.fix_child_links(id, cx),
        }
    }

    fn fix_child_links(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        for child in self.children(id).to_vec() {
            self.fix_links(child, cx);
        }
    }

    /// Fills the cached role slots, children first.
    pub fn regularize(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        for child in self.children(id).to_vec() {
            self.regularize(child, cx);
        }
        match self.node_type(id) {
            SemNodeType::Branch => self.regularize_branch(id),
            SemNodeType::Opp => self.regularize_opp(id, cx),
            SemNodeType::Link => self.regularize_link(id),
            SemNodeType::Mention => self.regularize_mention(id, cx),
            SemNodeType::Trace => {}
        }
    }

    /// Supplies traces for missing subjects. `awaiting` is a reference
    /// looking for a clause to be the subject of; returns whether it was used.
    pub fn create_traces(
        &mut self,
        id: NodeId,
        awaiting: Option<NodeId>,
        cx: PhaseContext<'_>,
    ) -> bool {
        match self.node_type(id) {
            SemNodeType::Branch => self.create_branch_traces(id, awaiting, cx),
            SemNodeType::Mention => {
                self.create_mention_traces(id, cx);
                false
            }
            SemNodeType::Opp | SemNodeType::Link | SemNodeType::Trace => {
                let mut used = false;
                for child in self.children(id).to_vec() {
                    used |= self.create_traces(child, awaiting, cx);
                }
                used
            }
        }
    }

    /// Runs every rewrite phase over the tree rooted at `root`.
    pub fn run_phases(&mut self, root: NodeId, cx: PhaseContext<'_>) {
        self.simplify(root, cx);
        log::debug!("simplified sem tree ({} nodes)", self.len());
        self.fix_links(root, cx);
        self.regularize(root, cx);
        self.create_traces(root, None, cx);
        log::debug!("traces created");
    }
}
