//! Language strategies: initial tree construction plus the linguistic
//! questions the rewrite phases ask.

mod english;
mod temporal;

pub use english::EnglishSemTreeBuilder;
pub use temporal::looks_like_temporal;

use crate::errors::SemTreeResult;
use crate::sem_tree::{Branch, NodeId, NodeKind, SemArena, Sentence};
use layered_syntax::{SynId, SynTree};

/// Argument candidates of one predicate as they sit in the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntacticArgs {
    pub subject: Option<NodeId>,
    pub arg1: Option<NodeId>,
    pub arg2: Option<NodeId>,
    /// Link nodes, in order.
    pub links: Vec<NodeId>,
}

/// Arguments by logical role: subject, object, indirect object (or the
/// referent alone for non-verbal predicates), then links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalArgs {
    pub core: [Option<NodeId>; 3],
    pub links: Vec<NodeId>,
}

impl LogicalArgs {
    /// Straight copy of the syntactic slots.
    pub fn active(sargs: SyntacticArgs) -> Self {
        LogicalArgs {
            core: [sargs.subject, sargs.arg1, sargs.arg2],
            links: sargs.links,
        }
    }
}

/// One implementation per language, chosen when the finder is assembled.
pub trait SemTreeBuilder {
    /// Builds the initial tree for a sentence and returns its root clause.
    fn build_sem_tree(&self, arena: &mut SemArena, sentence: Sentence<'_>)
        -> SemTreeResult<NodeId>;

    fn is_copula(&self, tree: &SynTree, node: SynId) -> bool;

    fn is_modal_verb(&self, tree: &SynTree, node: SynId) -> bool;

    fn is_negative_adverb(&self, tree: &SynTree, node: SynId) -> bool;

    fn can_be_auxiliary_verb(&self, tree: &SynTree, node: SynId) -> bool;

    fn is_passive_verb(&self, tree: &SynTree, verb: SynId) -> bool;

    /// Participles that read as passive even without an auxiliary
    /// ("three people *killed* in the blast").
    fn is_known_transitive_verb(&self, tree: &SynTree, verb: SynId) -> bool;

    fn is_temporal_np(&self, sentence: Sentence<'_>, node: SynId) -> bool;

    /// The noun predicate inside the same mention that a link should modify.
    fn find_associated_predicate_in_np(&self, arena: &SemArena, link: NodeId) -> Option<NodeId>;

    /// Whether a clause under a predicate is its argument rather than an
    /// independent clause.
    fn ugly_branch_arg_heuristic(
        &self,
        tree: &SynTree,
        arena: &SemArena,
        opp: NodeId,
        branch: NodeId,
    ) -> bool;

    fn map_sargs_to_largs(
        &self,
        tree: &SynTree,
        arena: &SemArena,
        opp: NodeId,
        sargs: SyntacticArgs,
    ) -> LogicalArgs;
}

/// Fallback for languages without a strategy: an empty clause, no
/// heuristics.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSemTreeBuilder;

impl SemTreeBuilder for DefaultSemTreeBuilder {
    fn build_sem_tree(
        &self,
        arena: &mut SemArena,
        sentence: Sentence<'_>,
    ) -> SemTreeResult<NodeId> {
        let root = sentence.tree.root();
        Ok(arena.alloc(NodeKind::Branch(Branch::default()), Some(root), Vec::new()))
    }

    fn is_copula(&self, _: &SynTree, _: SynId) -> bool {
        false
    }

    fn is_modal_verb(&self, _: &SynTree, _: SynId) -> bool {
        false
    }

    fn is_negative_adverb(&self, _: &SynTree, _: SynId) -> bool {
        false
    }

    fn can_be_auxiliary_verb(&self, _: &SynTree, _: SynId) -> bool {
        false
    }

    fn is_passive_verb(&self, _: &SynTree, _: SynId) -> bool {
        false
    }

    fn is_known_transitive_verb(&self, _: &SynTree, _: SynId) -> bool {
        false
    }

    fn is_temporal_np(&self, _: Sentence<'_>, _: SynId) -> bool {
        false
    }

    fn find_associated_predicate_in_np(&self, _: &SemArena, _: NodeId) -> Option<NodeId> {
        None
    }

    fn ugly_branch_arg_heuristic(&self, _: &SynTree, _: &SemArena, _: NodeId, _: NodeId) -> bool {
        false
    }

    fn map_sargs_to_largs(
        &self,
        _: &SynTree,
        _: &SemArena,
        _: NodeId,
        _: SyntacticArgs,
    ) -> LogicalArgs {
        LogicalArgs::default()
    }
}
