use super::{NodeId, PhaseContext, SemArena, SemNodeType};
use crate::proposition::PredType;

/// A clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Branch {
    /// Subject, once regularized.
    pub reference: Option<NodeId>,
    /// Main predicate, once regularized.
    pub opp: Option<NodeId>,
}

impl SemArena {
    /// A clause whose only child is another clause collapses into it. The
    /// root instead absorbs the inner clause's children, so it stays the root.
    pub(super) fn simplify_branch(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        self.simplify_children(id, cx);

        let Some(only) = self.only_child(id) else {
            return;
        };
        if self.node_type(only) != SemNodeType::Branch {
            return;
        }
        if self.parent(id).is_some() {
            self.replace_with_children(id);
        } else {
            self.replace_with_children(only);
        }
    }

    /// Moves the clause's links under its verb, then fixes children. A clause
    /// left holding a single link gets that link attached or converted.
    pub(super) fn fix_branch_links(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        let children = self.children(id).to_vec();
        let predicate = children.iter().enumerate().find(|&(_, &child)| {
            matches!(self.pred_type(child), Some(PredType::Verb | PredType::Comp))
        });

        if let Some((pos, &pred)) = predicate {
            let mut before = Vec::new();
            for (i, &child) in children.iter().enumerate() {
                if self.node_type(child) != SemNodeType::Link {
                    continue;
                }
                if i < pos {
                    before.push(child);
                } else {
                    self.append_child(pred, child);
                }
            }
            for (offset, link) in before.into_iter().enumerate() {
                self.insert_child(pred, offset, link);
            }
        }

        self.fix_child_links(id, cx);

        if let Some(only) = self.only_child(id) {
            if self.node_type(only) == SemNodeType::Link {
                self.attach_or_convert(only, cx);
            }
        }
    }

    /// The clause's predicate is its first verb or compound predicate, and
    /// only failing that its first predicate of any kind.
    pub(super) fn regularize_branch(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        let reference = children.iter().copied().find(|&c| self.is_reference(c));
        let opp = children
            .iter()
            .copied()
            .find(|&c| matches!(self.pred_type(c), Some(PredType::Verb | PredType::Comp)))
            .or_else(|| {
                children
                    .iter()
                    .copied()
                    .find(|&c| self.node_type(c) == SemNodeType::Opp)
            });

        if let Some(branch) = self.as_branch_mut(id) {
            branch.reference = reference;
            branch.opp = opp;
        }
        for slot in reference.into_iter().chain(opp) {
            self.claim(slot);
        }
    }
}
