use super::{NodeId, NodeKind, SemArena};
use crate::errors::{SemTreeError, SemTreeResult};
use std::collections::HashSet;

fn inconsistent(message: String) -> SemTreeError {
    SemTreeError::Inconsistent {
        context: "verify",
        message,
    }
}

impl SemArena {
    /// Role slots cached on a node by `regularize`.
    pub fn cached_slots(&self, id: NodeId) -> Vec<NodeId> {
        match self.kind(id) {
            NodeKind::Branch(b) => b.reference.into_iter().chain(b.opp).collect(),
            NodeKind::Opp(o) => o.arg1.into_iter().chain(o.arg2).chain(o.links.iter().copied()).collect(),
            NodeKind::Link(l) => l.object.into_iter().collect(),
            NodeKind::Mention(m) => m.opps.iter().copied().chain(m.branch).collect(),
            NodeKind::Trace(_) => Vec::new(),
        }
    }

    /// Structural check of the tree under `root`: each node is listed once by
    /// the parent it points to, and every cached slot is a claimed
    /// descendant.
    pub fn verify(&self, root: NodeId) -> SemTreeResult<()> {
        let mut seen = HashSet::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            self.try_node(id)?;
            if !seen.insert(id) {
                return Err(inconsistent(format!("{} is reachable twice", id)));
            }

            for &child in self.children(id) {
                let node = self.try_node(child)?;
                if node.parent() != Some(id) {
                    return Err(inconsistent(format!(
                        "{} is listed under {} but points at {:?}",
                        child,
                        id,
                        node.parent()
                    )));
                }
                stack.push(child);
            }

            for slot in self.cached_slots(id) {
                self.try_node(slot)?;
                if !self.is_ancestor(id, slot) {
                    return Err(inconsistent(format!(
                        "slot {} of {} is not a descendant",
                        slot, id
                    )));
                }
                if self.is_tangential(slot) {
                    return Err(inconsistent(format!(
                        "slot {} of {} is still tangential",
                        slot, id
                    )));
                }
            }
        }
        Ok(())
    }
}
