use super::{NodeId, NodeKind, PhaseContext, SemArena, SemNodeType};
use crate::proposition::{PredType, Role};
use layered_syntax::{tags, SynTree};

/// Stand-in for an elided argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    /// The reference this trace stands for; `None` if unresolved.
    pub source: Option<NodeId>,
}

impl Trace {
    pub fn to(source: Option<NodeId>) -> Self {
        Self { source }
    }
}

/// Prepositions whose clause shares the subject of the clause above
/// ("left *after* eating").
const SUBJECT_SHARING_PREPS: &[&str] = &[
    "after", "before", "while", "when", "by", "without", "since", "upon", "in", "despite", "for",
    "to", "as", "through", "from",
];

fn is_transparent_role(role: Option<&Role>) -> bool {
    match role {
        Some(Role::Member) => true,
        Some(Role::Prep(word)) => SUBJECT_SHARING_PREPS.contains(&word.as_str()),
        _ => false,
    }
}

impl SemArena {
    fn new_trace(&mut self, source: Option<NodeId>) -> NodeId {
        let trace = self.alloc(NodeKind::Trace(Trace::to(source)), None, Vec::new());
        self.claim(trace);
        trace
    }

    pub(super) fn create_branch_traces(
        &mut self,
        id: NodeId,
        awaiting: Option<NodeId>,
        cx: PhaseContext<'_>,
    ) -> bool {
        let Some((reference, opp)) = self.as_branch(id).map(|b| (b.reference, b.opp)) else {
            return false;
        };

        match (reference, opp) {
            (None, Some(_)) => {
                let source = awaiting.or_else(|| self.find_trace_antecedent(id, cx.tree()));
                if source.is_none() {
                    log::debug!("no antecedent for the subject of clause {}", id);
                }
                let trace = self.new_trace(source);
                self.prepend_child(id, trace);
                if let Some(branch) = self.as_branch_mut(id) {
                    branch.reference = Some(trace);
                }
                for child in self.children(id).to_vec() {
                    self.create_traces(child, None, cx);
                }
                awaiting.is_some()
            }
            (_, None) => {
                let mut used = false;
                for child in self.children(id).to_vec() {
                    used |= self.create_traces(child, awaiting, cx);
                }
                used
            }
            (Some(_), Some(_)) => {
                for child in self.children(id).to_vec() {
                    self.create_traces(child, None, cx);
                }
                false
            }
        }
    }

    /// A mention offers itself to its relative clause. If the clause already
    /// has a subject, the mention fills an empty slot deeper inside instead
    /// ("the man John saw").
    pub(super) fn create_mention_traces(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        let branch = self.as_mention(id).and_then(|m| m.branch);
        for child in self.children(id).to_vec() {
            if Some(child) != branch {
                self.create_traces(child, None, cx);
            } else if !self.create_traces(child, Some(id), cx)
                && !self.create_traces_earnestly(child, id)
            {
                log::debug!("relative clause {} has no slot for mention node {}", child, id);
            }
        }
    }

    fn create_traces_earnestly(&mut self, id: NodeId, awaiting: NodeId) -> bool {
        match self.node_type(id) {
            SemNodeType::Opp => self.create_opp_traces_earnestly(id, awaiting),
            SemNodeType::Mention | SemNodeType::Trace => false,
            SemNodeType::Branch | SemNodeType::Link => self
                .children(id)
                .to_vec()
                .into_iter()
                .any(|child| self.create_traces_earnestly(child, awaiting)),
        }
    }

    fn create_opp_traces_earnestly(&mut self, id: NodeId, awaiting: NodeId) -> bool {
        let Some((pred_type, arg1, arg2, links)) = self
            .as_opp(id)
            .map(|o| (o.pred_type, o.arg1, o.arg2, o.links.clone()))
        else {
            return false;
        };

        let is_branch = |arena: &SemArena, slot: Option<NodeId>| {
            slot.filter(|&n| arena.node_type(n) == SemNodeType::Branch)
        };
        if let Some(clause) = is_branch(self, arg1).or_else(|| is_branch(self, arg2)) {
            return self.create_traces_earnestly(clause, awaiting);
        }

        match pred_type {
            PredType::Verb | PredType::Copula if arg1.is_none() || arg2.is_none() => {
                let trace = self.new_trace(Some(awaiting));
                self.prepend_child(id, trace);
                if let Some(opp) = self.as_opp_mut(id) {
                    if opp.arg1.is_none() {
                        opp.arg1 = Some(trace);
                    } else {
                        opp.arg2 = Some(trace);
                    }
                }
                true
            }
            PredType::Comp => {
                let mut used = false;
                for link in links {
                    if let Some(object) = self.as_link(link).and_then(|l| l.object) {
                        used |= self.create_traces_earnestly(object, awaiting);
                    }
                }
                used
            }
            _ => self
                .children(id)
                .to_vec()
                .into_iter()
                .any(|child| self.create_traces_earnestly(child, awaiting)),
        }
    }

    /// Walks up from a subjectless clause to the reference its subject
    /// should corefer with.
    fn find_trace_antecedent(&self, clause: NodeId, tree: &SynTree) -> Option<NodeId> {
        let mut from = clause;
        let mut current = self.parent(clause);

        while let Some(node) = current {
            match self.kind(node) {
                NodeKind::Mention(_) => return Some(node),
                NodeKind::Branch(branch) => {
                    if branch.reference.is_some() {
                        return branch.reference;
                    }
                }
                NodeKind::Opp(opp) if opp.pred_type == PredType::Verb && from == clause => {
                    if !self.comma_precedes(node, clause, tree) {
                        let object = [opp.arg1, opp.arg2]
                            .into_iter()
                            .flatten()
                            .find(|&arg| arg != clause && self.is_reference(arg));
                        if object.is_some() {
                            return object;
                        }
                    }
                }
                NodeKind::Opp(_) | NodeKind::Trace(_) => {}
                NodeKind::Link(link) => {
                    if !is_transparent_role(link.role.as_ref()) {
                        return None;
                    }
                }
            }
            from = node;
            current = self.parent(node);
        }
        None
    }

    /// Whether the predicate's constituent has a comma before the clause.
    fn comma_precedes(&self, opp: NodeId, clause: NodeId, tree: &SynTree) -> bool {
        let (Some(opp_syn), Some(clause_syn)) = (self.syn(opp), self.syn(clause)) else {
            return false;
        };
        let clause_start = tree.start_token(clause_syn);
        tree.children(opp_syn)
            .iter()
            .any(|&c| tree.tag(c) == tags::COMMA && tree.end_token(c) < clause_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::{rewritten, sentence};
    use crate::{PropositionConfig, PropositionFinder, PropositionSet};
    use layered_syntax::{EntityType, MentionSet, MentionType};

    fn after_phases(tree: &SynTree, mentions: &MentionSet) -> String {
        let config = PropositionConfig::english_defaults();
        rewritten(tree, mentions, &config, |arena, root, cx| arena.run_phases(root, cx))
    }

    fn subject_of(props: &PropositionSet, tree: &SynTree, verb: &str) -> Option<usize> {
        props
            .iter()
            .find(|p| p.head.map(|h| tree.head_word(h)) == Some(verb))
            .and_then(|p| p.arg(0))
            .and_then(|a| a.mention_index())
    }

    #[test]
    fn test_transparent_roles() {
        assert!(is_transparent_role(Some(&Role::Member)));
        assert!(is_transparent_role(Some(&Role::prep("after"))));
        assert!(is_transparent_role(Some(&Role::prep("without"))));
        assert!(!is_transparent_role(Some(&Role::prep("of"))));
        assert!(!is_transparent_role(Some(&Role::Poss)));
        assert!(!is_transparent_role(None));
    }

    #[test]
    fn test_relative_clause_with_subject_fills_the_object() {
        let (tree, mentions) = sentence(
            "(S (NP (NPA (DT the) (NN man)) (SBAR (S (NPP (NNP John)) (VP (VBD saw))))) \
             (VP (VBD smiled)))",
            &[
                ("NP", "the man John saw", MentionType::Desc, EntityType::Per),
                ("NPP", "John", MentionType::Name, EntityType::Per),
            ],
        );

        insta::assert_snapshot!(after_phases(&tree, &mentions), @r###"
        the man John saw smiled
        (Branch)
          Mention m0 "the man John saw"
            OPP <noun> man
            Branch
              Mention m1 "John"
                OPP <name> "John"
              OPP <verb> saw
                Trace -> m0
          OPP <verb> smiled
        "###);
    }

    #[test]
    fn test_subject_shared_through_preposition() {
        let (tree, mentions) = sentence(
            "(S (NPP (NNP John)) (VP (VBD left) (PP (IN after) (S (VP (VBG eating))))))",
            &[("NPP", "John", MentionType::Name, EntityType::Per)],
        );
        let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
        let props = finder.get_propositions(&tree, &mentions).unwrap();

        assert_eq!(subject_of(&props, &tree, "eating"), Some(0));
    }

    #[test]
    fn test_opaque_preposition_blocks_the_subject() {
        let (tree, mentions) = sentence(
            "(S (NPP (NNP John)) (VP (VBD spoke) (PP (IN of) (S (VP (VBG leaving))))))",
            &[("NPP", "John", MentionType::Name, EntityType::Per)],
        );

        assert!(after_phases(&tree, &mentions).contains("Trace -> ?"));
    }

    #[test]
    fn test_comma_blocks_object_control() {
        let control = "(S (NPP (NNP John)) (VP (VBD persuaded) (NPP (NNP Mary)) \
                       (S (VP (TO to) (VP (VB leave))))))";
        let comma = "(S (NPP (NNP John)) (VP (VBD persuaded) (NPP (NNP Mary)) (, ,) \
                     (S (VP (TO to) (VP (VB leave))))))";
        let names = [
            ("NPP", "John", MentionType::Name, EntityType::Per),
            ("NPP", "Mary", MentionType::Name, EntityType::Per),
        ];

        let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
        let (tree, mentions) = sentence(control, &names);
        let props = finder.get_propositions(&tree, &mentions).unwrap();
        assert_eq!(subject_of(&props, &tree, "leave"), Some(1));

        let (tree, mentions) = sentence(comma, &names);
        let props = finder.get_propositions(&tree, &mentions).unwrap();
        assert_eq!(subject_of(&props, &tree, "leave"), Some(0));
    }
}
