use super::{NodeId, NodeKind, Opp, PhaseContext, SemArena, SemNodeType};
use crate::proposition::{PredType, Role};
use layered_syntax::SynId;

/// A role-labelled attachment around one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    /// `None` links dissolve during simplification.
    pub role: Option<Role>,
    /// The preposition (or marker) syntax node.
    pub head: Option<SynId>,
    /// The object is argument text rather than an entity or proposition.
    pub quote: bool,
    pub object: Option<NodeId>,
}

impl Link {
    pub fn new(role: Option<Role>, head: Option<SynId>) -> Self {
        Self {
            role,
            head,
            quote: false,
            object: None,
        }
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.role.as_ref() == Some(role)
    }
}

/// Predicate type of the OPP that stands in for a stray link.
fn stand_in_pred_type(role: Option<&Role>) -> PredType {
    match role {
        Some(Role::Poss) => PredType::Poss,
        Some(Role::Loc) => PredType::Loc,
        _ => PredType::Modifier,
    }
}

impl SemArena {
    pub(super) fn simplify_link(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        self.simplify_children(id, cx);
        if self.as_link(id).map_or(false, |l| l.role.is_none()) {
            self.replace_with_children(id);
        }
    }

    /// A possessive link wrapping only a temporal link gives way to it
    /// ("Monday night's game").
    pub(super) fn fix_link(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        let mut current = id;
        if cx.config().use_2009_props && self.as_link(id).map_or(false, |l| l.has_role(&Role::Poss)) {
            if let Some(only) = self.only_child(id) {
                let is_temporal = self.as_link(only).map_or(false, |l| l.has_role(&Role::Temp));
                if is_temporal && self.replace_with_children(id) {
                    current = only;
                }
            }
        }
        self.fix_child_links(current, cx);
    }

    /// The object is the first entity, clause or predicate child; failing
    /// that, the object of a nested link.
    pub(super) fn regularize_link(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        let direct = children.iter().copied().find(|&c| {
            matches!(
                self.node_type(c),
                SemNodeType::Mention | SemNodeType::Trace | SemNodeType::Branch | SemNodeType::Opp
            )
        });

        let (object, inner) = match direct {
            Some(object) => (Some(object), None),
            None => {
                let inner = children
                    .iter()
                    .copied()
                    .find(|&c| self.node_type(c) == SemNodeType::Link);
                (inner.and_then(|l| self.as_link(l)).and_then(|l| l.object), inner)
            }
        };

        if let Some(link) = self.as_link_mut(id) {
            link.object = object;
        }
        for slot in inner.into_iter().chain(object) {
            self.claim(slot);
        }
    }

    /// Hands a link to the noun predicate it belongs with, or wraps it in a
    /// new predicate of its own.
    pub(super) fn attach_or_convert(&mut self, link: NodeId, cx: PhaseContext<'_>) {
        if let Some(noun) = cx.builder.find_associated_predicate_in_np(self, link) {
            self.append_child(noun, link);
            return;
        }

        let Some((role, head)) = self.as_link(link).map(|l| (l.role.clone(), l.head)) else {
            return;
        };
        let pred_type = stand_in_pred_type(role.as_ref());
        let syn = self.syn(link);
        let opp = self.alloc(
            NodeKind::Opp(Opp::new(pred_type, head, cx.tree())),
            syn,
            Vec::new(),
        );
        if self.replace_with_node(link, opp) {
            self.append_child(opp, link);
            log::debug!(
                "link {} ({}) converted into a {} predicate",
                link,
                role.as_ref().map_or("-", Role::as_str),
                pred_type
            );
        }
    }

    /// Replaces each link child by a stand-in predicate over it.
    pub(super) fn convert_links_to_predicates(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        for child in self.children(id).to_vec() {
            let Some((role, head)) = self.as_link(child).map(|l| (l.role.clone(), l.head)) else {
                continue;
            };
            let syn = self.syn(child);
            let head = head.or(syn);
            let opp = self.alloc(
                NodeKind::Opp(Opp::new(stand_in_pred_type(role.as_ref()), head, cx.tree())),
                syn,
                Vec::new(),
            );
            self.replace_with_node(child, opp);
            self.append_child(opp, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sem_tree::{MentionNode, Sentence};
    use crate::{EnglishSemTreeBuilder, PropositionConfig};
    use layered_syntax::{read_tree, MentionSet, SynTree};

    fn link(arena: &mut SemArena, role: Role, children: Vec<NodeId>) -> NodeId {
        arena.alloc(NodeKind::Link(Link::new(Some(role), None)), None, children)
    }

    fn opp(arena: &mut SemArena, tree: &SynTree, pred_type: PredType, head: Option<SynId>) -> NodeId {
        arena.alloc(NodeKind::Opp(Opp::new(pred_type, head, tree)), None, Vec::new())
    }

    fn mention(arena: &mut SemArena, index: usize, children: Vec<NodeId>) -> NodeId {
        arena.alloc(NodeKind::Mention(MentionNode::new(index, true)), None, children)
    }

    fn with_context(config: PropositionConfig, check: impl FnOnce(&SynTree, PhaseContext<'_>)) {
        let tree = read_tree("(NP (NPA (NN mayor)) (PP (IN of) (NPP (NNP Paris))))").unwrap();
        let mentions = MentionSet::new();
        let builder = EnglishSemTreeBuilder;
        let cx = PhaseContext {
            sentence: Sentence {
                tree: &tree,
                mentions: &mentions,
                config: &config,
            },
            builder: &builder,
        };
        check(&tree, cx);
    }

    #[test]
    fn test_possessive_over_temporal_gives_way() {
        with_context(PropositionConfig::english_defaults(), |tree, cx| {
            let mut arena = SemArena::new();
            let temporal = link(&mut arena, Role::Temp, Vec::new());
            let possessive = link(&mut arena, Role::Poss, vec![temporal]);
            let noun = opp(&mut arena, tree, PredType::Noun, None);
            arena.append_child(noun, possessive);

            arena.fix_links(noun, cx);
            assert_eq!(arena.children(noun), &[temporal]);
            assert_eq!(arena.parent(possessive), None);
        });
    }

    #[test]
    fn test_possessive_over_temporal_kept_without_2009_props() {
        let mut config = PropositionConfig::english_defaults();
        config.use_2009_props = false;
        with_context(config, |tree, cx| {
            let mut arena = SemArena::new();
            let temporal = link(&mut arena, Role::Temp, Vec::new());
            let possessive = link(&mut arena, Role::Poss, vec![temporal]);
            let noun = opp(&mut arena, tree, PredType::Noun, None);
            arena.append_child(noun, possessive);

            arena.fix_links(noun, cx);
            assert_eq!(arena.children(noun), &[possessive]);
            assert_eq!(arena.children(possessive), &[temporal]);
        });
    }

    #[test]
    fn test_prepositional_link_attaches_to_preceding_noun() {
        with_context(PropositionConfig::english_defaults(), |tree, cx| {
            let mut arena = SemArena::new();
            let mayor = tree.find("NN", "mayor");
            let noun = opp(&mut arena, tree, PredType::Noun, mayor);
            let paris = mention(&mut arena, 1, Vec::new());
            let of = link(&mut arena, Role::prep("of"), vec![paris]);
            let np = mention(&mut arena, 0, vec![noun, of]);

            arena.attach_or_convert(of, cx);
            assert_eq!(arena.children(np), &[noun]);
            assert_eq!(arena.children(noun), &[of]);
        });
    }

    #[test]
    fn test_stray_link_becomes_a_predicate() {
        with_context(PropositionConfig::english_defaults(), |tree, cx| {
            let mut arena = SemArena::new();
            let paris = mention(&mut arena, 1, Vec::new());
            let location = link(&mut arena, Role::Loc, vec![paris]);
            let np = mention(&mut arena, 0, vec![location]);

            arena.attach_or_convert(location, cx);
            let [stand_in] = arena.children(np)[..] else {
                panic!("expected a single child");
            };
            assert_eq!(arena.pred_type(stand_in), Some(PredType::Loc));
            assert_eq!(arena.children(stand_in), &[location]);

            // A noun after an ordinary preposition is not its head.
            let mut arena = SemArena::new();
            let paris = mention(&mut arena, 1, Vec::new());
            let of = link(&mut arena, Role::prep("of"), vec![paris]);
            let noun = opp(&mut arena, tree, PredType::Noun, None);
            let np = mention(&mut arena, 0, vec![of, noun]);

            arena.attach_or_convert(of, cx);
            let children = arena.children(np).to_vec();
            assert_eq!(children.len(), 2);
            assert_eq!(arena.pred_type(children[0]), Some(PredType::Modifier));
            assert_eq!(arena.children(children[0]), &[of]);
            assert!(arena.children(noun).is_empty());
        });
    }

    #[test]
    fn test_convert_links_to_predicates() {
        with_context(PropositionConfig::english_defaults(), |tree, cx| {
            let mut arena = SemArena::new();
            let of = tree.find("IN", "of");
            let object = mention(&mut arena, 1, Vec::new());
            let prep = arena.alloc(
                NodeKind::Link(Link::new(Some(Role::prep("of")), of)),
                None,
                vec![object],
            );
            let owner = mention(&mut arena, 0, Vec::new());
            let possessive = link(&mut arena, Role::Poss, vec![owner]);
            let copula = opp(&mut arena, tree, PredType::Copula, None);
            arena.append_child(copula, prep);
            arena.append_child(copula, possessive);

            arena.convert_links_to_predicates(copula, cx);
            let children = arena.children(copula).to_vec();
            let types: Vec<_> = children.iter().map(|&c| arena.pred_type(c)).collect();
            assert_eq!(types, vec![Some(PredType::Modifier), Some(PredType::Poss)]);
            assert_eq!(arena.children(children[0]), &[prep]);
            assert_eq!(arena.children(children[1]), &[possessive]);
            assert_eq!(arena.as_opp(children[0]).and_then(|o| o.head_symbol()), Some("of"));
        });
    }
}
