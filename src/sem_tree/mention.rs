use super::{NodeId, PhaseContext, SemArena, SemNodeType};
use layered_syntax::{MentionIndex, MentionType};

/// An entity reference.
#[derive(Debug, Clone, PartialEq)]
pub struct MentionNode {
    pub mention: MentionIndex,
    pub definite: bool,
    /// Predicates describing the entity, once regularized.
    pub opps: Vec<NodeId>,
    /// Relative clause, once regularized.
    pub branch: Option<NodeId>,
}

impl MentionNode {
    pub fn new(mention: MentionIndex, definite: bool) -> Self {
        Self {
            mention,
            definite,
            opps: Vec::new(),
            branch: None,
        }
    }
}

impl SemArena {
    /// Appositives: splice out both inner mentions when unifying, otherwise
    /// all but the name or pronoun side.
    pub(super) fn simplify_mention(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        self.simplify_children(id, cx);

        let mentions = cx.sentence.mentions;
        let mention_type = |index: MentionIndex| mentions.get(index).map(|m| m.mention_type);

        let Some(index) = self.as_mention(id).map(|m| m.mention) else {
            return;
        };
        if mention_type(index) != Some(MentionType::Appo) {
            return;
        }

        let inner: Vec<NodeId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|&c| self.as_mention(c).is_some())
            .collect();

        let keep = if cx.config().unify_appositives {
            None
        } else {
            inner
                .iter()
                .copied()
                .find(|&c| {
                    let kind = self.as_mention(c).and_then(|m| mention_type(m.mention));
                    matches!(
                        kind,
                        Some(MentionType::Name | MentionType::Nest | MentionType::Pron)
                    )
                })
                .or_else(|| inner.first().copied())
        };

        for child in inner {
            if Some(child) != keep {
                self.replace_with_children(child);
            }
        }
    }

    pub(super) fn fix_mention_links(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        self.fix_child_links(id, cx);
        for child in self.children(id).to_vec() {
            if self.node_type(child) == SemNodeType::Link {
                self.attach_or_convert(child, cx);
            }
        }
    }

    pub(super) fn regularize_mention(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        let max_opps = cx.config().max_mention_opps;
        let mut opps = Vec::new();
        let mut branch = None;

        for child in self.children(id).to_vec() {
            match self.node_type(child) {
                SemNodeType::Opp if opps.len() < max_opps => opps.push(child),
                SemNodeType::Opp => {
                    log::warn!(
                        "mention node {} has more than {} predicates; ignoring {}",
                        id,
                        max_opps,
                        child
                    );
                }
                SemNodeType::Branch if branch.is_none() => branch = Some(child),
                _ => {}
            }
        }

        for &slot in opps.iter().chain(&branch) {
            self.claim(slot);
        }
        if let Some(mention) = self.as_mention_mut(id) {
            mention.opps = opps;
            mention.branch = branch;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::support::{sentence, simplified};
    use crate::PropositionConfig;
    use layered_syntax::{EntityType, MentionSet, MentionType, SynTree};

    fn appositive() -> (SynTree, MentionSet) {
        let (tree, mut mentions) = sentence(
            "(S (NP (NPP (NNP John)) (, ,) (NPA (DT the) (NN mayor)) (, ,)) (VP (VBD left)))",
            &[
                ("NP", "John , the mayor ,", MentionType::Appo, EntityType::Per),
                ("NPP", "John", MentionType::Name, EntityType::Per),
                ("NPA", "the mayor", MentionType::Desc, EntityType::Per),
            ],
        );
        mentions.set_members(0, &[1, 2]).unwrap();
        (tree, mentions)
    }

    #[test]
    fn test_appositive_keeps_the_name_side() {
        let (tree, mentions) = appositive();
        let config = PropositionConfig::english_defaults();

        insta::assert_snapshot!(simplified(&tree, &mentions, &config), @r###"
        John , the mayor , left
        (Branch)
          (Mention m0 "John , the mayor ,")
            (Mention m1 "John")
              (OPP <name> "John")
            (OPP <noun> mayor)
          (OPP <verb> left)
        "###);
    }

    #[test]
    fn test_appositive_keeps_the_first_member_without_a_name() {
        let (tree, mut mentions) = sentence(
            "(S (NP (NPA (DT the) (NN mayor)) (, ,) (NPA (DT a) (NN lawyer)) (, ,)) \
             (VP (VBD left)))",
            &[
                ("NP", "the mayor , a lawyer ,", MentionType::Appo, EntityType::Per),
                ("NPA", "the mayor", MentionType::Desc, EntityType::Per),
                ("NPA", "a lawyer", MentionType::Desc, EntityType::Per),
            ],
        );
        mentions.set_members(0, &[1, 2]).unwrap();
        let config = PropositionConfig::english_defaults();

        insta::assert_snapshot!(simplified(&tree, &mentions, &config), @r###"
        the mayor , a lawyer , left
        (Branch)
          (Mention m0 "the mayor , a lawyer ,")
            (Mention m1 "the mayor")
              (OPP <noun> mayor)
            (OPP <noun> lawyer)
          (OPP <verb> left)
        "###);
    }

    #[test]
    fn test_unified_appositive_splices_every_member() {
        let (tree, mentions) = appositive();
        let mut config = PropositionConfig::english_defaults();
        config.unify_appositives = true;

        insta::assert_snapshot!(simplified(&tree, &mentions, &config), @r###"
        John , the mayor , left
        (Branch)
          (Mention m0 "John , the mayor ,")
            (OPP <name> "John")
            (OPP <noun> mayor)
          (OPP <verb> left)
        "###);
    }
}
