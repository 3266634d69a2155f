//! Adjacency heuristics run after the tree-based pass. They only append:
//! definitional propositions for mentions the tree left undefined, and
//! possessives the tree missed.

use crate::proposition::{
    Argument, PredType, PropIdGenerator, Proposition, PropositionSet, Role,
};
use crate::sem_tree::Sentence;
use layered_syntax::{tags, Mention, MentionType};

pub struct LinearPropFinder<'a> {
    sentence: Sentence<'a>,
}

impl<'a> LinearPropFinder<'a> {
    pub fn new(sentence: Sentence<'a>) -> Self {
        LinearPropFinder { sentence }
    }

    /// Appends to `props`, drawing ids from the same generator as the tree
    /// pass. Returns how many propositions were added.
    pub fn augment(&self, props: &mut PropositionSet, ids: &mut PropIdGenerator) -> usize {
        let before = props.len();
        self.add_definitions(props, ids);
        self.add_possessives(props, ids);
        let added = props.len() - before;
        if added > 0 {
            log::debug!("linear finder added {} propositions", added);
        }
        added
    }

    fn has_room(&self, ids: &PropIdGenerator) -> bool {
        ids.used() < self.sentence.config.max_sentence_props
    }

    fn needs_definition(&self, mention: &Mention) -> bool {
        let mentions = self.sentence.mentions;
        match mention.mention_type {
            MentionType::None | MentionType::List | MentionType::Appo | MentionType::Part => {
                return false
            }
            _ => {}
        }
        // Name parts are covered by the name, appositive members by the
        // appositive they were folded into.
        let folded = mention
            .parent
            .and_then(|p| mentions.get(p))
            .map_or(false, |p| {
                matches!(p.mention_type, MentionType::Name | MentionType::Appo)
            });
        !folded
    }

    /// Some proposition already has this mention's head word as its head.
    fn head_taken(&self, props: &PropositionSet, mention: &Mention) -> bool {
        let tree = self.sentence.tree;
        let head = tree.head_preterminal(mention.node);
        props
            .iter()
            .any(|p| p.head.map(|h| tree.head_preterminal(h)) == Some(head))
    }

    fn add_definitions(&self, props: &mut PropositionSet, ids: &mut PropIdGenerator) {
        let tree = self.sentence.tree;
        for mention in self.sentence.mentions.iter() {
            if !self.needs_definition(mention) || props.definition(mention.index).is_some() {
                continue;
            }
            let is_name = matches!(mention.mention_type, MentionType::Name | MentionType::Nest);
            if !is_name && self.head_taken(props, mention) {
                continue;
            }
            if !self.has_room(ids) {
                return;
            }

            let (pred_type, head) = match mention.mention_type {
                MentionType::Name | MentionType::Nest => (PredType::Name, None),
                MentionType::Pron => (PredType::Pronoun, Some(mention.node)),
                _ => (PredType::Noun, Some(tree.head_preterminal(mention.node))),
            };
            let mut prop = Proposition::new(ids.next_id(), pred_type, head);
            prop.args.push(Argument::mention(Some(Role::Ref), mention.index));
            if pred_type == PredType::Name {
                prop.args.push(Argument::text(None, mention.node));
            }
            props.take_proposition(prop);
        }
    }

    /// "John 's car": the possessor ends right before a POS token, and the
    /// possessed is the smallest mention spanning that token with its head
    /// after it.
    fn add_possessives(&self, props: &mut PropositionSet, ids: &mut PropIdGenerator) {
        let tree = self.sentence.tree;
        let mentions = self.sentence.mentions;

        for possessor in mentions.iter() {
            let pos_token = tree.end_token(possessor.node) + 1;
            let is_pos = tree
                .terminal(pos_token)
                .and_then(|t| tree.parent(t))
                .map_or(false, |pre| tree.tag(pre) == tags::POS);
            if !is_pos {
                continue;
            }

            let possessed = mentions
                .iter()
                .filter(|m| m.index != possessor.index)
                .filter(|m| {
                    tree.start_token(m.node) <= pos_token
                        && pos_token <= tree.end_token(m.node)
                        && tree.head_token(m.node) > pos_token
                })
                .min_by_key(|m| tree.end_token(m.node) - tree.start_token(m.node));
            let Some(possessed) = possessed else {
                continue;
            };

            let related = props
                .iter()
                .any(|p| p.mentions(possessor.index) && p.mentions(possessed.index));
            if related {
                continue;
            }
            if !self.has_room(ids) {
                return;
            }

            let head = tree.terminal(pos_token).and_then(|t| tree.parent(t));
            let mut prop = Proposition::new(ids.next_id(), PredType::Poss, head);
            prop.args.push(Argument::mention(Some(Role::Ref), possessed.index));
            prop.args.push(Argument::mention(Some(Role::Poss), possessor.index));
            props.take_proposition(prop);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropositionConfig;
    use layered_syntax::{read_tree, EntityType, MentionSet, SynTree};

    fn run(tree: &SynTree, mentions: &MentionSet, config: &PropositionConfig) -> PropositionSet {
        let sentence = Sentence {
            tree,
            mentions,
            config,
        };
        let mut props = PropositionSet::new(config.max_sentence_props);
        let mut ids = PropIdGenerator::new();
        LinearPropFinder::new(sentence).augment(&mut props, &mut ids);
        props
    }

    #[test]
    fn test_definitions_and_possessive() {
        let mut tree = read_tree(
            "(S (NP (NPPOS (NPP (NNP John)) (POS 's)) (NN car)) (VP (VBD broke)))",
        )
        .unwrap();
        let car = tree.find("NP", "John 's car").unwrap();
        let john = tree.find("NPP", "John").unwrap();
        let mut mentions = MentionSet::new();
        mentions.add(&mut tree, car, MentionType::Desc, EntityType::Veh).unwrap();
        mentions.add(&mut tree, john, MentionType::Name, EntityType::Per).unwrap();

        let props = run(&tree, &mentions, &PropositionConfig::default());
        insta::assert_snapshot!(props.display(&tree), @r###"
        p0 <noun> car(<ref>:m0)
        p1 <name>(<ref>:m1, "John")
        p2 <poss> 's(<ref>:m0, <poss>:m1)
        "###);
    }

    #[test]
    fn test_skips_defined_and_nested_mentions() {
        let mut tree = read_tree("(S (NP (NPP (NNP Bob) (NNP Smith))) (VP (VBD left)))").unwrap();
        let np = tree.find("NP", "Bob Smith").unwrap();
        let npp = tree.find("NPP", "Bob Smith").unwrap();
        let mut mentions = MentionSet::new();
        let name = mentions.add(&mut tree, np, MentionType::Name, EntityType::Per).unwrap();
        let inner = mentions.add(&mut tree, npp, MentionType::None, EntityType::Per).unwrap();
        mentions.set_members(name, &[inner]).unwrap();

        let config = PropositionConfig::default();
        let props = run(&tree, &mentions, &config);
        assert_eq!(props.len(), 1);

        let sentence = Sentence {
            tree: &tree,
            mentions: &mentions,
            config: &config,
        };
        let mut again = props.clone();
        let mut ids = PropIdGenerator::new();
        ids.next_id();
        assert_eq!(LinearPropFinder::new(sentence).augment(&mut again, &mut ids), 0);
    }

    #[test]
    fn test_respects_ceiling() {
        let mut tree = read_tree("(S (NPP (NNP John)) (VP (VBD met) (NPP (NNP Mary))))").unwrap();
        let john = tree.find("NPP", "John").unwrap();
        let mary = tree.find("NPP", "Mary").unwrap();
        let mut mentions = MentionSet::new();
        mentions.add(&mut tree, john, MentionType::Name, EntityType::Per).unwrap();
        mentions.add(&mut tree, mary, MentionType::Name, EntityType::Per).unwrap();

        let config = PropositionConfig::default().with_max_sentence_props(1);
        let props = run(&tree, &mentions, &config);
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_skips_appositive_members_and_taken_heads() {
        let mut tree = read_tree(
            "(S (NP (NPP (NNP John)) (, ,) (NPA (DT the) (NN mayor)) (, ,)) (VP (VBD left)))",
        )
        .unwrap();
        let appo = tree.find("NP", "John , the mayor ,").unwrap();
        let john = tree.find("NPP", "John").unwrap();
        let mayor = tree.find("NPA", "the mayor").unwrap();
        let mut mentions = MentionSet::new();
        let whole = mentions.add(&mut tree, appo, MentionType::Appo, EntityType::Per).unwrap();
        let name = mentions.add(&mut tree, john, MentionType::Name, EntityType::Per).unwrap();
        let desc = mentions.add(&mut tree, mayor, MentionType::Desc, EntityType::Per).unwrap();
        mentions.set_members(whole, &[name, desc]).unwrap();

        let props = run(&tree, &mentions, &PropositionConfig::default());
        assert!(props.is_empty());

        // A second mention on the same head as a defined one.
        let mut tree = read_tree("(S (NP (NPA (DT the) (NN mayor))) (VP (VBD left)))").unwrap();
        let outer = tree.find("NP", "the mayor").unwrap();
        let inner = tree.find("NPA", "the mayor").unwrap();
        let mut mentions = MentionSet::new();
        mentions.add(&mut tree, outer, MentionType::Desc, EntityType::Per).unwrap();
        mentions.add(&mut tree, inner, MentionType::Desc, EntityType::Per).unwrap();

        let props = run(&tree, &mentions, &PropositionConfig::default());
        insta::assert_snapshot!(props.display(&tree), @"p0 <noun> mayor(<ref>:m0)");
    }
}
