use crate::builder::{EnglishSemTreeBuilder, SemTreeBuilder};
use crate::config::PropositionConfig;
use crate::errors::SemTreeResult;
use crate::linear::LinearPropFinder;
use crate::proposition::{PropIdGenerator, PropositionSet};
use crate::sem_tree::{NodeId, PhaseContext, SemArena, Sentence};
use layered_syntax::{EntityType, MentionSet, MentionType, SynTree};

/// Sentence-at-a-time driver: build the tree with the language strategy, run
/// the rewrite phases, collect propositions, then let the linear finder fill
/// gaps.
pub struct PropositionFinder {
    builder: Box<dyn SemTreeBuilder>,
    config: PropositionConfig,
    arena: SemArena,
}

/// A flat fallback parse with its mentions and propositions.
#[derive(Debug)]
pub struct FlatSentence {
    pub tree: SynTree,
    pub mentions: MentionSet,
    pub propositions: PropositionSet,
}

impl PropositionFinder {
    pub fn new(builder: Box<dyn SemTreeBuilder>, config: PropositionConfig) -> Self {
        PropositionFinder {
            builder,
            config,
            arena: SemArena::new(),
        }
    }

    pub fn english(config: PropositionConfig) -> Self {
        Self::new(Box::new(EnglishSemTreeBuilder), config)
    }

    pub fn config(&self) -> &PropositionConfig {
        &self.config
    }

    pub fn get_propositions(
        &mut self,
        tree: &SynTree,
        mentions: &MentionSet,
    ) -> SemTreeResult<PropositionSet> {
        let result = self.find(tree, mentions);
        self.arena.reset();
        result
    }

    /// For sentences the parser failed on. Each mention is `(token, type,
    /// entity type)` and is anchored on that token's preterminal.
    pub fn get_propositions_for_default_parse(
        &mut self,
        tokens: &[(&str, &str)],
        mentions: &[(usize, MentionType, EntityType)],
    ) -> SemTreeResult<FlatSentence> {
        let mut tree = SynTree::default_parse(tokens);
        let mut mention_set = MentionSet::new();
        for &(token, mention_type, entity_type) in mentions {
            let Some(preterminal) = tree.terminal(token).and_then(|t| tree.parent(t)) else {
                log::warn!("mention on token {} is outside the sentence", token);
                continue;
            };
            mention_set.add(&mut tree, preterminal, mention_type, entity_type)?;
        }

        let propositions = self.get_propositions(&tree, &mention_set)?;
        Ok(FlatSentence {
            tree,
            mentions: mention_set,
            propositions,
        })
    }

    /// The sem tree after every phase, rendered for inspection.
    pub fn debug_tree(&mut self, tree: &SynTree, mentions: &MentionSet) -> SemTreeResult<String> {
        let result = self.build_and_rewrite(tree, mentions).map(|(root, _)| {
            self.arena.display(root, tree).to_string()
        });
        self.arena.reset();
        result
    }

    fn build_and_rewrite(
        &mut self,
        tree: &SynTree,
        mentions: &MentionSet,
    ) -> SemTreeResult<(NodeId, PropIdGenerator)> {
        self.arena.reset();
        let sentence = Sentence {
            tree,
            mentions,
            config: &self.config,
        };
        let cx = PhaseContext {
            sentence,
            builder: self.builder.as_ref(),
        };

        let root = self.builder.build_sem_tree(&mut self.arena, sentence)?;
        let mut ids = PropIdGenerator::new();
        if self.arena.children(root).is_empty() {
            return Ok((root, ids));
        }

        self.arena.run_phases(root, cx);
        self.arena.create_propositions(root, cx, &mut ids)?;
        log::debug!("created {} propositions from the sem tree", ids.used());
        Ok((root, ids))
    }

    fn find(&mut self, tree: &SynTree, mentions: &MentionSet) -> SemTreeResult<PropositionSet> {
        let mut props = PropositionSet::new(self.config.max_sentence_props);
        let (root, mut ids) = self.build_and_rewrite(tree, mentions)?;
        if self.arena.children(root).is_empty() {
            log::warn!(
                "no sem tree built for sentence {:?}",
                tree.text(tree.root())
            );
            return Ok(props);
        }

        self.arena.list_propositions(root, &mut props);

        let sentence = Sentence {
            tree,
            mentions,
            config: &self.config,
        };
        LinearPropFinder::new(sentence).augment(&mut props, &mut ids);
        Ok(props)
    }
}
