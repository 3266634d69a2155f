use crate::{
    EnglishSemTreeBuilder, NodeId, PhaseContext, PropositionConfig, SemArena, SemTreeBuilder,
    Sentence,
};
use layered_syntax::{read_tree, EntityType, MentionSet, MentionType, SynTree};

/// Parses `bracketed` and attaches one mention per `(tag, text, ...)` entry,
/// in order.
pub(crate) fn sentence(
    bracketed: &str,
    mentions: &[(&str, &str, MentionType, EntityType)],
) -> (SynTree, MentionSet) {
    let mut tree = read_tree(bracketed).unwrap();
    let mut set = MentionSet::new();
    for &(tag, text, mention_type, entity_type) in mentions {
        let node = tree
            .find(tag, text)
            .unwrap_or_else(|| panic!("no {} {:?} in {}", tag, text, bracketed));
        set.add(&mut tree, node, mention_type, entity_type).unwrap();
    }
    (tree, set)
}

/// Builds the English sem tree, hands it to `phases`, and dumps the result.
pub(crate) fn rewritten(
    tree: &SynTree,
    mentions: &MentionSet,
    config: &PropositionConfig,
    phases: impl FnOnce(&mut SemArena, NodeId, PhaseContext<'_>),
) -> String {
    let builder = EnglishSemTreeBuilder;
    let sentence = Sentence {
        tree,
        mentions,
        config,
    };
    let cx = PhaseContext {
        sentence,
        builder: &builder,
    };

    let mut arena = SemArena::new();
    let root = builder.build_sem_tree(&mut arena, sentence).unwrap();
    phases(&mut arena, root, cx);
    arena.display(root, tree).to_string()
}

/// The dump after structural simplification alone.
pub(crate) fn simplified(tree: &SynTree, mentions: &MentionSet, config: &PropositionConfig) -> String {
    rewritten(tree, mentions, config, |arena, root, cx| arena.simplify(root, cx))
}
