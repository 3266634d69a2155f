use super::support::sentence;
use crate::{
    EnglishSemTreeBuilder, NodeId, PhaseContext, PredType, PropIdGenerator, PropositionConfig,
    PropositionFinder, Role, SemArena, SemTreeBuilder, Sentence,
};
use layered_syntax::{EntityType, MentionSet, MentionType, SynTree};
use std::collections::HashSet;

const PASSIVE: &str =
    "(S (NPP (NNP John)) (VP (VBD was) (VP (VBN arrested) (PP (IN by) (NPA (NN police))))))";
const NEGATED: &str = "(S (NPP (NNP John)) (VP (VBD was) (RB not) (VP (VBN arrested))))";
const RELATIVE: &str = "(S (NP (NPA (DT the) (NN man)) (SBAR (WHNP (WP who)) (S (VP (VBD left))))) \
                        (VP (VBD smiled)))";
const CONTROL: &str = "(S (NPP (NNP John)) (VP (VBD persuaded) (NPP (NNP Mary)) \
                       (S (VP (TO to) (VP (VB leave))))))";

fn passive_sentence() -> (SynTree, MentionSet) {
    sentence(
        PASSIVE,
        &[
            ("NPP", "John", MentionType::Name, EntityType::Per),
            ("NPA", "police", MentionType::Desc, EntityType::Org),
        ],
    )
}

fn all_sentences() -> Vec<(SynTree, MentionSet)> {
    vec![
        passive_sentence(),
        sentence(NEGATED, &[("NPP", "John", MentionType::Name, EntityType::Per)]),
        sentence(
            RELATIVE,
            &[("NP", "the man who left", MentionType::Desc, EntityType::Per)],
        ),
        sentence(
            CONTROL,
            &[
                ("NPP", "John", MentionType::Name, EntityType::Per),
                ("NPP", "Mary", MentionType::Name, EntityType::Per),
            ],
        ),
    ]
}

/// Builds the tree and runs every rewrite phase, then hands it to `check`.
fn with_rewritten(
    tree: &SynTree,
    mentions: &MentionSet,
    check: impl FnOnce(&mut SemArena, NodeId, PhaseContext<'_>),
) {
    let config = PropositionConfig::english_defaults();
    let builder = EnglishSemTreeBuilder;
    let sentence = Sentence {
        tree,
        mentions,
        config: &config,
    };
    let cx = PhaseContext {
        sentence,
        builder: &builder,
    };

    let mut arena = SemArena::new();
    let root = builder.build_sem_tree(&mut arena, sentence).unwrap();
    arena.run_phases(root, cx);
    check(&mut arena, root, cx);
}

fn claimed(arena: &SemArena, root: NodeId) -> HashSet<NodeId> {
    arena
        .descendants(root)
        .into_iter()
        .filter(|&n| !arena.is_tangential(n))
        .collect()
}

#[test]
fn test_every_node_has_one_owner() {
    for (tree, mentions) in all_sentences() {
        with_rewritten(&tree, &mentions, |arena, root, cx| {
            arena.verify(root).unwrap();

            let mut ids = PropIdGenerator::new();
            arena.create_propositions(root, cx, &mut ids).unwrap();
            arena.verify(root).unwrap();
        });
    }
}

#[test]
fn test_regularize_is_idempotent() {
    for (tree, mentions) in all_sentences() {
        with_rewritten(&tree, &mentions, |arena, root, cx| {
            let slots = |arena: &SemArena| {
                arena
                    .descendants(root)
                    .into_iter()
                    .map(|n| (n, arena.cached_slots(n)))
                    .collect::<Vec<_>>()
            };

            arena.regularize(root, cx);
            let first = slots(&*arena);
            arena.regularize(root, cx);
            assert_eq!(first, slots(&*arena));
        });
    }
}

#[test]
fn test_claimed_nodes_stay_claimed() {
    for (tree, mentions) in all_sentences() {
        with_rewritten(&tree, &mentions, |arena, root, cx| {
            let before = claimed(arena, root);
            assert!(!before.is_empty());

            let mut ids = PropIdGenerator::new();
            arena.create_propositions(root, cx, &mut ids).unwrap();
            arena.regularize(root, cx);

            let after = claimed(arena, root);
            assert!(before.is_subset(&after));
        });
    }
}

#[test]
fn test_copula_removal_moves_negation_to_verb() {
    let (tree, mentions) =
        sentence(NEGATED, &[("NPP", "John", MentionType::Name, EntityType::Per)]);
    with_rewritten(&tree, &mentions, |arena, root, _| {
        let nodes = arena.descendants(root);
        assert!(nodes
            .iter()
            .all(|&n| arena.pred_type(n) != Some(PredType::Copula)));

        let verb = nodes
            .iter()
            .copied()
            .find(|&n| arena.pred_type(n) == Some(PredType::Verb))
            .unwrap();
        let negative = arena.as_opp(verb).unwrap().satellites.negative.unwrap();
        assert_eq!(tree.head_word(negative), "not");
    });
}

#[test]
fn test_passive_by_object_becomes_subject() {
    let (tree, mentions) = passive_sentence();
    let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
    let props = finder.get_propositions(&tree, &mentions).unwrap();

    let verb = props
        .iter()
        .find(|p| p.pred_type == PredType::Verb)
        .unwrap();
    assert_eq!(verb.pred_symbol(&tree), Some("arrested"));
    assert_eq!(verb.mention_of_role(&Role::Sub), Some(1));
    assert_eq!(verb.mention_of_role(&Role::Obj), Some(0));
    assert!(verb.args.iter().all(|a| a.role != Some(Role::prep("by"))));
    assert_eq!(verb.role_of_mention(1, &mentions), Some(&Role::Sub));
}

#[test]
fn test_sentence_ceiling() {
    let (tree, mentions) = passive_sentence();
    let config = PropositionConfig::english_defaults().with_max_sentence_props(2);
    let mut finder = PropositionFinder::english(config);
    let props = finder.get_propositions(&tree, &mentions).unwrap();

    assert_eq!(props.len(), 2);
    assert!(props.iter().all(|p| p.pred_type != PredType::Verb));
}

#[test]
fn test_finder_reuses_its_arena() {
    let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
    let (tree, mentions) = passive_sentence();
    let first = finder.get_propositions(&tree, &mentions).unwrap();
    let second = finder.get_propositions(&tree, &mentions).unwrap();
    assert_eq!(first.display(&tree), second.display(&tree));
}
