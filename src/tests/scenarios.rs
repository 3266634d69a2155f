use super::support::sentence;
use crate::{PredType, PropositionConfig, PropositionFinder, PropositionSet};
use layered_syntax::{EntityType, MentionSet, MentionType, SynTree};

fn propositions(tree: &SynTree, mentions: &MentionSet) -> String {
    let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
    finder
        .get_propositions(tree, mentions)
        .unwrap()
        .display(tree)
}

#[test]
fn test_passive_with_by_phrase() {
    let (tree, mentions) = sentence(
        "(S (NPP (NNP John)) (VP (VBD was) (VP (VBN arrested) (PP (IN by) (NPA (NN police))))))",
        &[
            ("NPP", "John", MentionType::Name, EntityType::Per),
            ("NPA", "police", MentionType::Desc, EntityType::Org),
        ],
    );

    insta::assert_snapshot!(propositions(&tree, &mentions), @r###"
    p0 <name>(<ref>:m0, "John")
    p1 <noun> police(<ref>:m1)
    p2 <verb> arrested(<sub>:m1, <obj>:m0)
    "###);
}

#[test]
fn test_negated_passive_keeps_negation() {
    let (tree, mentions) = sentence(
        "(S (NPP (NNP John)) (VP (VBD was) (RB not) (VP (VBN arrested))))",
        &[("NPP", "John", MentionType::Name, EntityType::Per)],
    );

    insta::assert_snapshot!(propositions(&tree, &mentions), @r###"
    p0 <name>(<ref>:m0, "John")
    p1 <verb>[<neg>:not] arrested(<obj>:m0)
    "###);
}

#[test]
fn test_prepositional_link_attaches_to_noun() {
    let (tree, mentions) = sentence(
        "(S (NP (NPA (NN mayor)) (PP (IN of) (NPP (NNP Paris)))) (VP (VBD resigned)))",
        &[
            ("NP", "mayor of Paris", MentionType::Desc, EntityType::Per),
            ("NPP", "Paris", MentionType::Name, EntityType::Gpe),
        ],
    );

    // Paris keeps its own name definition, and the link is named by its
    // preposition rather than a location role.
    insta::assert_snapshot!(propositions(&tree, &mentions), @r###"
    p0 <name>(<ref>:m1, "Paris")
    p1 <noun> mayor(<ref>:m0, of:m1)
    p2 <verb> resigned(<sub>:m0)
    "###);
}

#[test]
fn test_prepositional_phrase_outside_the_mention_is_not_a_noun_argument() {
    let (tree, mentions) = sentence(
        "(S (NP (NPA (DT the) (NN mayor)) (PP (IN of) (NPP (NNP Paris)))) (VP (VBD resigned)))",
        &[
            ("NPA", "the mayor", MentionType::Desc, EntityType::Per),
            ("NPP", "Paris", MentionType::Name, EntityType::Gpe),
        ],
    );
    let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
    let props = finder.get_propositions(&tree, &mentions).unwrap();

    let mayor = props.definition(0).unwrap();
    assert_eq!(mayor.pred_type, PredType::Noun);
    assert_eq!(mayor.args.len(), 1);
    assert!(!mayor.mentions(1));
    assert_eq!(props.definition(1).map(|p| p.pred_type), Some(PredType::Name));
}

#[test]
fn test_relative_clause_subject_trace() {
    let (tree, mentions) = sentence(
        "(S (NP (NPA (DT the) (NN man)) (SBAR (WHNP (WP who)) (S (VP (VBD left))))) \
         (VP (VBD smiled)))",
        &[("NP", "the man who left", MentionType::Desc, EntityType::Per)],
    );

    insta::assert_snapshot!(propositions(&tree, &mentions), @r###"
    p0 <noun> man(<ref>:m0)
    p1 <verb> left(<sub>:m0)
    p2 <verb> smiled(<sub>:m0)
    "###);

    let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
    insta::assert_snapshot!(finder.debug_tree(&tree, &mentions).unwrap(), @r###"
    the man who left smiled
    (Branch)
      Mention m0 "the man who left"
        OPP <noun> man
        Branch
          Trace -> m0
          OPP <verb> left
      OPP <verb> smiled
    "###);
}

#[test]
fn test_object_control_trace() {
    let (tree, mentions) = sentence(
        "(S (NPP (NNP John)) (VP (VBD persuaded) (NPP (NNP Mary)) \
         (S (VP (TO to) (VP (VB leave))))))",
        &[
            ("NPP", "John", MentionType::Name, EntityType::Per),
            ("NPP", "Mary", MentionType::Name, EntityType::Per),
        ],
    );

    insta::assert_snapshot!(propositions(&tree, &mentions), @r###"
    p0 <name>(<ref>:m0, "John")
    p1 <name>(<ref>:m1, "Mary")
    p2 <verb> leave(<sub>:m1)
    p3 <verb> persuaded(<sub>:m0, <obj>:p2, <iobj>:m1)
    "###);
}

#[test]
fn test_default_parse_falls_back_to_definitions() {
    let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
    let flat = finder
        .get_propositions_for_default_parse(
            &[("Acme", "NNP"), ("Corp", "NNP"), ("said", "VBD")],
            &[(1, MentionType::Name, EntityType::Org)],
        )
        .unwrap();

    insta::assert_snapshot!(flat.propositions.display(&flat.tree), @r###"p0 <name>(<ref>:m0, "Corp")"###);
}

#[test]
fn test_verb_cluster_keeps_main_verb() {
    let (tree, mentions) = sentence(
        "(S (NPP (NNP John)) (VP (VBZ has) (VP (VBN been) (VP (VBN killed)))))",
        &[("NPP", "John", MentionType::Name, EntityType::Per)],
    );

    insta::assert_snapshot!(propositions(&tree, &mentions), @r###"
    p0 <name>(<ref>:m0, "John")
    p1 <verb> killed(<obj>:m0)
    "###);

    let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
    insta::assert_snapshot!(finder.debug_tree(&tree, &mentions).unwrap(), @r###"
    John has been killed
    (Branch)
      Mention m0 "John"
        OPP <name> "John"
      OPP <verb> killed
    "###);
}

#[test]
fn test_embedded_verb_cluster_is_the_clause_argument() {
    let (tree, mentions) = sentence(
        "(S (NPP (NNP Mary)) (VP (VBD said) \
         (S (NPP (NNP John)) (VP (VBZ has) (VP (VBN been) (VP (VBN killed)))))))",
        &[
            ("NPP", "Mary", MentionType::Name, EntityType::Per),
            ("NPP", "John", MentionType::Name, EntityType::Per),
        ],
    );

    insta::assert_snapshot!(propositions(&tree, &mentions), @r###"
    p0 <name>(<ref>:m0, "Mary")
    p1 <name>(<ref>:m1, "John")
    p2 <verb> killed(<obj>:m1)
    p3 <verb> said(<sub>:m0, <obj>:p2)
    "###);
}

/// "John , the mayor , left" with an appositive over both members.
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

fn appositive_propositions(unify_appositives: bool) -> PropositionSet {
    let (tree, mentions) = appositive();
    let config = PropositionConfig {
        unify_appositives,
        ..PropositionConfig::english_defaults()
    };
    PropositionFinder::english(config)
        .get_propositions(&tree, &mentions)
        .unwrap()
}

#[test]
fn test_split_appositive_defines_each_head_once() {
    let props = appositive_propositions(false);
    let (tree, _) = appositive();

    // The name stays a mention of its own, the description folds into the
    // appositive.
    assert!(props.iter().all(|p| !p.mentions(2)));
    let mayor = props
        .iter()
        .filter(|p| p.head.map(|h| tree.head_word(h)) == Some("mayor"))
        .count();
    assert_eq!(mayor, 1);
    assert!(props.definition(1).is_some());
    insta::assert_snapshot!(props.display(&tree), @r###"
    p0 <name>(<ref>:m1, "John")
    p1 <noun> mayor(<ref>:m0)
    p2 <verb> left(<sub>:m0)
    "###);
}

#[test]
fn test_unified_appositive_adds_no_member_definitions() {
    let props = appositive_propositions(true);
    let (tree, _) = appositive();

    assert!(props.iter().all(|p| !p.mentions(1) && !p.mentions(2)));
    insta::assert_snapshot!(props.display(&tree), @r###"
    p0 <name>(<ref>:m0, "John")
    p1 <noun> mayor(<ref>:m0)
    p2 <verb> left(<sub>:m0)
    "###);
}
