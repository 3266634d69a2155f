//! Does a noun phrase look like a time expression?

use layered_syntax::{tags, MentionSet, SynId, SynTree};
use once_cell::sync::Lazy;
use std::collections::HashSet;

static TEMPORAL_HEADWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "yesterday", "today", "tomorrow", "tonight", "morning", "afternoon", "evening", "night",
        "weekend", "week", "weeks", "month", "months", "year", "years", "decade", "century",
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
        "january", "february", "march", "april", "may", "june", "july", "august", "september",
        "october", "november", "december", "jan.", "feb.", "mar.", "apr.", "jun.", "jul.",
        "aug.", "sep.", "sept.", "oct.", "nov.", "dec.", "spring", "summer", "autumn", "fall",
        "winter",
    ]
    .into_iter()
    .collect()
});

/// Words naming part of a period, temporal when followed by "of <time>"
/// ("the morning of March 3").
static PERIOD_PORTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["morning", "afternoon", "evening", "night", "beginning", "end", "middle", "start"]
        .into_iter()
        .collect()
});

const FIRST_YEAR: u32 = 1980;
const LAST_YEAR: u32 = 2009;

fn is_known_temporal_word(word: &str) -> bool {
    TEMPORAL_HEADWORDS.contains(word)
        || word
            .parse::<u32>()
            .map_or(false, |year| (FIRST_YEAR..=LAST_YEAR).contains(&year))
}

/// A node looks temporal if its mention is a time expression, it is tagged
/// `DATE`, or its head word is a time word. With `no_embedded`, a node inside
/// a larger temporal mention does not count on its own.
pub fn looks_like_temporal(
    tree: &SynTree,
    mentions: &MentionSet,
    node: SynId,
    no_embedded: bool,
) -> bool {
    if no_embedded {
        if let Some(parent) = tree.parent(node) {
            if tree.has_mention(parent) && looks_like_temporal(tree, mentions, parent, no_embedded)
            {
                return false;
            }
        }
    }

    if tree.tag(node) == tags::DATE {
        return true;
    }
    if mentions
        .by_node(node)
        .map_or(false, |m| m.entity_type.is_temporal())
    {
        return true;
    }

    let word = tree.head_word(node).to_lowercase();
    if PERIOD_PORTIONS.contains(word.as_str()) {
        let of_time = tree
            .children(node)
            .iter()
            .copied()
            .find(|&c| tree.tag(c) == tags::PP)
            .filter(|&pp| tree.head_word(pp).eq_ignore_ascii_case("of"))
            .and_then(|pp| tree.child(pp, 1))
            .map_or(false, |object| {
                looks_like_temporal(tree, mentions, object, no_embedded)
            });
        if of_time {
            return true;
        }
    }

    is_known_temporal_word(&word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_syntax::read_tree;

    #[test]
    fn test_head_words() {
        let tree = read_tree(
            "(S (NP (NN yesterday)) (NP (DT the) (NN dog)) (NP (CD 1994)) (NP (CD 2015)))",
        )
        .unwrap();
        let mentions = MentionSet::new();
        let np = |text| tree.find("NP", text).unwrap();

        assert!(looks_like_temporal(&tree, &mentions, np("yesterday"), false));
        assert!(!looks_like_temporal(&tree, &mentions, np("the dog"), false));
        assert!(looks_like_temporal(&tree, &mentions, np("1994"), false));
        assert!(!looks_like_temporal(&tree, &mentions, np("2015"), false));
    }

    #[test]
    fn test_period_portion_needs_time_object() {
        let tree = read_tree(
            "(S (NP (NP (DT the) (NN start)) (PP (IN of) (NP (NNP March)))) \
             (NP (NP (DT the) (NN start)) (PP (IN of) (NP (DT the) (NN race)))))",
        )
        .unwrap();
        let mentions = MentionSet::new();

        let of_march = tree.find("NP", "the start of March").unwrap();
        let of_race = tree.find("NP", "the start of the race").unwrap();
        assert!(looks_like_temporal(&tree, &mentions, of_march, false));
        assert!(!looks_like_temporal(&tree, &mentions, of_race, false));
    }
}
