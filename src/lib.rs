#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Predicate-argument propositions from constituency parses.
//!
//! A sentence's parse and mentions are turned into a semantic tree by a
//! language strategy ([`SemTreeBuilder`]), rewritten by a fixed sequence of
//! phases, and flattened into a [`PropositionSet`].
//!
//! ## Usage
//!
//! ```
//! use layered_propositions::{PropositionConfig, PropositionFinder};
//! use layered_syntax::{read_tree, EntityType, MentionSet, MentionType};
//!
//! let mut tree = read_tree("(S (NPP (NNP John)) (VP (VBD left)))").unwrap();
//! let john = tree.find("NPP", "John").unwrap();
//! let mut mentions = MentionSet::new();
//! mentions.add(&mut tree, john, MentionType::Name, EntityType::Per).unwrap();
//!
//! let mut finder = PropositionFinder::english(PropositionConfig::english_defaults());
//! let props = finder.get_propositions(&tree, &mentions).unwrap();
//! assert!(props.definition(0).is_some());
//! ```

mod builder;
mod config;
mod errors;
mod finder;
mod linear;
mod proposition;
mod sem_tree;

pub use builder::{
    looks_like_temporal, DefaultSemTreeBuilder, EnglishSemTreeBuilder, LogicalArgs,
    SemTreeBuilder, SyntacticArgs,
};
pub use config::{
    PropositionConfig, DEFAULT_MAX_MENTION_OPPS, DEFAULT_MAX_OPP_LINKS,
    DEFAULT_MAX_SENTENCE_PROPS,
};
pub use errors::{ConfigError, SemTreeError, SemTreeResult};
pub use finder::{FlatSentence, PropositionFinder};
pub use linear::LinearPropFinder;
pub use proposition::{
    Argument, ArgumentValue, PredType, PropId, PropIdGenerator, Proposition,
    PropositionDisplay, PropositionSet, Role,
};
pub use sem_tree::{
    Branch, Link, MentionNode, NodeId, NodeKind, Opp, PhaseContext, Satellites, SemArena, SemNode,
    SemNodeType, SemTreeDisplay, Sentence, Trace,
};

#[cfg(test)]
mod tests {
    mod properties;
    mod scenarios;
    pub(crate) mod support;
}
