#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Syntactic input for layered-propositions.
//!
//! This crate holds the read-only structures the semantic-tree builder walks:
//!
//! - [`SynTree`]: a headed constituency tree with token spans
//! - [`MentionSet`]: entity mentions anchored one-per-node on that tree
//! - [`tags`]: the English tag inventory
//!
//! ## Usage
//!
//! ```
//! use layered_syntax::{read_tree, EntityType, MentionSet, MentionType};
//!
//! let mut tree = read_tree("(S (NPP (NNP John)) (VP (VBD left)))").unwrap();
//! let john = tree.find("NPP", "John").unwrap();
//!
//! let mut mentions = MentionSet::new();
//! mentions.add(&mut tree, john, MentionType::Name, EntityType::Per).unwrap();
//!
//! assert_eq!(tree.head_word(tree.root()), "left");
//! ```

mod errors;
mod head_rules;
mod mention;
mod reader;
pub mod tags;
mod tree;

pub use errors::{SyntaxError, SyntaxResult};
pub use head_rules::head_child_index;
pub use mention::{EntityType, Mention, MentionIndex, MentionSet, MentionType};
pub use reader::read_tree;
pub use tree::{SynId, SynNode, SynTree};
