//! English constituent and part-of-speech tags.
//!
//! Penn Treebank tags plus the handful of refinements the mention finder
//! writes into its trees (`NPA`, `NPP`, `NPPOS`, `NPPRO`).

pub const TOP: &str = "TOP";
pub const S: &str = "S";
pub const SBAR: &str = "SBAR";
pub const SINV: &str = "SINV";
pub const SQ: &str = "SQ";
pub const FRAG: &str = "FRAG";
pub const PRN: &str = "PRN";

pub const NP: &str = "NP";
/// Base noun phrase (no internal NP structure).
pub const NPA: &str = "NPA";
/// Proper-noun phrase.
pub const NPP: &str = "NPP";
/// Possessive noun phrase ("John 's").
pub const NPPOS: &str = "NPPOS";
/// Pronoun noun phrase.
pub const NPPRO: &str = "NPPRO";
pub const NX: &str = "NX";
pub const DATE: &str = "DATE";

pub const VP: &str = "VP";
pub const ADJP: &str = "ADJP";
pub const ADVP: &str = "ADVP";
pub const PP: &str = "PP";
pub const PRT: &str = "PRT";
pub const QP: &str = "QP";
pub const CONJP: &str = "CONJP";
pub const WHNP: &str = "WHNP";
pub const WHADVP: &str = "WHADVP";
pub const WHPP: &str = "WHPP";
pub const UCP: &str = "UCP";

pub const CC: &str = "CC";
pub const CD: &str = "CD";
pub const DT: &str = "DT";
pub const IN: &str = "IN";
pub const TO: &str = "TO";
pub const JJ: &str = "JJ";
pub const JJR: &str = "JJR";
pub const JJS: &str = "JJS";
pub const MD: &str = "MD";
pub const NN: &str = "NN";
pub const NNS: &str = "NNS";
pub const NNP: &str = "NNP";
pub const NNPS: &str = "NNPS";
pub const POS: &str = "POS";
pub const PRP: &str = "PRP";
/// Possessive pronoun.
pub const PRPS: &str = "PRP$";
pub const RB: &str = "RB";
pub const RBR: &str = "RBR";
pub const RBS: &str = "RBS";
pub const RP: &str = "RP";
pub const VB: &str = "VB";
pub const VBD: &str = "VBD";
pub const VBG: &str = "VBG";
pub const VBN: &str = "VBN";
pub const VBP: &str = "VBP";
pub const VBZ: &str = "VBZ";
pub const WDT: &str = "WDT";
pub const WP: &str = "WP";
pub const WRB: &str = "WRB";

pub const COMMA: &str = ",";
pub const COLON: &str = ":";
pub const PERIOD: &str = ".";

/// Common-noun and proper-noun preterminal tags.
pub fn is_noun(tag: &str) -> bool {
    matches!(tag, NN | NNS | NNP | NNPS)
}

/// Verb preterminal tags.
pub fn is_verb(tag: &str) -> bool {
    matches!(tag, VB | VBD | VBG | VBN | VBP | VBZ)
}

/// Noun-phrase constituent tags, including the mention finder refinements.
pub fn is_noun_phrase(tag: &str) -> bool {
    matches!(tag, NP | NPA | NPP | NPPOS | NPPRO | NX | DATE)
}

/// Tags that never carry words worth analyzing (punctuation).
pub fn is_punctuation(tag: &str) -> bool {
    matches!(tag, COMMA | COLON | PERIOD | "``" | "''" | "-LRB-" | "-RRB-")
}
