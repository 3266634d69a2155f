//! English head-child selection.
//!
//! A *priority* scan tries each tag of the list in turn and returns the first
//! child carrying it. An *any* scan walks the children and returns the first
//! one whose tag appears anywhere in the list.

use crate::tags::*;

#[derive(Clone, Copy)]
enum Dir {
    LeftToRight,
    RightToLeft,
}

fn positions(n: usize, dir: Dir) -> Box<dyn Iterator<Item = usize>> {
    match dir {
        Dir::LeftToRight => Box::new(0..n),
        Dir::RightToLeft => Box::new((0..n).rev()),
    }
}

fn priority_scan(children: &[&str], set: &[&str], dir: Dir) -> Option<usize> {
    set.iter()
        .find_map(|want| positions(children.len(), dir).find(|&i| children[i] == *want))
}

fn any_scan(children: &[&str], set: &[&str], dir: Dir) -> Option<usize> {
    positions(children.len(), dir).find(|&i| set.iter().any(|want| *want == children[i]))
}

const ADJP_SET: &[&str] = &[
    NNS, QP, NN, "$", ADVP, JJ, VBN, VBG, ADJP, JJR, NP, NPA, DATE, NPP, NPPOS, JJS, DT, "FW",
    RBR, RBS, SBAR, RB,
];
const ADVP_SET: &[&str] = &[
    RB, RBR, RBS, "FW", ADVP, TO, CD, JJR, JJ, IN, NP, NPA, DATE, NPP, NPPOS, JJS, NN,
];
const PP_SET: &[&str] = &[IN, TO, VBG, VBN, RP, "FW"];
const QP_SET: &[&str] = &[
    "$", IN, NNS, NN, NPP, DATE, JJ, RB, DT, CD, "NCD", QP, JJR, JJS,
];
const S_SET: &[&str] = &[
    TO, IN, VP, S, SBAR, ADJP, UCP, NP, NPA, NPP, DATE, NPPOS,
];
const SBAR_SET: &[&str] = &[
    WHNP, WHPP, WHADVP, "WHADJP", IN, DT, S, SQ, SINV, SBAR, FRAG,
];
const SINV_SET: &[&str] = &[
    VBZ, VBD, VBP, VB, MD, VP, S, SINV, ADJP, NP, NPA, DATE, NPP, NPPOS,
];
const SQ_SET: &[&str] = &[VBZ, VBD, VBP, VB, MD, VP, SQ];
const VP_SET: &[&str] = &[
    TO, VBD, VBN, MD, VBZ, VB, VBG, VBP, VP, ADJP, NN, NNS, NP, NPA, NPP, DATE, NPPOS,
];
const WHNP_SET: &[&str] = &[WDT, WP, "WP$", "WHADJP", WHPP, WHNP];

const NP_NOUNS: &[&str] = &[NN, NNP, NPP, NNPS, DATE, NNS, NX, POS, JJR];
const NP_PHRASES: &[&str] = &[NP, NPA, NPPOS];
const NP_MODIFIERS: &[&str] = &["$", ADJP, PRN];
const NP_NUMBERS: &[&str] = &[CD];
const NP_ADJECTIVES: &[&str] = &[JJ, JJS, RB, QP];

/// Index of the head child of a constituent with the given tag.
///
/// `children` must not be empty.
pub fn head_child_index(tag: &str, children: &[&str]) -> usize {
    let last = children.len().saturating_sub(1);
    let left = |set: &[&str]| priority_scan(children, set, Dir::LeftToRight).unwrap_or(0);
    let right = |set: &[&str]| priority_scan(children, set, Dir::RightToLeft).unwrap_or(last);

    match tag {
        ADJP => left(ADJP_SET),
        ADVP => right(ADVP_SET),
        CONJP => right(&[CC, RB, IN]),
        FRAG | UCP => last,
        NP | NPA | NPP | NPPOS => noun_phrase_head(children),
        PP => right(PP_SET),
        PRT => right(&[RP]),
        QP => left(QP_SET),
        "RRC" => right(&[VP, NP, NPA, DATE, NPP, NPPOS, ADVP, ADJP, PP]),
        S => left(S_SET),
        SBAR => left(SBAR_SET),
        "SBARQ" => left(&[SQ, S, SINV, "SBARQ", FRAG]),
        SINV => left(SINV_SET),
        SQ => left(SQ_SET),
        VP => left(VP_SET),
        "WHADJP" => left(&[CC, WRB, JJ, ADJP]),
        WHADVP => right(&[CC, WRB]),
        WHNP => left(WHNP_SET),
        WHPP => right(&[IN, TO, "FW"]),
        _ => 0,
    }
}

fn noun_phrase_head(children: &[&str]) -> usize {
    let last = children.len().saturating_sub(1);
    if children.last() == Some(&POS) {
        return last;
    }
    any_scan(children, NP_NOUNS, Dir::RightToLeft)
        .or_else(|| any_scan(children, NP_PHRASES, Dir::LeftToRight))
        .or_else(|| any_scan(children, NP_MODIFIERS, Dir::RightToLeft))
        .or_else(|| any_scan(children, NP_NUMBERS, Dir::RightToLeft))
        .or_else(|| any_scan(children, NP_ADJECTIVES, Dir::RightToLeft))
        .unwrap_or(last)
}
