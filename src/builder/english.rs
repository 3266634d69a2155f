//! English tree construction and heuristics.

use super::temporal::looks_like_temporal;
use super::{LogicalArgs, SemTreeBuilder, SyntacticArgs};
use crate::errors::{SemTreeError, SemTreeResult};
use crate::proposition::{PredType, Role};
use crate::sem_tree::{
    Branch, Link, MentionNode, NodeId, NodeKind, Opp, SemArena, SemNodeType, Sentence,
};
use layered_syntax::tags::*;
use layered_syntax::{Mention, MentionType, SynId, SynTree};

const COPULAS: &[&str] = &["be", "is", "'s", "are", "'re", "was", "were", "been", "being"];
const NEGATIVE_ADVERBS: &[&str] = &["not", "n't", "never"];
const AUXILIARY_HAVE: &[&str] = &["has", "have", "had"];
const LOCATIVE_PRONOUNS: &[&str] = &["here", "there", "abroad", "overseas", "home"];

/// Past participles that imply an agent even with no auxiliary in sight.
const KNOWN_TRANSITIVE_VERBS: &[&str] = &[
    "found", "killed", "murdered", "assassinated", "slain", "executed", "eliminated", "bumped",
    "taken", "blown", "shot", "stabbed", "gunned", "attacked", "assaulted", "knifed",
    "bayonetted", "hit", "beaten", "battered", "mutilated", "trampled", "tortured", "martyred",
    "maimed", "bitten", "poisoned", "abused", "injured", "harmed", "wounded", "damaged", "gouged",
    "crippled", "lamed", "disabled", "incapacitated", "bruised", "contused", "crushed",
    "lacerated", "scalded", "disfigured", "scarred", "smashed", "sliced", "raped", "grazed",
    "given", "kidnapped", "abducted", "snatched", "siezed", "captured", "accused", "indicted",
    "blamed", "charged", "incriminated", "arrested", "detained", "convicted", "apprehended",
    "collared", "caught", "pinched", "nailed", "nabbed", "grabbed", "brought", "conveyed",
    "transported", "displaced", "founded",
];

fn head_word_in(tree: &SynTree, node: SynId, words: &[&str]) -> bool {
    let word = tree.head_word(node);
    words.iter().any(|w| w.eq_ignore_ascii_case(word))
}

/// The English strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishSemTreeBuilder;

impl EnglishSemTreeBuilder {
    pub fn new() -> Self {
        EnglishSemTreeBuilder
    }

    pub fn is_particle(&self, tree: &SynTree, node: SynId) -> bool {
        tree.n_children(node) == 1 && matches!(tree.tag(node), PRT | RP)
    }

    pub fn is_adverb(&self, tree: &SynTree, node: SynId) -> bool {
        let adverb = if tree.tag(node) == ADVP {
            if tree.n_children(node) != 1 {
                return false;
            }
            match tree.head(node) {
                Some(head) => head,
                None => return false,
            }
        } else {
            node
        };
        tree.n_children(adverb) == 1 && tree.tag(adverb) == RB
    }

    /// "here", "there", "abroad" and the like, alone in their phrase.
    pub fn is_locative_pronoun(&self, tree: &SynTree, node: SynId) -> bool {
        let mut head = node;
        while !tree.is_preterminal(head) {
            if tree.n_children(head) != 1 {
                return false;
            }
            match tree.head(head) {
                Some(next) => head = next,
                None => return false,
            }
        }
        head_word_in(tree, head, LOCATIVE_PRONOUNS)
    }

    /// Conjoined verb phrases: at least two verbal children and a separator.
    pub fn is_vp_list(&self, tree: &SynTree, node: SynId) -> bool {
        let mut verbs = 0;
        let mut separators = 0;
        for &child in tree.children(node) {
            match tree.tag(child) {
                VP | VB | VBZ | VBD | VBG | VBN => verbs += 1,
                COMMA | CC | CONJP => separators += 1,
                _ => {}
            }
        }
        verbs > 1 && separators > 0
    }
}

impl SemTreeBuilder for EnglishSemTreeBuilder {
    fn build_sem_tree(
        &self,
        arena: &mut SemArena,
        sentence: Sentence<'_>,
    ) -> SemTreeResult<NodeId> {
        let root = sentence.tree.root();
        let mut build = Build {
            arena,
            s: sentence,
            lang: self,
        };
        let children = build.subtree(root)?;
        Ok(build.branch(Some(root), children))
    }

    fn is_copula(&self, tree: &SynTree, node: SynId) -> bool {
        head_word_in(tree, node, COPULAS)
    }

    fn is_modal_verb(&self, tree: &SynTree, node: SynId) -> bool {
        tree.tag(node) == MD
    }

    fn is_negative_adverb(&self, tree: &SynTree, node: SynId) -> bool {
        let adverb = if tree.tag(node) == ADVP {
            match tree.head(node) {
                Some(head) => head,
                None => return false,
            }
        } else {
            node
        };
        tree.tag(adverb) == RB && head_word_in(tree, adverb, NEGATIVE_ADVERBS)
    }

    fn can_be_auxiliary_verb(&self, tree: &SynTree, node: SynId) -> bool {
        self.is_modal_verb(tree, node)
            || self.is_copula(tree, node)
            || head_word_in(tree, node, AUXILIARY_HAVE)
    }

    /// In a reduced relative ("people killed in the blast") any VBN is
    /// passive. Elsewhere the VBN needs a copula heading the VP above it,
    /// or the one above that for conjoined VPs.
    fn is_passive_verb(&self, tree: &SynTree, verb: SynId) -> bool {
        let Some(parent) = tree.parent(verb) else {
            return false;
        };

        let mut top_vp = verb;
        while let Some(up) = tree.parent(top_vp).filter(|&p| tree.tag(p) == VP) {
            top_vp = up;
        }

        let is_vbn = tree.tag(verb) == VBN;
        if tree.parent(top_vp).map_or(false, |p| tree.tag(p) == NP) {
            return is_vbn;
        }
        if !is_vbn {
            return false;
        }

        let headed_by_copula =
            |vp: SynId| tree.child(vp, 0).map_or(false, |c| self.is_copula(tree, c));

        let Some(gparent) = tree.parent(parent) else {
            return false;
        };
        if tree.tag(gparent) == VP && headed_by_copula(gparent) {
            return true;
        }
        let Some(ggparent) = tree.parent(gparent) else {
            return false;
        };
        tree.tag(gparent) == VP && tree.tag(ggparent) == VP && headed_by_copula(ggparent)
    }

    fn is_known_transitive_verb(&self, tree: &SynTree, verb: SynId) -> bool {
        head_word_in(tree, verb, KNOWN_TRANSITIVE_VERBS)
    }

    fn is_temporal_np(&self, sentence: Sentence<'_>, node: SynId) -> bool {
        let no_embedded = !sentence.config.use_2009_props;
        looks_like_temporal(sentence.tree, sentence.mentions, node, no_embedded)
    }

    /// Possessive and unknown links look forward for the noun, temporal links
    /// take the last noun anywhere, others the last noun before them.
    fn find_associated_predicate_in_np(&self, arena: &SemArena, link: NodeId) -> Option<NodeId> {
        let parent = arena.parent(link)?;
        arena.as_mention(parent)?;
        let role = arena.as_link(link)?.role.as_ref()?;

        let siblings = arena.children(parent);
        let pos = siblings.iter().position(|&s| s == link)?;
        let is_noun = |n: &&NodeId| arena.pred_type(**n) == Some(PredType::Noun);

        match role {
            Role::Poss | Role::Unknown => siblings[pos..].iter().find(is_noun).copied(),
            Role::Temp => siblings.iter().filter(is_noun).last().copied(),
            _ => siblings[..pos].iter().filter(is_noun).last().copied(),
        }
    }

    /// A clause is an argument unless the predicate's phrase has a comma.
    fn ugly_branch_arg_heuristic(
        &self,
        tree: &SynTree,
        arena: &SemArena,
        opp: NodeId,
        _branch: NodeId,
    ) -> bool {
        match arena.syn(opp) {
            Some(syn) => !tree.children(syn).iter().any(|&c| tree.tag(c) == COMMA),
            None => true,
        }
    }

    /// Passive verbs take their subject from a "by" link and their object
    /// from the syntactic subject.
    fn map_sargs_to_largs(
        &self,
        tree: &SynTree,
        arena: &SemArena,
        opp: NodeId,
        sargs: SyntacticArgs,
    ) -> LogicalArgs {
        let passive = arena.as_opp(opp).map_or(false, |o| {
            o.pred_type == PredType::Verb
                && o.head.map_or(false, |head| {
                    self.is_passive_verb(tree, head)
                        || (sargs.arg1.is_none()
                            && sargs.arg2.is_none()
                            && self.is_known_transitive_verb(tree, head))
                })
        });
        if !passive {
            return LogicalArgs::active(sargs);
        }

        let by = Role::prep("by");
        let mut by_object = None;
        let mut links = Vec::with_capacity(sargs.links.len());
        for link in sargs.links {
            match arena.as_link(link) {
                Some(l) if by_object.is_none() && l.has_role(&by) => by_object = l.object,
                _ => links.push(link),
            }
        }

        LogicalArgs {
            core: [by_object, sargs.subject, sargs.arg1],
            links,
        }
    }
}

/// One tree-construction pass.
struct Build<'a, 'b> {
    arena: &'b mut SemArena,
    s: Sentence<'a>,
    lang: &'b EnglishSemTreeBuilder,
}

impl<'a, 'b> Build<'a, 'b> {
    fn branch(&mut self, syn: Option<SynId>, children: Vec<NodeId>) -> NodeId {
        self.arena
            .alloc(NodeKind::Branch(Branch::default()), syn, children)
    }

    fn opp(
        &mut self,
        pred_type: PredType,
        head: Option<SynId>,
        syn: Option<SynId>,
        children: Vec<NodeId>,
    ) -> NodeId {
        let opp = Opp::new(pred_type, head, self.s.tree);
        self.arena.alloc(NodeKind::Opp(opp), syn, children)
    }

    fn link(
        &mut self,
        role: Role,
        head: Option<SynId>,
        syn: Option<SynId>,
        children: Vec<NodeId>,
    ) -> NodeId {
        self.arena
            .alloc(NodeKind::Link(Link::new(Some(role), head)), syn, children)
    }

    fn mention_node(
        &mut self,
        mention: &Mention,
        definite: bool,
        syn: SynId,
        children: Vec<NodeId>,
    ) -> NodeId {
        let node = MentionNode::new(mention.index, definite);
        self.arena
            .alloc(NodeKind::Mention(node), Some(syn), children)
    }

    /// The mention on a node flagged as having one.
    fn mention_at(&self, node: SynId) -> SemTreeResult<Option<&'a Mention>> {
        if !self.s.tree.has_mention(node) {
            return Ok(None);
        }
        self.s
            .mentions
            .by_node(node)
            .map(Some)
            .ok_or(SemTreeError::MissingMention { node })
    }

    fn children_of(&mut self, node: SynId) -> SemTreeResult<Vec<NodeId>> {
        self.children_except(node, None)
    }

    fn children_except(
        &mut self,
        node: SynId,
        skip: Option<SynId>,
    ) -> SemTreeResult<Vec<NodeId>> {
        let mut out = Vec::new();
        for &child in self.s.tree.children(node) {
            if Some(child) != skip {
                out.extend(self.subtree(child)?);
            }
        }
        Ok(out)
    }

    fn add_negative(&mut self, nodes: &[NodeId], negative: Option<SynId>) {
        for &node in nodes {
            if let Some(opp) = self.arena.as_opp_mut(node) {
                opp.add_negative(negative);
            }
        }
    }

    fn first_negative_child(&self, node: SynId) -> Option<SynId> {
        let tree = self.s.tree;
        tree.children(node)
            .iter()
            .copied()
            .find(|&c| self.lang.is_negative_adverb(tree, c))
    }

    fn subtree(&mut self, node: SynId) -> SemTreeResult<Vec<NodeId>> {
        let tree = self.s.tree;
        if tree.is_terminal(node) {
            return Ok(Vec::new());
        }

        let tag = tree.tag(node);
        match tag {
            TOP => self.children_of(node),
            S | SBAR | SINV | FRAG | PRN => self.clause(node),
            _ if tree.has_mention(node) && !is_noun(tag) => self.mention(node),
            VP if self.lang.is_vp_list(tree, node) => self.vp_list(node),
            VP | ADJP | JJ | JJR | JJS | VBG | VBN | CD | NN | NNS | NNP | NNPS | PRP => {
                self.predicate(node)
            }
            PP => self.prepositional(node),
            ADVP if self.lang.is_locative_pronoun(tree, node) => {
                let children = self.children_of(node)?;
                Ok(vec![self.link(Role::Loc, Some(node), Some(node), children)])
            }
            NPPOS => {
                let children = self.children_of(node)?;
                Ok(vec![self.link(Role::Poss, Some(node), Some(node), children)])
            }
            // Wh-phrases are left out.
            WHNP => Ok(Vec::new()),
            _ => self.children_of(node),
        }
    }

    /// A clause, or a link when a preposition or single wh-adverb ties it to
    /// what is above.
    fn clause(&mut self, node: SynId) -> SemTreeResult<Vec<NodeId>> {
        let tree = self.s.tree;
        if let Some(first) = tree.child(node, 0) {
            let linker = match tree.tag(first) {
                IN => Some(first),
                WHADVP if tree.n_children(first) == 1 => tree.child(first, 0),
                _ => None,
            };
            if let Some(head) = linker {
                let role = Role::prep(tree.head_word(first));
                let children = self.children_of(node)?;
                return Ok(vec![self.link(role, Some(head), Some(node), children)]);
            }
        }

        let children = self.children_of(node)?;
        let negative = self.first_negative_child(node);
        self.add_negative(&children, negative);
        Ok(vec![self.branch(Some(node), children)])
    }

    fn mention(&mut self, node: SynId) -> SemTreeResult<Vec<NodeId>> {
        let tree = self.s.tree;
        let s = self.s;
        let mention = self
            .mention_at(node)?
            .ok_or(SemTreeError::MissingMention { node })?;

        // A mention over a single list mention is the list plus the rest.
        let mention_children: Vec<SynId> = tree
            .children(node)
            .iter()
            .copied()
            .filter(|&c| tree.has_mention(c))
            .collect();
        if let [only] = mention_children[..] {
            let is_list = self
                .mention_at(only)?
                .map_or(false, |m| m.mention_type == MentionType::List);
            if is_list {
                return self.list_with_rest(node, only);
            }
        }

        match mention.mention_type {
            MentionType::None => {
                let parent_is_name = mention
                    .parent
                    .and_then(|p| s.mentions.get(p))
                    .map_or(false, |p| p.mention_type == MentionType::Name);
                if parent_is_name {
                    // The enclosing name builds the name predicate.
                    Ok(Vec::new())
                } else if tree.n_children(node) == 1 && head_word_in(tree, node, &["that"]) {
                    // "... including that of ..."
                    Ok(vec![self.opp(PredType::Noun, Some(node), Some(node), Vec::new())])
                } else {
                    self.children_of(node)
                }
            }
            MentionType::Part if !s.config.make_partitive_props => {
                let children = self.children_of(node)?;
                let result = self.mention_node(mention, true, node, children.clone());
                let of = Role::prep("of");
                for child in children {
                    if self.arena.as_link(child).map_or(false, |l| l.has_role(&of)) {
                        self.arena.replace_with_children(child);
                    }
                }
                Ok(vec![result])
            }
            MentionType::List => self.list(node, mention),
            _ if mention.entity_type.is_temporal() => self.temporal(node, mention),
            MentionType::Appo => {
                let children = self.children_of(node)?;
                Ok(vec![self.mention_node(mention, false, node, children)])
            }
            MentionType::Name | MentionType::Nest => self.name(node, mention),
            _ if self.is_possessive_pronoun(node) => {
                let pronoun = self.opp(PredType::Pronoun, Some(node), Some(node), Vec::new());
                let reference = self.mention_node(mention, true, node, vec![pronoun]);
                Ok(vec![self.link(Role::Poss, Some(node), Some(node), vec![reference])])
            }
            MentionType::Pron => {
                let pronoun = self.opp(PredType::Pronoun, Some(node), Some(node), Vec::new());
                Ok(vec![self.mention_node(mention, true, node, vec![pronoun])])
            }
            _ if self.lang.is_temporal_np(s, node) => self.temporal(node, mention),
            _ => {
                let children = self.children_of(node)?;
                let children = self.apply_based_heuristic(children);
                let result = self.mention_node(mention, false, node, Vec::new());
                self.apply_name_noun_name_heuristic(result, children, false)?;
                Ok(vec![result])
            }
        }
    }

    fn is_possessive_pronoun(&self, node: SynId) -> bool {
        let tree = self.s.tree;
        match tree.tag(node) {
            PRPS => true,
            NPPRO => {
                tree.n_children(node) == 1
                    && tree.head(node).map_or(false, |h| tree.tag(h) == PRPS)
            }
            _ => false,
        }
    }

    fn list_with_rest(&mut self, node: SynId, list: SynId) -> SemTreeResult<Vec<NodeId>> {
        let mut result = self.subtree(list)?;
        let mut rest = Vec::new();
        for &child in self.s.tree.children(node) {
            if child != list {
                rest.extend(self.subtree(child)?);
            }
        }
        match result.first() {
            Some(&first) => {
                for other in rest {
                    self.arena.append_child(first, other);
                }
            }
            None => result = rest,
        }
        Ok(result)
    }

    /// Conjoined mentions: a set predicate whose members hang off
    /// `<member>` links, followed by the first noun predicate found.
    fn list(&mut self, node: SynId, mention: &Mention) -> SemTreeResult<Vec<NodeId>> {
        let children = self.children_of(node)?;
        let set = self.opp(PredType::Set, None, Some(node), children.clone());

        let mut noun = None;
        for child in children {
            if self.arena.node_type(child) == SemNodeType::Mention {
                let syn = self.arena.syn(child);
                let member = self.link(Role::Member, syn, syn, Vec::new());
                self.arena.replace_with_node(child, member);
                self.arena.append_child(member, child);
            } else if noun.is_none() && self.arena.pred_type(child) == Some(PredType::Noun) {
                self.arena.prune_out(child);
                noun = Some(child);
            }
        }

        let contents = std::iter::once(set).chain(noun).collect();
        Ok(vec![self.mention_node(mention, false, node, contents)])
    }

    fn temporal(&mut self, node: SynId, mention: &Mention) -> SemTreeResult<Vec<NodeId>> {
        let children = self.children_of(node)?;
        let reference = self.mention_node(mention, false, node, children);
        Ok(vec![self.link(Role::Temp, Some(node), Some(node), vec![reference])])
    }

    fn name(&mut self, node: SynId, mention: &Mention) -> SemTreeResult<Vec<NodeId>> {
        let s = self.s;
        let name_node = mention
            .child
            .and_then(|c| s.mentions.get(c))
            .map_or(node, |c| c.node);
        let name_opp = self.opp(PredType::Name, None, Some(name_node), Vec::new());

        if name_node == node {
            let mut contents = vec![name_opp];
            for &child in s.tree.children(node) {
                let nested = self
                    .mention_at(child)?
                    .map_or(false, |m| m.mention_type == MentionType::Nest);
                if nested {
                    contents.extend(self.subtree(child)?);
                }
            }
            return Ok(vec![self.mention_node(mention, true, node, contents)]);
        }

        let result = self.mention_node(mention, true, node, Vec::new());

        // "Paris, Texas"
        if let Some(state) = self.state_of_city(node, mention)? {
            let state_mention = self
                .mention_at(state)?
                .ok_or(SemTreeError::MissingMention { node: state })?;
            let state_ref = self.mention_node(state_mention, true, state, Vec::new());
            let state_link = self.link(Role::Loc, Some(state), Some(state), vec![state_ref]);
            let state_opp = self.opp(PredType::Loc, None, Some(state), vec![state_link]);
            self.arena.append_child(result, name_opp);
            self.arena.append_child(result, state_opp);
            return Ok(vec![result]);
        }

        let children = self.children_of(node)?;
        self.apply_name_noun_name_heuristic(result, children, true)?;
        self.arena.append_child(result, name_opp);
        Ok(vec![result])
    }

    /// The state of a "City, State" GPE name.
    fn state_of_city(&self, node: SynId, mention: &Mention) -> SemTreeResult<Option<SynId>> {
        let tree = self.s.tree;
        if mention.mention_type != MentionType::Name || !mention.entity_type.matches_gpe() {
            return Ok(None);
        }

        let children = tree.children(node);
        let mut i = 0;

        let Some(&city) = children.get(i) else {
            return Ok(None);
        };
        if tree.tag(city) != NPP {
            return Ok(None);
        }
        match self.mention_at(city)? {
            Some(m) if m.parent == Some(mention.index) => {}
            _ => return Ok(None),
        }
        i += 1;

        // "Ho Chi Minh City (Saigon), Vietnam"
        if children.get(i).map_or(false, |&c| tree.tag(c) == PRN) {
            i += 1;
        }
        if !children.get(i).map_or(false, |&c| tree.tag(c) == COMMA) {
            return Ok(None);
        }
        i += 1;

        let Some(&state) = children.get(i) else {
            return Ok(None);
        };
        if tree.tag(state) != NPP {
            return Ok(None);
        }
        match self.mention_at(state)? {
            Some(m) if m.mention_type == MentionType::Name && m.entity_type.matches_gpe() => {}
            _ => return Ok(None),
        }
        if children.len() - i > 2 {
            return Ok(None);
        }
        Ok(Some(state))
    }

    /// Conjoined predicates become a compound predicate headed by the
    /// conjunction, one `<member>` clause per conjunct.
    fn vp_list(&mut self, node: SynId) -> SemTreeResult<Vec<NodeId>> {
        let tree = self.s.tree;
        let head = tree.children(node).iter().copied().find(|&c| tree.tag(c) == CC);
        let comp = self.opp(PredType::Comp, head, Some(node), Vec::new());

        let mut last_pred = None;
        for &child in tree.children(node) {
            let built = match tree.tag(child) {
                VB | VBZ | VBD | VBG | VBN => {
                    vec![self.opp(PredType::Verb, Some(child), Some(child), Vec::new())]
                }
                _ => self.subtree(child)?,
            };

            for mut item in built {
                if self.arena.node_type(item) == SemNodeType::Opp {
                    let syn = self.arena.syn(item);
                    item = self.branch(syn, vec![item]);
                }

                if self.arena.node_type(item) == SemNodeType::Branch {
                    let members = self.arena.children(item);
                    for candidate in [members.first(), members.last()].into_iter().flatten() {
                        if self.arena.node_type(*candidate) == SemNodeType::Opp {
                            last_pred = Some(*candidate);
                        }
                    }
                    let syn = self.arena.syn(item);
                    let member = self.link(Role::Member, None, syn, vec![item]);
                    self.arena.append_child(comp, member);
                } else if let Some(pred) = last_pred {
                    self.arena.append_child(pred, item);
                } else {
                    self.arena.append_child(comp, item);
                }
            }
        }
        Ok(vec![comp])
    }

    fn predicate(&mut self, node: SynId) -> SemTreeResult<Vec<NodeId>> {
        let tree = self.s.tree;
        let lang = self.lang;
        let mut negative = None;
        let mut particle = None;
        let mut adverb = None;

        let (pred_type, head) = match tree.tag(node) {
            VP => {
                // "to" vanishes, keeping any negative for what it governs.
                if head_word_in(tree, node, &["to"]) {
                    let children = self.children_of(node)?;
                    let negative = self.first_negative_child(node);
                    self.add_negative(&children, negative);
                    return Ok(children);
                }

                let head = tree.head(node);
                let pred_type = match head {
                    Some(h) if lang.is_copula(tree, h) => PredType::Copula,
                    _ => PredType::Verb,
                };
                for &child in tree.children(node) {
                    if negative.is_none() && lang.is_negative_adverb(tree, child) {
                        negative = Some(child);
                    } else if adverb.is_none() && lang.is_adverb(tree, child) {
                        adverb = Some(child);
                    }
                    if lang.is_particle(tree, child) {
                        particle = Some(child);
                    }
                }
                (pred_type, head)
            }
            ADJP => (PredType::Modifier, tree.head(node)),
            JJ | JJR | JJS | CD | VBN | VBG => (PredType::Modifier, Some(node)),
            PRP => return Ok(Vec::new()),
            _ => (PredType::Noun, Some(node)),
        };

        // "not happy": the negative sits just before the modifier.
        if pred_type == PredType::Modifier && negative.is_none() {
            negative = tree
                .prev_terminal(node)
                .filter(|&t| NEGATIVE_ADVERBS.iter().any(|w| w.eq_ignore_ascii_case(tree.tag(t))))
                .and_then(|t| tree.parent(t));
        }

        // A verb's own head word is not a modifier of it.
        let children = if tree.tag(node) == VP {
            let head_word = head.filter(|&h| tree.is_preterminal(h));
            self.children_except(node, head_word)?
        } else {
            self.children_of(node)?
        };
        if tree.tag(node) == ADJP {
            if let Some(rid_of) = self.rid_of(node, &children) {
                return Ok(rid_of);
            }
        }

        let opp = self.opp(pred_type, head, Some(node), children);
        if let Some(opp) = self.arena.as_opp_mut(opp) {
            opp.add_negative(negative);
            opp.add_particle(particle);
            opp.add_adverb(adverb);
        }
        Ok(vec![opp])
    }

    /// "get rid of X": the "of" link under "rid" becomes a `rid_of` link.
    fn rid_of(&mut self, node: SynId, children: &[NodeId]) -> Option<Vec<NodeId>> {
        if !head_word_in(self.s.tree, node, &["rid"]) {
            return None;
        }
        let (&rid, rest) = children.split_first()?;
        let is_rid = self
            .arena
            .as_opp(rid)
            .map_or(false, |o| o.head_symbol() == Some("rid"));
        let &link = rest.first()?;
        let is_of = self
            .arena
            .as_link(link)
            .map_or(false, |l| l.has_role(&Role::prep("of")));
        if !is_rid || !is_of {
            return None;
        }

        self.arena.set_syn(link, Some(node));
        if let Some(l) = self.arena.as_link_mut(link) {
            l.role = Some(Role::prep("rid_of"));
        }
        Some(rest.to_vec())
    }

    fn prepositional(&mut self, node: SynId) -> SemTreeResult<Vec<NodeId>> {
        let tree = self.s.tree;
        let conjoined = tree
            .children(node)
            .iter()
            .filter(|&&c| tree.tag(c) == PP)
            .count();
        if conjoined >= 2 {
            return self.children_of(node);
        }

        let head = tree.head(node);
        let children = self.children_of(node)?;
        let role = Role::prep(head.map_or("", |h| tree.head_word(h)));

        // A nested link merges with this one.
        if let [inner] = children[..] {
            if let Some(inner_link) = self.arena.as_link(inner).cloned() {
                if inner_link.has_role(&Role::Temp) {
                    let contents = self.arena.children(inner).to_vec();
                    let mut temporal = Link::new(Some(Role::Temp), Some(node));
                    temporal.quote = inner_link.quote;
                    let merged = self.arena.alloc(NodeKind::Link(temporal), Some(node), contents);
                    return Ok(vec![merged]);
                }

                let inner_role = inner_link.role.as_ref().map_or("", |r| r.as_str());
                let merged_role = Role::prep(&format!("{}_{}", role.as_str(), inner_role));
                self.arena.set_syn(inner, Some(node));
                if let Some(l) = self.arena.as_link_mut(inner) {
                    l.role = Some(merged_role);
                }
                return Ok(children);
            }
        }

        Ok(vec![self.link(role, head, Some(node), children)])
    }

    /// "a Boston -based company": the mention becomes an `<unknown>` argument
    /// of a modifier headed by the hyphenated word.
    fn apply_based_heuristic(&mut self, children: Vec<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(children.len());
        let mut i = 0;
        while i < children.len() {
            let child = children[i];
            let hyphenated = children.get(i + 1).copied().filter(|&next| {
                self.arena.as_opp(next).map_or(false, |o| {
                    o.head_symbol()
                        .map_or(false, |h| h.chars().count() > 3 && h.starts_with('-'))
                })
            });

            match hyphenated {
                Some(opp) if self.arena.node_type(child) == SemNodeType::Mention => {
                    let child_syn = self.arena.syn(child);
                    let opp_syn = self.arena.syn(opp);
                    let link = self.link(Role::Unknown, child_syn, child_syn, vec![child]);
                    out.push(self.opp(PredType::Modifier, opp_syn, opp_syn, vec![link]));
                    i += 2;
                }
                _ => {
                    out.push(child);
                    i += 1;
                }
            }
        }
        out
    }

    /// Sorts noun-phrase children into premodifiers, the head noun and
    /// postmodifiers ("IBM president Bob Smith"), then hangs them under
    /// `mention` in that order.
    fn apply_name_noun_name_heuristic(
        &mut self,
        mention: NodeId,
        children: Vec<NodeId>,
        contains_name: bool,
    ) -> SemTreeResult<()> {
        let config = self.s.config;
        let mut premods = Vec::new();
        let mut postmods = Vec::new();
        let mut premod_refs = Vec::new();
        let mut noun: Option<NodeId> = None;

        for child in children {
            self.arena.prune_out(child);
            if self.arena.is_reference(child) {
                premod_refs.push(child);
                continue;
            }
            match self.arena.pred_type(child) {
                Some(PredType::Noun) => {
                    if let Some(previous) = noun {
                        // Not the head noun after all.
                        let previous_mention = match self.arena.syn(previous) {
                            Some(syn) => self.mention_at(syn)?,
                            None => None,
                        };
                        match previous_mention {
                            Some(m)
                                if config.treat_nominal_premods_like_names
                                    && m.entity_type.is_recognized() =>
                            {
                                let syn = self.arena.syn(previous).unwrap_or(m.node);
                                premod_refs.push(self.mention_node(m, false, syn, vec![previous]));
                            }
                            _ => {
                                if let Some(opp) = self.arena.as_opp_mut(previous) {
                                    opp.pred_type = PredType::Modifier;
                                }
                                premods.push(previous);
                            }
                        }
                    }
                    noun = Some(child);
                }
                Some(PredType::Name) => {}
                _ if noun.is_none() => premods.push(child),
                _ => postmods.push(child),
            }
        }

        let mut premod_links = Vec::with_capacity(premod_refs.len());
        for reference in premod_refs {
            let syn = self.arena.syn(reference);
            premod_links.push(self.link(Role::Unknown, syn, syn, vec![reference]));
        }

        let noun_mention = match noun.and_then(|n| self.arena.syn(n)) {
            Some(syn) if config.use_nominal_premods && contains_name => self.mention_at(syn)?,
            _ => None,
        };

        let leading: Vec<NodeId> = premods.into_iter().chain(premod_links).chain(noun).collect();
        match noun_mention {
            Some(m) => {
                let syn = noun.and_then(|n| self.arena.syn(n)).unwrap_or(m.node);
                let nominal = self.mention_node(m, true, syn, leading);
                self.arena.append_child(mention, nominal);
            }
            None => {
                for node in leading {
                    self.arena.append_child(mention, node);
                }
            }
        }
        for node in postmods {
            self.arena.append_child(mention, node);
        }
        Ok(())
    }
}
