use super::{NodeId, NodeKind, PhaseContext, SemArena, SemNodeType};
use crate::builder::SyntacticArgs;
use crate::errors::{SemTreeError, SemTreeResult};
use crate::proposition::{
    Argument, ArgumentValue, PredType, PropId, PropIdGenerator, Proposition, PropositionSet, Role,
};
use layered_syntax::{tags, MentionType, SynId, SynTree};

/// A one-place predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Opp {
    pub pred_type: PredType,
    pub head: Option<SynId>,
    /// Lowercased head word.
    pub head_symbol: Option<String>,
    pub satellites: Satellites,
    pub arg1: Option<NodeId>,
    pub arg2: Option<NodeId>,
    pub links: Vec<NodeId>,
    /// Built by `create_propositions`, taken by `list_propositions`.
    pub proposition: Option<Proposition>,
    pub proposition_id: Option<PropId>,
}

/// Negation, modal, particle and adverb of a predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Satellites {
    pub particle: Option<SynId>,
    pub adverb: Option<SynId>,
    pub negative: Option<SynId>,
    pub modal: Option<SynId>,
}

impl Satellites {
    /// Copies every satellite `other` has; the rest are kept.
    pub fn absorb(&mut self, other: Satellites) {
        self.particle = other.particle.or(self.particle);
        self.adverb = other.adverb.or(self.adverb);
        self.negative = other.negative.or(self.negative);
        self.modal = other.modal.or(self.modal);
    }
}

impl Opp {
    pub fn new(pred_type: PredType, head: Option<SynId>, tree: &SynTree) -> Self {
        Self {
            pred_type,
            head,
            head_symbol: head.map(|h| tree.head_word(h).to_lowercase()),
            satellites: Satellites::default(),
            arg1: None,
            arg2: None,
            links: Vec::new(),
            proposition: None,
            proposition_id: None,
        }
    }

    pub fn add_negative(&mut self, negative: Option<SynId>) {
        self.satellites.negative = negative.or(self.satellites.negative);
    }

    pub fn add_particle(&mut self, particle: Option<SynId>) {
        self.satellites.particle = particle.or(self.satellites.particle);
    }

    pub fn add_adverb(&mut self, adverb: Option<SynId>) {
        self.satellites.adverb = adverb.or(self.satellites.adverb);
    }

    pub fn add_modal(&mut self, modal: Option<SynId>) {
        self.satellites.modal = modal.or(self.satellites.modal);
    }

    pub fn head_symbol(&self) -> Option<&str> {
        self.head_symbol.as_deref()
    }
}

/// Places a referring or clausal child into the argument slots. A verb's
/// second object goes first: "gave [Mary] [a book]" makes the book `arg1`.
fn fill_arg_slot(
    slots: &mut (Option<NodeId>, Option<NodeId>),
    child: NodeId,
    pred_type: PredType,
    arg1_is_branch: bool,
) {
    match *slots {
        (None, _) => slots.0 = Some(child),
        (Some(_), None) if pred_type != PredType::Verb || arg1_is_branch => slots.1 = Some(child),
        (Some(first), None) => *slots = (Some(child), Some(first)),
        (Some(_), Some(_)) => {}
    }
}

impl SemArena {
    pub(super) fn simplify_opp(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        match self.pred_type(id) {
            Some(PredType::Copula) => self.simplify_copula(id, cx),
            Some(PredType::Verb) => self.simplify_verb(id, cx),
            _ => self.simplify_children(id, cx),
        }
    }

    /// A copula with nothing referring inside it ("was arrested", "is in
    /// Paris") goes away: its satellites move to the enclosed verb and its
    /// links become predicates of their own.
    fn simplify_copula(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        self.simplify_children(id, cx);

        let children = self.children(id).to_vec();
        if children.iter().any(|&c| self.is_reference(c)) {
            return;
        }

        let satellites = self.as_opp(id).map(|o| o.satellites).unwrap_or_default();
        let verb = children
            .iter()
            .copied()
            .find(|&c| matches!(self.pred_type(c), Some(PredType::Verb | PredType::Comp)));
        if let Some(opp) = verb.and_then(|v| self.as_opp_mut(v)) {
            opp.satellites.absorb(satellites);
        }

        self.convert_links_to_predicates(id, cx);
        self.replace_with_children(id);
    }

    /// Flattens verb clusters ("has been killed"): the outer verb hands its
    /// satellites and links to the nested predicate and disappears.
    fn simplify_verb(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        let tree = cx.tree();
        let children = self.children(id).to_vec();
        let head = self.as_opp(id).and_then(|o| o.head);
        let auxiliary = head.map_or(false, |h| cx.builder.can_be_auxiliary_verb(tree, h));

        let nested = children.iter().enumerate().find(|&(_, &c)| match self.pred_type(c) {
            Some(PredType::Verb | PredType::Comp) => true,
            Some(PredType::Copula) => auxiliary,
            _ => false,
        });
        let Some((pos, &nested)) = nested else {
            self.simplify_children(id, cx);
            return;
        };

        let satellites = self.as_opp(id).map(|o| o.satellites).unwrap_or_default();
        let modals: Vec<SynId> = match head {
            Some(h) if cx.builder.is_modal_verb(tree, h) => vec![h],
            _ => self
                .syn(id)
                .map(|syn| {
                    tree.children(syn)
                        .iter()
                        .copied()
                        .filter(|&c| tree.tag(c) == tags::MD)
                        .collect()
                })
                .unwrap_or_default(),
        };
        if let Some(opp) = self.as_opp_mut(nested) {
            opp.satellites.absorb(satellites);
            for modal in modals {
                opp.add_modal(Some(modal));
            }
        }

        let mut before = Vec::new();
        for (i, &child) in children.iter().enumerate() {
            if self.node_type(child) != SemNodeType::Link {
                continue;
            }
            if i < pos {
                before.push(child);
            } else {
                self.append_child(nested, child);
            }
        }
        for (offset, link) in before.into_iter().enumerate() {
            self.insert_child(nested, offset, link);
        }

        self.simplify_children(id, cx);
        self.replace_with_children(id);
    }

    /// Claims links into `links` and entity or clause children into the two
    /// argument slots. Slots are recomputed from scratch each time.
    pub(super) fn regularize_opp(&mut self, id: NodeId, cx: PhaseContext<'_>) {
        let Some(pred_type) = self.pred_type(id) else {
            return;
        };
        let max_links = cx.config().max_opp_links;
        let mut links = Vec::new();
        let mut slots = (None, None);

        for child in self.children(id).to_vec() {
            match self.node_type(child) {
                SemNodeType::Link if links.len() < max_links => links.push(child),
                SemNodeType::Link => {
                    log::warn!("predicate {} has more than {} links; ignoring {}", id, max_links, child);
                }
                _ if pred_type == PredType::Comp => {}
                SemNodeType::Mention | SemNodeType::Trace => {
                    let arg1_is_branch = self.is_branch_slot(slots.0);
                    fill_arg_slot(&mut slots, child, pred_type, arg1_is_branch);
                }
                SemNodeType::Branch
                    if cx.builder.ugly_branch_arg_heuristic(cx.tree(), self, id, child) =>
                {
                    let arg1_is_branch = self.is_branch_slot(slots.0);
                    fill_arg_slot(&mut slots, child, pred_type, arg1_is_branch);
                }
                _ => {}
            }
        }

        let claimed: Vec<NodeId> = links.iter().copied().chain(slots.0).chain(slots.1).collect();
        if let Some(opp) = self.as_opp_mut(id) {
            opp.arg1 = slots.0;
            opp.arg2 = slots.1;
            opp.links = links;
        }
        for slot in claimed {
            self.claim(slot);
        }
    }

    fn is_branch_slot(&self, slot: Option<NodeId>) -> bool {
        slot.map_or(false, |n| self.node_type(n) == SemNodeType::Branch)
    }

    /// Builds propositions bottom-up, so argument predicates have ids before
    /// the predicates that use them.
    pub fn create_propositions(
        &mut self,
        id: NodeId,
        cx: PhaseContext<'_>,
        ids: &mut PropIdGenerator,
    ) -> SemTreeResult<()> {
        for child in self.children(id).to_vec() {
            self.create_propositions(child, cx, ids)?;
        }
        if self.node_type(id) == SemNodeType::Opp {
            self.create_opp_proposition(id, cx, ids)?;
        }
        Ok(())
    }

    /// Moves finished propositions into `out`, children first.
    pub fn list_propositions(&mut self, id: NodeId, out: &mut PropositionSet) {
        for child in self.children(id).to_vec() {
            self.list_propositions(child, out);
        }
        if let Some(prop) = self.as_opp_mut(id).and_then(|o| o.proposition.take()) {
            out.take_proposition(prop);
        }
    }

    fn create_opp_proposition(
        &mut self,
        id: NodeId,
        cx: PhaseContext<'_>,
        ids: &mut PropIdGenerator,
    ) -> SemTreeResult<()> {
        let max_props = cx.config().max_sentence_props;
        if ids.used() >= max_props {
            log::warn!(
                "sentence reached {} propositions; no proposition for predicate {}",
                max_props,
                id
            );
            return Ok(());
        }

        let Some(opp) = self.as_opp(id) else {
            return Ok(());
        };
        let pred_type = opp.pred_type;
        let head = opp.head;
        let satellites = opp.satellites;
        let (arg1, arg2, links) = (opp.arg1, opp.arg2, opp.links.clone());

        let valid = |slot: Option<NodeId>| slot.filter(|&n| self.is_valid_argument(n, cx));
        let sargs = SyntacticArgs {
            subject: valid(self.find_syntactic_subject(id)),
            arg1: valid(arg1),
            arg2: valid(arg2),
            links: links
                .into_iter()
                .filter(|&l| self.is_valid_argument(l, cx))
                .collect(),
        };
        let mut largs = cx.builder.map_sargs_to_largs(cx.tree(), self, id, sargs);

        let accepted = match pred_type {
            PredType::Verb => {
                largs.core[0].is_some()
                    || largs.core[1].is_some()
                    || largs.links.iter().any(|&l| {
                        self.as_link(l)
                            .and_then(|l| l.role.as_ref())
                            .map_or(false, |r| r.is_prep("between"))
                    })
            }
            PredType::Copula => largs.core[0].is_some() && largs.core[1].is_some(),
            PredType::Noun | PredType::Modifier | PredType::Set => {
                // A referent alone; extra slots are dropped rather than
                // leaving arguments without roles.
                if largs.core[0].is_some() {
                    largs.core[1] = None;
                    largs.core[2] = None;
                    true
                } else {
                    false
                }
            }
            _ => largs.core[0].is_some() || !largs.links.is_empty(),
        };
        if !accepted {
            return Ok(());
        }

        let roles = if pred_type.is_verbal() {
            [Some(Role::Sub), Some(Role::Obj), Some(Role::Iobj)]
        } else {
            [Some(Role::Ref), None, None]
        };

        let mut prop = Proposition::new(ids.next_id(), pred_type, head);
        prop.particle = satellites.particle;
        prop.adverb = satellites.adverb;
        prop.negation = satellites.negative;
        prop.modal = satellites.modal;

        for (slot, role) in largs.core.into_iter().zip(roles) {
            if let Some(node) = slot {
                prop.args.push(Argument {
                    role,
                    value: self.argument_value(node, "core argument")?,
                });
            }
        }
        for link in largs.links {
            prop.args.push(self.link_argument(link)?);
        }

        if pred_type == PredType::Name {
            if prop.args.len() != 1 {
                log::warn!(
                    "name predicate {} has {} arguments besides its text",
                    id,
                    prop.args.len()
                );
            }
            if let Some(syn) = self.syn(id) {
                prop.args.push(Argument::text(None, syn));
            }
        }

        if let Some(opp) = self.as_opp_mut(id) {
            opp.proposition_id = Some(prop.id);
            opp.proposition = Some(prop);
        }
        Ok(())
    }

    /// The referring node above a predicate: its mention, or the subject of
    /// its clause. A compound predicate in between is skipped over.
    pub fn find_syntactic_subject(&self, id: NodeId) -> Option<NodeId> {
        if self.pred_type(id) == Some(PredType::Comp) {
            return None;
        }
        let mut parent = self.parent(id)?;
        if self.pred_type(parent) == Some(PredType::Comp) {
            parent = self.parent(parent)?;
        }
        match self.kind(parent) {
            NodeKind::Mention(_) | NodeKind::Trace(_) => Some(parent),
            NodeKind::Branch(branch) => branch.reference,
            _ => None,
        }
    }

    /// Whether a node can become a proposition argument: a reference to a
    /// real mention, or a clause or predicate that produced a proposition.
    pub fn is_valid_argument(&self, id: NodeId, cx: PhaseContext<'_>) -> bool {
        match self.kind(id) {
            NodeKind::Mention(_) | NodeKind::Trace(_) => self
                .reference_mention(id)
                .and_then(|m| cx.sentence.mentions.get(m))
                .map_or(false, |m| m.mention_type != MentionType::None),
            NodeKind::Branch(branch) => self.clause_proposition(branch.opp).is_some(),
            NodeKind::Opp(opp) => opp.proposition_id.is_some(),
            NodeKind::Link(link) if link.quote => link.object.is_some(),
            NodeKind::Link(link) => link
                .object
                .map_or(false, |object| self.is_valid_argument(object, cx)),
        }
    }

    fn clause_proposition(&self, opp: Option<NodeId>) -> Option<PropId> {
        opp.and_then(|o| self.as_opp(o)).and_then(|o| o.proposition_id)
    }

    fn argument_value(&self, id: NodeId, context: &'static str) -> SemTreeResult<ArgumentValue> {
        let value = match self.kind(id) {
            NodeKind::Mention(_) | NodeKind::Trace(_) => {
                self.reference_mention(id).map(ArgumentValue::Mention)
            }
            NodeKind::Opp(opp) => opp.proposition_id.map(ArgumentValue::Proposition),
            NodeKind::Branch(branch) => {
                self.clause_proposition(branch.opp).map(ArgumentValue::Proposition)
            }
            NodeKind::Link(_) => None,
        };
        value.ok_or_else(|| SemTreeError::UnrecognizedArgument {
            context,
            message: format!(
                "{:?} node {} has no mention or proposition",
                self.node_type(id),
                id
            ),
        })
    }

    fn link_argument(&self, id: NodeId) -> SemTreeResult<Argument> {
        let link = self.as_link(id).ok_or_else(|| SemTreeError::UnrecognizedArgument {
            context: "link argument",
            message: format!("{:?} node {} in a link slot", self.node_type(id), id),
        })?;
        let object = link.object.ok_or_else(|| SemTreeError::UnrecognizedArgument {
            context: "link argument",
            message: format!("link {} has no object", id),
        })?;

        if link.quote {
            let syn = self.syn(object).ok_or_else(|| SemTreeError::UnrecognizedArgument {
                context: "quote link",
                message: format!("object {} of link {} has no text", object, id),
            })?;
            return Ok(Argument::text(link.role.clone(), syn));
        }
        Ok(Argument {
            role: link.role.clone(),
            value: self.argument_value(object, "link object")?,
        })
    }
}
