//! Output model: propositions, their arguments, and the per-sentence set.

use layered_syntax::{MentionIndex, MentionSet, MentionType, SynId, SynTree};
use serde::Serialize;
use std::fmt::{self, Write};

/// Per-sentence proposition id.
pub type PropId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredType {
    Verb,
    Copula,
    Modifier,
    Noun,
    Poss,
    Loc,
    Set,
    Name,
    Pronoun,
    Comp,
}

impl PredType {
    pub fn as_str(self) -> &'static str {
        match self {
            PredType::Verb => "verb",
            PredType::Copula => "copula",
            PredType::Modifier => "modifier",
            PredType::Noun => "noun",
            PredType::Poss => "poss",
            PredType::Loc => "loc",
            PredType::Set => "set",
            PredType::Name => "name",
            PredType::Pronoun => "pronoun",
            PredType::Comp => "comp",
        }
    }

    /// Verb-like predicates take `<sub>`/`<obj>`/`<iobj>` roles.
    pub fn is_verbal(self) -> bool {
        matches!(self, PredType::Verb | PredType::Copula)
    }
}

impl fmt::Display for PredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argument role symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Ref,
    Sub,
    Obj,
    Iobj,
    Poss,
    Temp,
    Loc,
    Member,
    Unknown,
    /// A preposition or merged preposition pair (`of`, `out_of`, `rid_of`).
    Prep(String),
}

impl Role {
    /// Role named by a preposition word.
    pub fn prep(word: &str) -> Self {
        Role::Prep(word.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Ref => "<ref>",
            Role::Sub => "<sub>",
            Role::Obj => "<obj>",
            Role::Iobj => "<iobj>",
            Role::Poss => "<poss>",
            Role::Temp => "<temp>",
            Role::Loc => "<loc>",
            Role::Member => "<member>",
            Role::Unknown => "<unknown>",
            Role::Prep(word) => word,
        }
    }

    pub fn is_prep(&self, word: &str) -> bool {
        matches!(self, Role::Prep(p) if p == word)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArgumentValue {
    Mention(MentionIndex),
    Proposition(PropId),
    /// Literal text span covered by a syntax node.
    Text(SynId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub role: Option<Role>,
    pub value: ArgumentValue,
}

impl Argument {
    pub fn mention(role: Option<Role>, mention: MentionIndex) -> Self {
        Self {
            role,
            value: ArgumentValue::Mention(mention),
        }
    }

    pub fn proposition(role: Option<Role>, prop: PropId) -> Self {
        Self {
            role,
            value: ArgumentValue::Proposition(prop),
        }
    }

    pub fn text(role: Option<Role>, node: SynId) -> Self {
        Self {
            role,
            value: ArgumentValue::Text(node),
        }
    }

    pub fn mention_index(&self) -> Option<MentionIndex> {
        match self.value {
            ArgumentValue::Mention(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proposition {
    pub id: PropId,
    pub pred_type: PredType,
    pub head: Option<SynId>,
    pub particle: Option<SynId>,
    pub adverb: Option<SynId>,
    pub negation: Option<SynId>,
    pub modal: Option<SynId>,
    pub args: Vec<Argument>,
}

impl Proposition {
    pub fn new(id: PropId, pred_type: PredType, head: Option<SynId>) -> Self {
        Self {
            id,
            pred_type,
            head,
            particle: None,
            adverb: None,
            negation: None,
            modal: None,
            args: Vec::new(),
        }
    }

    pub fn pred_symbol<'t>(&self, tree: &'t SynTree) -> Option<&'t str> {
        self.head.map(|h| tree.head_word(h))
    }

    pub fn arg(&self, index: usize) -> Option<&Argument> {
        self.args.get(index)
    }

    pub fn mention_of_role(&self, role: &Role) -> Option<MentionIndex> {
        self.args
            .iter()
            .filter(|a| a.role.as_ref() == Some(role))
            .find_map(Argument::mention_index)
    }

    pub fn proposition_of_role(&self, role: &Role) -> Option<PropId> {
        self.args.iter().find_map(|a| match a.value {
            ArgumentValue::Proposition(p) if a.role.as_ref() == Some(role) => Some(p),
            _ => None,
        })
    }

    /// Role of a mention argument; members of a list argument share the
    /// list's role.
    pub fn role_of_mention(&self, mention: MentionIndex, mentions: &MentionSet) -> Option<&Role> {
        for arg in &self.args {
            let Some(index) = arg.mention_index() else {
                continue;
            };
            let is_list = mentions
                .get(index)
                .map_or(false, |m| m.mention_type == MentionType::List);
            if is_list {
                if mentions.members(index).contains(&mention) {
                    return arg.role.as_ref();
                }
            } else if index == mention {
                return arg.role.as_ref();
            }
        }
        None
    }

    /// Whether any argument refers to `mention` directly.
    pub fn mentions(&self, mention: MentionIndex) -> bool {
        self.args.iter().any(|a| a.mention_index() == Some(mention))
    }

    pub fn display<'a>(&'a self, tree: &'a SynTree) -> PropositionDisplay<'a> {
        PropositionDisplay { prop: self, tree }
    }
}

/// `p2 <verb>[<neg>:not] arrested(<sub>:m1, <obj>:m0)`
pub struct PropositionDisplay<'a> {
    prop: &'a Proposition,
    tree: &'a SynTree,
}

impl<'a> fmt::Display for PropositionDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prop = self.prop;
        let tree = self.tree;
        write!(f, "p{} <{}>", prop.id, prop.pred_type)?;

        let satellites = [
            ("<particle>", prop.particle),
            ("<adverb>", prop.adverb),
            ("<neg>", prop.negation),
            ("<modal>", prop.modal),
        ];
        for (label, node) in satellites {
            if let Some(node) = node {
                write!(f, "[{}:{}]", label, tree.head_word(node))?;
            }
        }

        if let Some(head) = prop.pred_symbol(tree) {
            write!(f, " {}", head)?;
        }

        f.write_char('(')?;
        for (i, arg) in prop.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if let Some(role) = &arg.role {
                write!(f, "{}:", role)?;
            }
            match arg.value {
                ArgumentValue::Mention(m) => write!(f, "m{}", m)?,
                ArgumentValue::Proposition(p) => write!(f, "p{}", p)?,
                ArgumentValue::Text(node) => write!(f, "{:?}", tree.text(node))?,
            }
        }
        f.write_char(')')
    }
}

/// Hands out proposition ids for one sentence.
#[derive(Debug, Default)]
pub struct PropIdGenerator {
    next: PropId,
}

impl PropIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> PropId {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn used(&self) -> usize {
        self.next
    }
}

/// Propositions of one sentence in emission order.
#[derive(Debug, Clone, Serialize)]
pub struct PropositionSet {
    props: Vec<Proposition>,
    #[serde(skip)]
    max_props: usize,
}

impl PropositionSet {
    pub fn new(max_props: usize) -> Self {
        Self {
            props: Vec::new(),
            max_props,
        }
    }

    /// Adds a proposition unless the sentence ceiling is reached.
    pub fn take_proposition(&mut self, prop: Proposition) -> bool {
        if self.props.len() < self.max_props {
            self.props.push(prop);
            true
        } else {
            log::warn!(
                "Number of propositions in sentence exceeds limit of {}",
                self.max_props
            );
            false
        }
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Proposition> {
        self.props.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposition> {
        self.props.iter()
    }

    pub fn find_by_id(&self, id: PropId) -> Option<&Proposition> {
        self.props.iter().find(|p| p.id == id)
    }

    /// Proposition headed by `node`, falling back to one sharing its head
    /// preterminal.
    pub fn find_by_head(&self, tree: &SynTree, node: SynId) -> Option<&Proposition> {
        self.props
            .iter()
            .find(|p| p.head == Some(node))
            .or_else(|| {
                let preterm = tree.head_preterminal(node);
                self.props
                    .iter()
                    .find(|p| p.head.map(|h| tree.head_preterminal(h)) == Some(preterm))
            })
    }

    /// The proposition that defines a mention: a noun, pronoun or set
    /// (last wins), else the first name, else the first modifier with extra
    /// arguments, else the first modifier.
    pub fn definition(&self, mention: MentionIndex) -> Option<&Proposition> {
        let refers = |p: &&Proposition| {
            p.arg(0).and_then(Argument::mention_index) == Some(mention)
        };

        self.props
            .iter()
            .filter(refers)
            .filter(|p| matches!(p.pred_type, PredType::Noun | PredType::Pronoun | PredType::Set))
            .last()
            .or_else(|| {
                self.props
                    .iter()
                    .filter(refers)
                    .find(|p| p.pred_type == PredType::Name)
            })
            .or_else(|| {
                self.props
                    .iter()
                    .filter(refers)
                    .find(|p| p.pred_type == PredType::Modifier && p.args.len() > 1)
            })
            .or_else(|| {
                self.props
                    .iter()
                    .filter(refers)
                    .find(|p| p.pred_type == PredType::Modifier)
            })
    }

    /// One proposition per line.
    pub fn display(&self, tree: &SynTree) -> String {
        self.props
            .iter()
            .map(|p| p.display(tree).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_syntax::{read_tree, EntityType};

    fn noun(id: PropId, mention: MentionIndex) -> Proposition {
        let mut prop = Proposition::new(id, PredType::Noun, None);
        prop.args.push(Argument::mention(Some(Role::Ref), mention));
        prop
    }

    #[test]
    fn test_display_with_satellites() {
        let tree = read_tree(
            "(S (NP (NNP John)) (VP (VBD was) (RB not) (VP (VBN arrested))))",
        )
        .unwrap();
        let mut prop = Proposition::new(3, PredType::Verb, tree.find("VBN", "arrested"));
        prop.negation = tree.find("RB", "not");
        prop.args.push(Argument::mention(Some(Role::Obj), 0));
        prop.args.push(Argument::text(None, tree.find("NP", "John").unwrap()));

        insta::assert_snapshot!(
            prop.display(&tree).to_string(),
            @r###"p3 <verb>[<neg>:not] arrested(<obj>:m0, "John")"###
        );
        assert_eq!(prop.pred_symbol(&tree), Some("arrested"));
    }

    #[test]
    fn test_role_lookups() {
        let mut prop = Proposition::new(0, PredType::Verb, None);
        prop.args.push(Argument::mention(Some(Role::Sub), 4));
        prop.args.push(Argument::proposition(Some(Role::Obj), 7));
        prop.args.push(Argument::mention(Some(Role::prep("By")), 5));

        assert_eq!(prop.mention_of_role(&Role::Sub), Some(4));
        assert_eq!(prop.mention_of_role(&Role::Obj), None);
        assert_eq!(prop.proposition_of_role(&Role::Obj), Some(7));
        assert_eq!(prop.mention_of_role(&Role::Prep("by".into())), Some(5));
    }

    #[test]
    fn test_role_of_list_member() {
        let mut tree = read_tree(
            "(NP (NPP (NNP John)) (CC and) (NPP (NNP Mary)))",
        )
        .unwrap();
        let root = tree.root();
        let john = tree.find("NPP", "John").unwrap();
        let mary = tree.find("NPP", "Mary").unwrap();
        let mut mentions = MentionSet::new();
        let list = mentions.add(&mut tree, root, MentionType::List, EntityType::Per).unwrap();
        let a = mentions.add(&mut tree, john, MentionType::Name, EntityType::Per).unwrap();
        let b = mentions.add(&mut tree, mary, MentionType::Name, EntityType::Per).unwrap();
        mentions.set_members(list, &[a, b]).unwrap();

        let mut prop = Proposition::new(0, PredType::Verb, None);
        prop.args.push(Argument::mention(Some(Role::Sub), list));

        assert_eq!(prop.role_of_mention(b, &mentions), Some(&Role::Sub));
        assert_eq!(prop.role_of_mention(list, &mentions), None);
    }

    #[test]
    fn test_ceiling_drops_excess() {
        let mut set = PropositionSet::new(2);
        assert!(set.take_proposition(noun(0, 0)));
        assert!(set.take_proposition(noun(1, 1)));
        assert!(!set.take_proposition(noun(2, 2)));
        assert_eq!(set.len(), 2);
        assert!(set.find_by_id(2).is_none());
    }

    #[test]
    fn test_definition_priority() {
        let mut set = PropositionSet::new(10);

        let mut modifier = Proposition::new(0, PredType::Modifier, None);
        modifier.args.push(Argument::mention(Some(Role::Ref), 0));
        set.take_proposition(modifier);

        let mut name = Proposition::new(1, PredType::Name, None);
        name.args.push(Argument::mention(Some(Role::Ref), 0));
        set.take_proposition(name);

        assert_eq!(set.definition(0).map(|p| p.id), Some(1));

        set.take_proposition(noun(2, 0));
        set.take_proposition(noun(3, 0));
        assert_eq!(set.definition(0).map(|p| p.id), Some(3));
        assert!(set.definition(1).is_none());
    }
}
