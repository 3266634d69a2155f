//! Entity mentions anchored on syntax nodes.

use crate::errors::{SyntaxError, SyntaxResult};
use crate::tree::{SynId, SynTree};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Position of a mention within its [`MentionSet`].
pub type MentionIndex = usize;

/// How a mention refers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MentionType {
    /// Not a referring expression (e.g. the NP wrapper around a name).
    None,
    Name,
    /// A name nested inside a larger name.
    Nest,
    Pron,
    Desc,
    /// Partitive ("some of the troops").
    Part,
    /// Appositive ("John, the mayor"); its members hang off `child`/`next`.
    Appo,
    List,
    Other,
}

impl MentionType {
    pub fn as_str(self) -> &'static str {
        match self {
            MentionType::None => "NONE",
            MentionType::Name => "NAME",
            MentionType::Nest => "NEST",
            MentionType::Pron => "PRON",
            MentionType::Desc => "DESC",
            MentionType::Part => "PART",
            MentionType::Appo => "APPO",
            MentionType::List => "LIST",
            MentionType::Other => "OTHER",
        }
    }
}

/// Entity category assigned by the mention tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Per,
    Org,
    Gpe,
    Loc,
    Fac,
    Veh,
    Wea,
    /// Time expressions.
    Timex,
    /// Not yet determined.
    Undet,
    Other,
}

impl EntityType {
    pub fn is_temporal(self) -> bool {
        self == EntityType::Timex
    }

    /// Any concrete entity category.
    pub fn is_recognized(self) -> bool {
        !matches!(self, EntityType::Undet | EntityType::Other)
    }

    pub fn matches_gpe(self) -> bool {
        self == EntityType::Gpe
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Per => "PER",
            EntityType::Org => "ORG",
            EntityType::Gpe => "GPE",
            EntityType::Loc => "LOC",
            EntityType::Fac => "FAC",
            EntityType::Veh => "VEH",
            EntityType::Wea => "WEA",
            EntityType::Timex => "TIMEX",
            EntityType::Undet => "UNDET",
            EntityType::Other => "OTH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub index: MentionIndex,
    pub node: SynId,
    pub mention_type: MentionType,
    pub entity_type: EntityType,
    /// Enclosing mention, e.g. the appositive or list this one belongs to.
    pub parent: Option<MentionIndex>,
    /// First member mention.
    pub child: Option<MentionIndex>,
    /// Next member of the same parent.
    pub next: Option<MentionIndex>,
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m{} ({}/{}): node {}",
            self.index,
            self.mention_type.as_str(),
            self.entity_type.as_str(),
            self.node
        )?;
        if let Some(parent) = self.parent {
            write!(f, "; parent = m{}", parent)?;
        }
        if let Some(child) = self.child {
            write!(f, "; child = m{}", child)?;
        }
        if let Some(next) = self.next {
            write!(f, "; next = m{}", next)?;
        }
        Ok(())
    }
}

/// All mentions of a sentence, at most one per syntax node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentionSet {
    mentions: Vec<Mention>,
    by_node: HashMap<SynId, MentionIndex>,
}

impl MentionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a mention to `node` and flag the node in `tree`.
    pub fn add(
        &mut self,
        tree: &mut SynTree,
        node: SynId,
        mention_type: MentionType,
        entity_type: EntityType,
    ) -> SyntaxResult<MentionIndex> {
        tree.try_node(node)?;
        if let Some(&existing) = self.by_node.get(&node) {
            return Err(SyntaxError::DuplicateMention { node, existing });
        }

        let index = self.mentions.len();
        self.mentions.push(Mention {
            index,
            node,
            mention_type,
            entity_type,
            parent: None,
            child: None,
            next: None,
        });
        self.by_node.insert(node, index);
        tree.mark_mention(node);
        Ok(index)
    }

    /// Register `members` as the ordered members of `parent`.
    pub fn set_members(
        &mut self,
        parent: MentionIndex,
        members: &[MentionIndex],
    ) -> SyntaxResult<()> {
        self.try_get(parent)?;
        for &member in members {
            self.try_get(member)?;
        }

        self.mentions[parent].child = members.first().copied();
        for (i, &member) in members.iter().enumerate() {
            let mention = &mut self.mentions[member];
            mention.parent = Some(parent);
            mention.next = members.get(i + 1).copied();
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    pub fn get(&self, index: MentionIndex) -> Option<&Mention> {
        self.mentions.get(index)
    }

    pub fn try_get(&self, index: MentionIndex) -> SyntaxResult<&Mention> {
        self.get(index).ok_or(SyntaxError::UnknownMention(index))
    }

    /// The mention anchored on exactly this node.
    pub fn by_node(&self, node: SynId) -> Option<&Mention> {
        self.by_node.get(&node).map(|&i| &self.mentions[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mention> {
        self.mentions.iter()
    }

    /// Members of an appositive or list, in order.
    pub fn members(&self, parent: MentionIndex) -> Vec<MentionIndex> {
        let mut out = Vec::new();
        let mut cursor = self.get(parent).and_then(|m| m.child);
        while let Some(index) = cursor {
            out.push(index);
            cursor = self.mentions[index].next;
        }
        out
    }
}
