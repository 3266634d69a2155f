use super::{NodeId, NodeKind, SemArena};
use layered_syntax::SynTree;
use std::fmt::{self, Write};

const INDENT: usize = 2;

/// Indented dump of a sem tree, one node per line under the sentence text.
/// Nodes no slot has claimed are wrapped in parentheses.
///
/// ```text
/// John has been killed
/// (Branch)
///   Mention m0 "John"
///     OPP <name> "John"
///   OPP <verb> killed
/// ```
pub struct SemTreeDisplay<'a> {
    arena: &'a SemArena,
    root: NodeId,
    tree: &'a SynTree,
}

impl<'a> SemTreeDisplay<'a> {
    pub fn new(arena: &'a SemArena, root: NodeId, tree: &'a SynTree) -> Self {
        SemTreeDisplay { arena, root, tree }
    }

    fn label(&self, id: NodeId) -> Result<String, fmt::Error> {
        let tree = self.tree;
        let node = self.arena.node(id);
        let mut out = String::new();
        match node.kind() {
            NodeKind::Branch(_) => out.push_str("Branch"),
            NodeKind::Opp(opp) => {
                write!(&mut out, "OPP <{}>", opp.pred_type)?;
                let s = &opp.satellites;
                for (name, sat) in [
                    ("<particle>", s.particle),
                    ("<adverb>", s.adverb),
                    ("<neg>", s.negative),
                    ("<modal>", s.modal),
                ] {
                    if let Some(sat) = sat {
                        write!(&mut out, "[{}:{}]", name, tree.head_word(sat))?;
                    }
                }
                match (opp.head, node.syn()) {
                    (Some(head), _) => write!(&mut out, " {}", tree.head_word(head))?,
                    (None, Some(syn)) => write!(&mut out, " {:?}", tree.text(syn))?,
                    (None, None) => {}
                }
            }
            NodeKind::Link(link) => {
                out.push_str("Link ");
                out.push_str(link.role.as_ref().map_or("-", |r| r.as_str()));
                if link.quote {
                    out.push_str(" quote");
                }
            }
            NodeKind::Mention(mention) => {
                write!(&mut out, "Mention m{}", mention.mention)?;
                if let Some(syn) = node.syn() {
                    write!(&mut out, " {:?}", tree.text(syn))?;
                }
            }
            NodeKind::Trace(_) => match self.arena.reference_mention(id) {
                Some(m) => write!(&mut out, "Trace -> m{}", m)?,
                None => out.push_str("Trace -> ?"),
            },
        }
        if node.is_tangential() {
            out = format!("({})", out);
        }
        Ok(out)
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        f.write_char('\n')?;
        for _ in 0..depth * INDENT {
            f.write_char(' ')?;
        }
        f.write_str(&self.label(id)?)?;
        for &child in self.arena.children(id) {
            self.write_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for SemTreeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tree.text(self.tree.root()))?;
        self.write_node(f, self.root, 0)
    }
}
