//! Reader for Penn-style bracketed parses.
//!
//! `(S (NP (NNP John)) (VP (VBD left)))` reads as a tree whose preterminals
//! are `NNP` and `VBD`. A bare word inside a constituent becomes a terminal.

use crate::errors::{SyntaxError, SyntaxResult};
use crate::tree::{RawNode, SynTree};

/// Parse a single bracketed tree.
pub fn read_tree(input: &str) -> SyntaxResult<SynTree> {
    let mut reader = Reader {
        input,
        pos: 0,
    };
    reader.skip_whitespace();
    let raw = reader.read_constituent()?;
    reader.skip_whitespace();
    if reader.pos < input.len() {
        return Err(reader.error("trailing input after tree"));
    }
    Ok(SynTree::from_raw(raw))
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn error(&self, message: &str) -> SyntaxError {
        SyntaxError::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// A run of characters up to whitespace or a bracket.
    fn read_atom(&mut self) -> SyntaxResult<&'a str> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '(' && c != ')') {
            self.bump();
        }
        if self.pos == start {
            return Err(self.error("expected a tag or word"));
        }
        Ok(&self.input[start..self.pos])
    }

    fn read_constituent(&mut self) -> SyntaxResult<RawNode> {
        match self.bump() {
            Some('(') => {}
            Some(_) => return Err(self.error("expected '('")),
            None => return Err(self.error("empty input")),
        }
        self.skip_whitespace();
        let tag = self.read_atom()?;

        let mut children = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(')') => {
                    self.bump();
                    break;
                }
                Some('(') => children.push(self.read_constituent()?),
                Some(_) => children.push(RawNode::leaf(self.read_atom()?)),
                None => return Err(self.error("unclosed constituent: expected ')'")),
            }
        }

        if children.is_empty() {
            return Err(self.error("constituent has no children"));
        }
        Ok(RawNode::branch(tag, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_bracketing() {
        let text = "(S (NP (NNP John)) (VP (VBD was) (VP (VBN arrested) (PP (IN by) (NP (NN police))))))";
        let tree = read_tree(text).unwrap();
        assert_eq!(tree.to_bracketed(tree.root()), text);
        assert_eq!(tree.text(tree.root()), "John was arrested by police");
    }

    #[test]
    fn test_punctuation_tags() {
        let tree = read_tree("(S (NP (PRP it)) (VP (VBZ is)) (. .))").unwrap();
        let period = tree.find(".", ".").unwrap();
        assert!(tree.is_preterminal(period));
    }

    #[test]
    fn test_errors() {
        insta::assert_snapshot!(
            read_tree("(S (NP (NNP John))").unwrap_err().to_string(),
            @"parse error at byte 18: unclosed constituent: expected ')'"
        );
        insta::assert_snapshot!(
            read_tree("(S ())").unwrap_err().to_string(),
            @"parse error at byte 4: expected a tag or word"
        );
        insta::assert_snapshot!(
            read_tree("(NN dog) extra").unwrap_err().to_string(),
            @"parse error at byte 9: trailing input after tree"
        );
    }
}
