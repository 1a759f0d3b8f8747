//! Newick reader and writer for binary trees.
//!
//! Grammar accepted by [`parse_newick`]:
//! * `tree ::= vertex [';']`
//! * `vertex ::= leaf | '(' vertex ',' vertex ')' [label]`
//! * `leaf ::= label [':' branch_length]`
//!
//! Branch lengths and inner node labels are read and dropped, `[...]`
//! comments are skipped. Node 0 is always the root.

use crate::tree::{Node, Tree, TreeSet, NONE};
use crate::TerraceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Comma,
    End,
    Label(&'a str),
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn advance(&mut self, bytes: usize) {
        self.line += self.input[self.pos..self.pos + bytes].matches('\n').count();
        self.pos += bytes;
    }

    fn skip_trivia(&mut self) -> Result<(), TerraceError> {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.advance(rest.len() - trimmed.len());
            if !trimmed.starts_with('[') {
                return Ok(());
            }
            match trimmed.find(']') {
                Some(end) => self.advance(end + 1),
                None => return Err(TerraceError::parse(self.line, "unterminated comment")),
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, TerraceError> {
        self.skip_trivia()?;
        let rest = self.rest();
        let Some(first) = rest.chars().next() else {
            return Ok(None);
        };
        let token = match first {
            '(' => Token::Open,
            ')' => Token::Close,
            ',' => Token::Comma,
            ';' => Token::End,
            _ => {
                let end = rest
                    .find(|c: char| matches!(c, '(' | ')' | ',' | ';' | '[' | '\n'))
                    .unwrap_or(rest.len());
                let raw = &rest[..end];
                self.advance(end);
                let label = raw.split(':').next().unwrap_or_default().trim();
                return Ok(Some(Token::Label(label)));
            }
        };
        self.advance(1);
        Ok(Some(token))
    }
}

/// Parse a rooted binary tree with named leaves.
///
/// Fails on non-binary nodes, unbalanced parentheses, unnamed or duplicate
/// leaves and text after the terminating `;`.
pub fn parse_newick(input: &str) -> Result<TreeSet, TerraceError> {
    let mut lexer = Lexer::new(input);
    let mut nodes = vec![Node::detached()];
    let mut names = vec![String::new()];
    // (parent, self) of the node being read, and of its open ancestors
    let mut state = (NONE, 0usize);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    while let Some(token) = lexer.next_token()? {
        let line = lexer.line;
        match token {
            Token::Open => {
                let parent = state.1;
                if !names[parent].is_empty() {
                    return Err(TerraceError::parse(
                        line,
                        "inner node labels must follow their children",
                    ));
                }
                let child = nodes.len();
                stack.push(state);
                state = (parent, child);
                nodes.push(Node::leaf(parent));
                names.push(String::new());
                nodes[parent].left = child;
            }
            Token::Comma => {
                let parent = state.0;
                if parent == NONE {
                    return Err(TerraceError::parse(line, "separator outside parentheses"));
                }
                if nodes[parent].right != NONE {
                    return Err(TerraceError::parse(line, "input tree is not binary"));
                }
                let child = nodes.len();
                state.1 = child;
                nodes.push(Node::leaf(parent));
                names.push(String::new());
                nodes[parent].right = child;
            }
            Token::Close => {
                state = stack
                    .pop()
                    .ok_or_else(|| TerraceError::parse(line, "mismatched parenthesis"))?;
                if nodes[state.1].right == NONE {
                    return Err(TerraceError::parse(line, "inner node with a single child"));
                }
            }
            Token::Label(label) => {
                if nodes[state.1].is_leaf() && !label.is_empty() {
                    names[state.1] = label.to_string();
                }
            }
            Token::End => {
                lexer.skip_trivia()?;
                if !lexer.rest().is_empty() {
                    return Err(TerraceError::parse(lexer.line, "text after the terminating ';'"));
                }
                break;
            }
        }
    }
    if !stack.is_empty() {
        return Err(TerraceError::parse(lexer.line, "parentheses left unclosed"));
    }

    let tree = Tree::from_nodes(nodes);
    let mut seen = std::collections::HashSet::new();
    for leaf in tree.leaves() {
        let name = &names[leaf];
        if name.is_empty() {
            return Err(TerraceError::bad_input(format!("leaf {leaf} has no name")));
        }
        if !seen.insert(name.as_str()) {
            return Err(TerraceError::bad_input(format!("duplicate leaf name {name}")));
        }
    }
    tree.validate()?;
    Ok(TreeSet::new(tree, names))
}

/// Newick text for `tree`, naming node `i` by `names[i]` (or `i` itself if
/// the name is missing).
pub fn write_newick(tree: &Tree, names: &[String]) -> String {
    let mut out = String::new();
    if !tree.is_empty() {
        write_node(tree, names, 0, &mut out);
    }
    out.push(';');
    out
}

fn write_node(tree: &Tree, names: &[String], node: usize, out: &mut String) {
    if tree.is_leaf(node) {
        match names.get(node).filter(|name| !name.is_empty()) {
            Some(name) => out.push_str(name),
            None => out.push_str(&node.to_string()),
        }
        return;
    }
    out.push('(');
    write_node(tree, names, tree[node].left, out);
    out.push(',');
    write_node(tree, names, tree[node].right, out);
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_binary_trees() {
        let set = parse_newick("((a,b),(c,d));").unwrap();
        assert_eq!(set.tree.len(), 7);
        assert_eq!(set.leaf_count(), 4);
        assert_eq!(set.indices["a"], 2);
        assert_eq!(set.indices["d"], 6);
        assert!(set.tree.is_root(0));
        assert_eq!(write_newick(&set.tree, &set.names), "((a,b),(c,d));");
    }

    #[test]
    fn drops_branch_lengths_labels_and_comments() {
        let set = parse_newick("((a:0.1, b:2)x:1.5,\n [note] c)root;\n").unwrap();
        assert_eq!(set.leaf_count(), 3);
        assert_eq!(write_newick(&set.tree, &set.names), "((a,b),c);");
    }

    #[test]
    fn single_leaf_tree() {
        let set = parse_newick("solo;").unwrap();
        assert_eq!(set.tree.len(), 1);
        assert_eq!(set.indices["solo"], 0);
    }

    #[test]
    fn rejects_malformed_trees() {
        assert!(matches!(
            parse_newick("(a,b,c);"),
            Err(TerraceError::Parse { .. })
        ));
        assert!(parse_newick("((a,b);").is_err());
        assert!(parse_newick("(a,b));").is_err());
        assert!(parse_newick("((a),b);").is_err());
        assert!(parse_newick("(a,a);").is_err());
        assert!(parse_newick("(a,);").is_err());
        assert!(parse_newick("(a,b); (c,d);").is_err());
    }

    #[test]
    fn reports_the_line_of_an_error() {
        match parse_newick("((a,b),\n(c,d,e));") {
            Err(TerraceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
