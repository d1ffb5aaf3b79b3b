//! Error-tolerant parser from tokens to a [`SyntaxTree`].
//!
//! The grammar is `QueryList → Query → condition (space condition)*` with
//! three condition variants (`field:predicate`, `-field:predicate`,
//! `!field:predicate`) and predicates that are values, regexes, or command
//! calls. Newlines and comments are trivia everywhere; spaces and tabs only
//! separate conditions, so a space directly after `:` ends the condition
//! with its predicate missing.
//!
//! Parsing never fails. Input that does not fit the grammar is wrapped in
//! `Error` nodes in place, and a missing `:` or predicate leaves a
//! zero-width `Error` marker inside the condition, so diagnostics can point
//! at the gap.

use crate::syntax::lexer::{lex, Token, TokenKind};
use crate::syntax::tree::{NodeId, NodeKind, SyntaxTree, TextRange};

/// Parses a document into a concrete syntax tree.
///
/// The returned tree always has a `QueryList` root spanning the whole
/// document. Malformed input produces `Error` nodes instead of a failure;
/// re-parse after every edit to get a fresh snapshot.
///
/// # Arguments
///
/// * `doc` - The query text to parse
///
/// # Returns
///
/// The syntax tree over `doc`
///
/// # Examples
///
/// ```
/// use dequel_core::syntax::{parse, NodeKind};
///
/// let tree = parse("-title:foo status:open");
/// let query = tree.child_of_kind(tree.root(), NodeKind::Query).unwrap();
/// assert_eq!(tree.children(query).len(), 2);
/// ```
#[must_use]
pub fn parse(doc: &str) -> SyntaxTree {
    Builder {
        tokens: lex(doc),
        pos: 0,
        tree: SyntaxTree::new(doc.len()),
    }
    .run()
}

struct Builder {
    tokens: Vec<Token>,
    pos: usize,
    tree: SyntaxTree,
}

impl Builder {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Advances past newlines and comments, which are trivia everywhere.
    fn skip_trivia(&mut self) {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Newline | TokenKind::Comment => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Advances past trivia and condition-separating spaces.
    fn skip_trivia_and_space(&mut self) {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Newline | TokenKind::Comment | TokenKind::Space => self.pos += 1,
                _ => break,
            }
        }
    }

    fn run(mut self) -> SyntaxTree {
        let root = self.tree.root();
        let mut query: Option<NodeId> = None;
        loop {
            self.skip_trivia_and_space();
            let Some(token) = self.peek() else { break };
            match token.kind {
                TokenKind::Dash | TokenKind::Bang | TokenKind::Ident => {
                    let parent = *query.get_or_insert_with(|| {
                        self.tree.push(
                            NodeKind::Query,
                            TextRange::new(token.range.from, token.range.from),
                            root,
                        )
                    });
                    let end = self.condition(parent, token);
                    self.tree.extend_to(parent, end);
                }
                _ => {
                    // Stray content: one error node per token. Before any
                    // condition has opened a query it hangs off the root.
                    self.pos += 1;
                    let parent = query.unwrap_or(root);
                    self.tree.push(NodeKind::Error, token.range, parent);
                    self.tree.extend_to(parent, token.range.to);
                }
            }
        }
        self.tree
    }

    /// Parses one condition starting at `first`, attaching it under
    /// `parent`. Returns the end offset of what was consumed.
    fn condition(&mut self, parent: NodeId, first: Token) -> usize {
        let kind = match first.kind {
            TokenKind::Dash => NodeKind::ExcludeCondition,
            TokenKind::Bang => NodeKind::IgnoredCondition,
            _ => NodeKind::Condition,
        };
        if kind != NodeKind::Condition {
            self.pos += 1;
            // The field has to sit right against its prefix.
            if self.peek().map(|t| t.kind) != Some(TokenKind::Ident) {
                self.tree.push(NodeKind::Error, first.range, parent);
                return first.range.to;
            }
        }
        let condition = self.tree.push(
            kind,
            TextRange::new(first.range.from, first.range.from),
            parent,
        );
        let mut end = first.range.to;
        if let Some(field) = self.bump() {
            self.tree.push(NodeKind::Field, field.range, condition);
            end = field.range.to;
        }

        self.skip_trivia();
        match self.peek() {
            Some(colon) if colon.kind == TokenKind::Colon => {
                self.pos += 1;
                self.tree.push(NodeKind::Colon, colon.range, condition);
                end = colon.range.to;
                end = self.predicate(condition, end);
            }
            next => {
                // Missing ':'. When the next token is unknown text the
                // error node wrapping it carries the diagnostic instead.
                if next.map(|t| t.kind) != Some(TokenKind::Unknown) {
                    self.tree
                        .push(NodeKind::Error, TextRange::new(end, end), condition);
                }
            }
        }
        self.tree.extend_to(condition, end);
        end
    }

    /// Parses the predicate after a `:`. Returns the new end offset, which
    /// stays at the colon's end when the predicate is missing.
    fn predicate(&mut self, condition: NodeId, colon_end: usize) -> usize {
        self.skip_trivia();
        match self.peek() {
            Some(token) if token.kind == TokenKind::Regex => {
                self.pos += 1;
                let predicate = self.tree.push(NodeKind::Predicate, token.range, condition);
                self.tree.push(NodeKind::Regex, token.range, predicate);
                token.range.to
            }
            Some(token) if matches!(token.kind, TokenKind::Number | TokenKind::Str) => {
                self.pos += 1;
                let predicate = self.tree.push(NodeKind::Predicate, token.range, condition);
                let value = self.tree.push(NodeKind::Value, token.range, predicate);
                self.tree.push(leaf_kind(token.kind), token.range, value);
                token.range.to
            }
            Some(token) if token.kind == TokenKind::Ident => {
                self.pos += 1;
                let opens_call = self
                    .peek()
                    .is_some_and(|t| t.kind == TokenKind::LParen && t.range.from == token.range.to);
                if opens_call {
                    self.command(condition, token)
                } else {
                    let predicate = self.tree.push(NodeKind::Predicate, token.range, condition);
                    let value = self.tree.push(NodeKind::Value, token.range, predicate);
                    self.tree.push(NodeKind::Identifier, token.range, value);
                    token.range.to
                }
            }
            next => {
                // Missing predicate, unless unknown text follows and gets
                // its own error node at the top level.
                if next.map(|t| t.kind) != Some(TokenKind::Unknown) {
                    self.tree.push(
                        NodeKind::Error,
                        TextRange::new(colon_end, colon_end),
                        condition,
                    );
                }
                colon_end
            }
        }
    }

    /// Parses `name(arg, ...)` where `name` has already been consumed and
    /// the `(` is known to follow it directly.
    fn command(&mut self, condition: NodeId, name: Token) -> usize {
        let predicate = self.tree.push(
            NodeKind::Predicate,
            TextRange::new(name.range.from, name.range.from),
            condition,
        );
        let command = self.tree.push(
            NodeKind::Command,
            TextRange::new(name.range.from, name.range.from),
            predicate,
        );
        self.tree.push(NodeKind::Identifier, name.range, command);
        let mut end = name.range.to;
        if let Some(paren) = self.bump() {
            end = paren.range.to;
        }
        loop {
            self.skip_trivia_and_space();
            match self.peek() {
                None => {
                    // The closing ')' never came.
                    self.tree
                        .push(NodeKind::Error, TextRange::new(end, end), command);
                    break;
                }
                Some(token) if token.kind == TokenKind::RParen => {
                    self.pos += 1;
                    end = token.range.to;
                    break;
                }
                Some(token)
                    if matches!(
                        token.kind,
                        TokenKind::Ident | TokenKind::Number | TokenKind::Str
                    ) =>
                {
                    self.pos += 1;
                    let argument = self.tree.push(NodeKind::Argument, token.range, command);
                    self.tree.push(leaf_kind(token.kind), token.range, argument);
                    end = token.range.to;
                }
                Some(token) if token.kind == TokenKind::Comma => {
                    self.pos += 1;
                    end = token.range.to;
                }
                Some(token) => {
                    self.pos += 1;
                    self.tree.push(NodeKind::Error, token.range, command);
                    end = token.range.to;
                }
            }
        }
        self.tree.extend_to(command, end);
        self.tree.extend_to(predicate, end);
        end
    }
}

fn leaf_kind(kind: TokenKind) -> NodeKind {
    match kind {
        TokenKind::Number => NodeKind::Number,
        TokenKind::Str => NodeKind::String,
        _ => NodeKind::Identifier,
    }
}
