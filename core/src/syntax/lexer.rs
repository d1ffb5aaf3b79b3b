//! Spanned tokenizer for the query language.
//!
//! Tokens carry byte ranges into the source text; the parser stitches them
//! into a [`SyntaxTree`](crate::syntax::SyntaxTree). Lexing never fails:
//! input that matches no rule becomes [`TokenKind::Unknown`] and is later
//! wrapped in an `Error` node by the parser.

use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::char,
    combinator::{opt, recognize},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use crate::syntax::tree::TextRange;

// ============================================================================
// Token model
// ============================================================================

/// Kinds of tokens the lexer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifier, possibly dot-chained, possibly with one trailing dot.
    Ident,
    /// Run of ASCII digits.
    Number,
    /// Double-quoted string.
    Str,
    /// `/…/flags` regular expression.
    Regex,
    /// The `:` separator.
    Colon,
    /// The `-` condition prefix.
    Dash,
    /// The `!` condition prefix.
    Bang,
    LParen,
    RParen,
    Comma,
    /// Run of spaces and tabs.
    Space,
    Newline,
    /// `#` to end of line.
    Comment,
    /// Anything that matches no other rule, including unterminated strings
    /// and regexes.
    Unknown,
}

/// One token with its byte range in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) range: TextRange,
}

// ============================================================================
// Recognizers
// ============================================================================

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// `[a-zA-Z_]+ ("." [a-zA-Z_]+)* "."?` — the trailing dot keeps an
/// in-progress relationship path (`author.`) in a single token.
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize((
        take_while1(is_ident_char),
        many0(preceded(char('.'), take_while1(is_ident_char))),
        opt(char('.')),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit()).parse(input)
}

/// `"…"` with no escapes; the body may span newlines. Fails when the
/// closing quote is missing.
fn string(input: &str) -> IResult<&str, &str> {
    recognize(delimited(char('"'), take_till(|c| c == '"'), char('"'))).parse(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(preceded(char('#'), take_till(|c| c == '\n'))).parse(input)
}

fn space(input: &str) -> IResult<&str, &str> {
    take_while1(|c| c == ' ' || c == '\t').parse(input)
}

/// Scans `/body/flags` starting at an opening slash, where `\/` escapes a
/// slash inside the body and flags are trailing ASCII letters. Returns the
/// token's byte length, or `None` when no closing slash follows.
fn scan_regex(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'/') => i += 2,
            b'/' => {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                return Some(i);
            }
            _ => i += 1,
        }
    }
    None
}

// ============================================================================
// Lexer loop
// ============================================================================

/// Splits the whole input into tokens. Every byte of input is covered by
/// exactly one token.
pub(crate) fn lex(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while let Some(first) = rest.chars().next() {
        let offset = input.len() - rest.len();
        let (kind, len) = next_token(first, rest);
        tokens.push(Token {
            kind,
            range: TextRange::new(offset, offset + len),
        });
        rest = &rest[len..];
    }
    tokens
}

fn next_token(first: char, rest: &str) -> (TokenKind, usize) {
    match first {
        ' ' | '\t' => (TokenKind::Space, recognized_len(space(rest), rest, 1)),
        '\n' => (TokenKind::Newline, 1),
        '\r' => {
            let len = if rest.as_bytes().get(1) == Some(&b'\n') { 2 } else { 1 };
            (TokenKind::Newline, len)
        }
        '#' => (TokenKind::Comment, recognized_len(comment(rest), rest, 1)),
        '"' => match string(rest) {
            Ok((after, _)) => (TokenKind::Str, rest.len() - after.len()),
            // Unterminated string: the rest of the input is one bad token.
            Err(_) => (TokenKind::Unknown, rest.len()),
        },
        '/' => match scan_regex(rest) {
            Some(len) => (TokenKind::Regex, len),
            None => (TokenKind::Unknown, rest.len()),
        },
        ':' => (TokenKind::Colon, 1),
        '-' => (TokenKind::Dash, 1),
        '!' => (TokenKind::Bang, 1),
        '(' => (TokenKind::LParen, 1),
        ')' => (TokenKind::RParen, 1),
        ',' => (TokenKind::Comma, 1),
        c if is_ident_char(c) => (TokenKind::Ident, recognized_len(identifier(rest), rest, 1)),
        c if c.is_ascii_digit() => (TokenKind::Number, recognized_len(number(rest), rest, 1)),
        c => (TokenKind::Unknown, c.len_utf8()),
    }
}

/// Length consumed by a recognizer, with a fallback for arms whose first
/// character already guarantees success.
fn recognized_len(result: IResult<&str, &str>, rest: &str, fallback: usize) -> usize {
    result.map_or(fallback, |(after, _)| rest.len() - after.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<&str> {
        lex(input)
            .into_iter()
            .map(|t| &input[t.range.from..t.range.to])
            .collect()
    }

    #[test]
    fn test_lex_simple_condition() {
        assert_eq!(
            kinds("title:foo"),
            vec![TokenKind::Ident, TokenKind::Colon, TokenKind::Ident]
        );
        assert_eq!(texts("title:foo"), vec!["title", ":", "foo"]);
    }

    #[test]
    fn test_lex_prefixes_and_numbers() {
        assert_eq!(
            kinds("-a:1 !b:2"),
            vec![
                TokenKind::Dash,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Number,
                TokenKind::Space,
                TokenKind::Bang,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn test_lex_dotted_identifier() {
        assert_eq!(texts("author.name"), vec!["author.name"]);
        // One trailing dot stays inside the token.
        assert_eq!(texts("author."), vec!["author."]);
    }

    #[test]
    fn test_lex_double_dot_splits() {
        assert_eq!(texts("a..b"), vec!["a.", ".", "b"]);
        assert_eq!(
            kinds("a..b"),
            vec![TokenKind::Ident, TokenKind::Unknown, TokenKind::Ident]
        );
    }

    #[test]
    fn test_lex_string() {
        let tokens = lex("name:\"John Smith\"");
        assert_eq!(tokens[2].kind, TokenKind::Str);
        assert_eq!(tokens[2].range, TextRange::new(5, 17));
    }

    #[test]
    fn test_lex_unterminated_string() {
        let tokens = lex("x:\"abc");
        assert_eq!(tokens[2].kind, TokenKind::Unknown);
        assert_eq!(tokens[2].range, TextRange::new(2, 6));
    }

    #[test]
    fn test_lex_regex_with_flags() {
        let tokens = lex("name:/^test.*/i");
        assert_eq!(tokens[2].kind, TokenKind::Regex);
        assert_eq!(tokens[2].range, TextRange::new(5, 15));
    }

    #[test]
    fn test_lex_regex_escaped_slash() {
        let tokens = lex(r"path:/a\/b/");
        assert_eq!(tokens[2].kind, TokenKind::Regex);
        assert_eq!(&r"path:/a\/b/"[tokens[2].range.from..tokens[2].range.to], r"/a\/b/");
    }

    #[test]
    fn test_lex_unterminated_regex() {
        let tokens = lex("x:/abc");
        assert_eq!(tokens[2].kind, TokenKind::Unknown);
        assert_eq!(tokens[2].range, TextRange::new(2, 6));
    }

    #[test]
    fn test_lex_comment_to_end_of_line() {
        assert_eq!(
            kinds("a:1 # note\nb:2"),
            vec![
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Number,
                TokenKind::Space,
                TokenKind::Comment,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn test_lex_command_call() {
        assert_eq!(
            kinds("date:after(2024,01)"),
            vec![
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_lex_unknown_char() {
        let tokens = lex("a:@");
        assert_eq!(tokens[2].kind, TokenKind::Unknown);
        // Multibyte characters stay on char boundaries.
        let tokens = lex("é");
        assert_eq!(tokens[0].range, TextRange::new(0, 2));
    }

    #[test]
    fn test_lex_covers_every_byte() {
        let input = "-a.b:\"x\" !c:/d/i # done";
        let tokens = lex(input);
        let mut pos = 0;
        for token in &tokens {
            assert_eq!(token.range.from, pos);
            pos = token.range.to;
        }
        assert_eq!(pos, input.len());
    }
}
