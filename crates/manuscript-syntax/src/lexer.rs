//! # Lexer - Tokenizing Manuscript Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! so the scanner can always rebuild the exact text of a line (directive
//! arguments and titles are read that way):
//!
//! ```
//! use manuscript_syntax::lexer::lex;
//!
//! let input = "@title A Story\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are **context-free**. The lexer does not know whether `@chapter`
//! starts a directive or sits in the middle of a sentence, or whether `*`
//! opens or closes emphasis. The scanner decides, using the position of the
//! token on its line and its own style state.
//!
//! Characters with meaning get their own token types:
//! - `@word` → [`TokenKind::Directive`]
//! - `*` → [`TokenKind::Star`] (one token per star, the scanner counts them)
//! - `\c` → [`TokenKind::Escape`]
//!
//! Everything else becomes [`TokenKind::Text`], grouped into runs.

use std::ops::Range;

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `@` followed by the directive name, e.g. `@chapter`
    #[regex(r"@[^ \t\r\n\x0B\x0C*\\]*")]
    Directive,

    /// A backslash and the single character it escapes
    #[regex(r"\\[^\n]")]
    #[token("\\\n")]
    #[token("\\\r\n")]
    Escape,

    /// A backslash with nothing after it
    #[token("\\")]
    Backslash,

    /// Emphasis delimiter
    #[token("*")]
    Star,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// Horizontal ASCII whitespace. Other Unicode whitespace stays inside
    /// `Text` and is collapsed by the scanner.
    #[regex(r"[ \t\r\x0B\x0C]+")]
    Whitespace,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^ \t\r\n\x0B\x0C@*\\]+")]
    Text,
}

/// A lexed token with its kind, text slice and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        // Every byte is covered by some rule, but stay lenient like the
        // scanner expects: anything unrecognized is text.
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token {
            kind,
            text,
            span: lexer.span(),
        });
    }

    tokens
}

/// Byte offsets of every `\n` in a source, for line lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        Self {
            newlines: source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// 1-based line number of a byte offset.
    pub fn line(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset) + 1
    }
}
