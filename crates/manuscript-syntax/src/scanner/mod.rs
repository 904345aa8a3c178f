//! # Scanner - From Tokens to Elements
//!
//! The scanner is the second stage of the pipeline. It walks the token
//! stream produced by the [lexer](crate::lexer) with a single token of
//! lookahead and produces:
//!
//! - a [`Metadata`] record, from the directives before `@begin`, and
//! - a flat sequence of [`Element`]s, from the body.
//!
//! ## Two Phases
//!
//! ```text
//! @type novel          ┐
//! @title A Story       │ metadata phase (metadata.rs)
//! @authorByline Me     │
//! @begin               ┘
//! @chapter One         ┐
//! Some *styled* text.  │ body phase (body.rs)
//! ...                  ┘
//! ```
//!
//! ## Lookahead
//!
//! Grammar functions inspect the current token with [`Scanner::current`] and
//! [`Scanner::at`], and consume it with [`Scanner::bump`]. There is no way to
//! look further ahead or to rewind: anything the grammar needs to decide is
//! visible in the next token.
//!
//! ## Errors
//!
//! Scanning is fail-fast. The first [`ScanError`] is returned and everything
//! scanned so far is discarded.

mod body;
mod metadata;

use crate::element::Element;
use crate::error::ScanError;
use crate::lexer::{LineIndex, Token, TokenKind, lex};
use crate::metadata::Metadata;

/// The output of the scanner: metadata plus the flat body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned {
    pub metadata: Metadata,
    pub elements: Vec<Element>,
}

/// The scanner state machine.
///
/// Holds the token stream, the current position and the elements emitted so
/// far. Grammar functions in the submodules receive `&mut Scanner`.
pub struct Scanner<'t, 'input> {
    source: &'input str,
    tokens: &'t [Token<'input>],
    lines: LineIndex,
    pos: usize,
    elements: Vec<Element>,
}

impl<'t, 'input> Scanner<'t, 'input> {
    /// Create a new scanner over the tokens of `source`.
    pub fn new(source: &'input str, tokens: &'t [Token<'input>]) -> Self {
        Self {
            source,
            tokens,
            lines: LineIndex::new(source),
            pos: 0,
            elements: Vec::new(),
        }
    }

    /// Scan the whole input.
    pub fn scan(mut self) -> Result<Scanned, ScanError> {
        let metadata = metadata::metadata(&mut self)?;
        log::debug!(
            "scanned metadata for {:?} ({:?})",
            metadata.title,
            metadata.kind
        );

        body::body(&mut self)?;
        log::debug!("scanned {} body elements", self.elements.len());

        Ok(Scanned {
            metadata,
            elements: self.elements,
        })
    }

    /// Current token, or `None` at end of input.
    pub fn current(&self) -> Option<&'t Token<'input>> {
        self.tokens.get(self.pos)
    }

    /// Kind of the current token.
    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consume and return the current token.
    pub fn bump(&mut self) -> Option<&'t Token<'input>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skip horizontal whitespace.
    pub fn skip_whitespace(&mut self) {
        while self.eat(TokenKind::Whitespace) {}
    }

    /// Skip whitespace and line breaks.
    pub fn skip_blank(&mut self) {
        while self.eat(TokenKind::Whitespace) || self.eat(TokenKind::Newline) {}
    }

    /// Read the rest of the current line, trimmed, consuming its newline.
    ///
    /// The text is taken verbatim from the source: escapes and stars have no
    /// meaning in directive arguments.
    pub fn rest_of_line(&mut self, expected: &'static str) -> Result<String, ScanError> {
        let start = self.current().map(|t| t.span.start);
        let mut end = start;
        loop {
            match self.bump() {
                None => return Err(ScanError::UnexpectedEndOfInput { expected }),
                Some(t) if t.kind == TokenKind::Newline => break,
                Some(t) => end = Some(t.span.end),
            }
        }
        let text = match (start, end) {
            (Some(start), Some(end)) if end > start => &self.source[start..end],
            _ => "",
        };
        Ok(text.trim().to_string())
    }

    /// Line number of the current token (or of the end of input).
    pub fn line(&self) -> usize {
        let offset = self
            .current()
            .map(|t| t.span.start)
            .unwrap_or(self.source.len());
        self.lines.line(offset)
    }

    /// Line number of a token.
    pub fn line_of(&self, token: &Token<'_>) -> usize {
        self.lines.line(token.span.start)
    }

    /// Append an element to the output.
    pub fn push(&mut self, element: Element) {
        log::trace!("element {:?}", element);
        self.elements.push(element);
    }
}

/// Scan source text into metadata and a flat element sequence.
pub fn scan(source: &str) -> Result<Scanned, ScanError> {
    let tokens = lex(source);
    Scanner::new(source, &tokens).scan()
}
