//! # Body Phase
//!
//! After `@begin` the source is a sequence of paragraphs and structural
//! directives. A directive is a `@name` that is the first thing on its line;
//! a `@` anywhere else is just text.
//!
//! ## Directives
//!
//! | Directive | Argument | Element |
//! |-----------|----------|---------|
//! | `@part` | optional title | `PartBreak` |
//! | `@prologue` | optional title | `PrologueBreak` |
//! | `@chapter` | optional title | `ChapterBreak` |
//! | `@scene` | none | `SceneBreak` |
//! | `@note` | free text | `Note` |
//!
//! ## Paragraphs
//!
//! A paragraph runs until a blank line or a line starting with `@`. Inside
//! it:
//!
//! - `*`, `**` and `***` toggle italic, bold and both ([`Emphasis::toggle`]);
//!   the text before the delimiter is emitted as one run in the old style
//! - any whitespace, including a single line break, collapses to one space
//! - `\c` is the literal character `c`

use crate::element::{Delimiter, Element, Emphasis, Run};
use crate::error::ScanError;
use crate::lexer::TokenKind;
use crate::scanner::Scanner;
use crate::scanner::metadata::METADATA_DIRECTIVES;

/// Names accepted after `@begin`.
pub(crate) const BODY_DIRECTIVES: &[&str] = &["part", "prologue", "chapter", "scene", "note"];

/// Scan the body until end of input.
pub(super) fn body(s: &mut Scanner<'_, '_>) -> Result<(), ScanError> {
    loop {
        s.skip_blank();
        match s.current_kind() {
            None => return Ok(()),
            Some(TokenKind::Directive) => directive(s)?,
            Some(_) => paragraph(s)?,
        }
    }
}

/// Scan one structural directive. The current token is its `@name`.
fn directive(s: &mut Scanner<'_, '_>) -> Result<(), ScanError> {
    let Some(token) = s.bump() else {
        return Ok(());
    };
    let line = s.line_of(token);
    let name = &token.text[1..];
    log::trace!("body directive @{name} on line {line}");

    let element = match name {
        // Anything after `@scene` on its line starts the next paragraph
        "scene" => Element::SceneBreak,
        "part" => Element::PartBreak(title(s)?),
        "prologue" => Element::PrologueBreak(title(s)?),
        "chapter" => Element::ChapterBreak(title(s)?),
        "note" => Element::Note(s.rest_of_line("end of line after `@note`")?),
        "" => {
            return Err(ScanError::MalformedDirectiveSyntax {
                found: token.text.to_string(),
                line,
            });
        }
        name if METADATA_DIRECTIVES.contains(&name) => {
            return Err(ScanError::MalformedDirectiveSyntax {
                found: token.text.to_string(),
                line,
            });
        }
        name => {
            return Err(ScanError::UnrecognizedDirective {
                name: name.to_string(),
                line,
            });
        }
    };

    s.push(element);
    Ok(())
}

/// The optional title of a heading directive.
fn title(s: &mut Scanner<'_, '_>) -> Result<Option<String>, ScanError> {
    let title = s.rest_of_line("end of line after heading title")?;
    Ok((!title.is_empty()).then_some(title))
}

/// Text of the paragraph being scanned.
///
/// Whitespace is collapsed against the paragraph as a whole, not just the
/// current run, so a space survives an emphasis change but is never doubled.
/// Runs are held until the paragraph ends so a collapsed trailing space can
/// still be removed after a closing delimiter.
struct ParagraphText {
    emphasis: Emphasis,
    buffer: String,
    /// Any text has been seen in this paragraph.
    started: bool,
    /// The last character added to the paragraph was a space.
    after_space: bool,
    /// The last character added was a space produced by collapsing whitespace.
    pending_space: bool,
    runs: Vec<Run>,
}

impl ParagraphText {
    fn new() -> Self {
        Self {
            emphasis: Emphasis::Plain,
            buffer: String::new(),
            started: false,
            after_space: false,
            pending_space: false,
            runs: Vec::new(),
        }
    }

    fn whitespace(&mut self) {
        if self.started && !self.after_space {
            self.buffer.push(' ');
            self.after_space = true;
            self.pending_space = true;
        }
    }

    fn literal(&mut self, c: char) {
        self.buffer.push(c);
        self.started = true;
        self.after_space = c == ' ';
        self.pending_space = false;
    }

    /// Text from a `Text` token; Unicode whitespace inside it still collapses.
    fn text(&mut self, text: &str) {
        for c in text.chars() {
            if c.is_whitespace() {
                self.whitespace();
            } else {
                self.literal(c);
            }
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let text = std::mem::take(&mut self.buffer);
            self.runs.push(Run::new(self.emphasis, text));
        }
    }

    fn toggle(&mut self, delimiter: Delimiter) {
        self.flush();
        self.emphasis = self.emphasis.toggle(delimiter);
    }

    fn finish(mut self, s: &mut Scanner<'_, '_>) {
        self.flush();
        // Only delimiters can follow the trailing space, so it ends the last run
        if self.pending_space {
            if let Some(last) = self.runs.last_mut() {
                last.text.pop();
                if last.text.is_empty() {
                    self.runs.pop();
                }
            }
        }

        if self.runs.is_empty() {
            return;
        }
        for run in self.runs {
            s.push(Element::Text(run));
        }
        s.push(Element::ParagraphBreak);
    }
}

/// Scan one paragraph. The current token is its first token.
fn paragraph(s: &mut Scanner<'_, '_>) -> Result<(), ScanError> {
    let mut text = ParagraphText::new();

    while let Some(token) = s.current() {
        match token.kind {
            TokenKind::Newline => {
                s.bump();
                s.skip_whitespace();
                match s.current_kind() {
                    None | Some(TokenKind::Newline) | Some(TokenKind::Directive) => break,
                    Some(_) => text.whitespace(),
                }
            }
            TokenKind::Whitespace => {
                s.bump();
                text.whitespace();
            }
            TokenKind::Star => {
                s.bump();
                let mut count = 1;
                while count < 3 && s.eat(TokenKind::Star) {
                    count += 1;
                }
                if let Some(delimiter) = Delimiter::from_count(count) {
                    text.toggle(delimiter);
                }
            }
            TokenKind::Escape => {
                s.bump();
                let escaped = match &token.text[1..] {
                    "\r\n" => "\n",
                    escaped => escaped,
                };
                escaped.chars().for_each(|c| text.literal(c));
            }
            TokenKind::Backslash => {
                return Err(ScanError::UnexpectedEndOfInput {
                    expected: "a character after `\\`",
                });
            }
            // Not at the start of a line, so not a directive
            TokenKind::Directive | TokenKind::Text => {
                s.bump();
                text.text(token.text);
            }
        }
    }

    text.finish(s);
    Ok(())
}
