//! # Metadata Phase
//!
//! Everything before `@begin` is a sequence of metadata directives. Each
//! directive is `@name` followed by zero or more arguments, one per line:
//!
//! ```text
//! @title A Story
//! @authorAddress 1 Some Street
//!                Some Town
//! @begin
//! ```
//!
//! The argument list of a directive ends at the next line starting with `@`,
//! so multi-line fields like `@authorAddress` need no terminator.

use crate::error::ScanError;
use crate::lexer::TokenKind;
use crate::metadata::{Author, Metadata, StoryKind};
use crate::scanner::Scanner;
use crate::scanner::body::BODY_DIRECTIVES;

/// Names accepted before `@begin`.
pub(crate) const METADATA_DIRECTIVES: &[&str] = &[
    "type",
    "title",
    "shortTitle",
    "authorByline",
    "authorName",
    "authorShortName",
    "authorAddress",
    "authorPhoneNumber",
    "authorEmail",
    "authorOrgs",
    "notes",
    "begin",
];

/// Fields collected so far; required ones are checked at `@begin`.
#[derive(Debug, Default)]
struct Fields {
    kind: Option<StoryKind>,
    title: Option<String>,
    short_title: Option<String>,
    byline: Option<String>,
    name: Option<String>,
    short_name: Option<String>,
    address: Vec<String>,
    phone_number: Option<String>,
    email: Option<String>,
    professional_orgs: Vec<String>,
}

impl Fields {
    fn finish(self, begin_line: usize) -> Result<Metadata, ScanError> {
        let missing = |directive| ScanError::MissingRequiredValue {
            directive,
            line: begin_line,
        };

        Ok(Metadata {
            kind: self.kind.ok_or_else(|| missing("type"))?,
            title: self.title.ok_or_else(|| missing("title"))?,
            short_title: self.short_title,
            author: Author {
                byline: self.byline.ok_or_else(|| missing("authorByline"))?,
                name: self.name,
                short_name: self.short_name,
                address: self.address,
                phone_number: self.phone_number,
                email: self.email,
                professional_orgs: self.professional_orgs,
            },
        })
    }
}

/// A directive as read from the source, before interpretation.
struct Directive<'input> {
    name: &'input str,
    args: Vec<String>,
    line: usize,
}

impl Directive<'_> {
    /// The single argument of a one-value directive.
    fn single(self, directive: &'static str) -> Result<String, ScanError> {
        let line = self.line;
        let mut args = self.args.into_iter();
        match (args.next(), args.next()) {
            (Some(value), None) => Ok(value),
            _ => Err(ScanError::MissingRequiredValue { directive, line }),
        }
    }

    /// The argument lines of a multi-line directive; at least one.
    fn lines(self, directive: &'static str) -> Result<Vec<String>, ScanError> {
        if self.args.is_empty() {
            return Err(ScanError::MissingRequiredValue {
                directive,
                line: self.line,
            });
        }
        Ok(self.args)
    }
}

/// Scan the metadata phase, up to and including `@begin`.
pub(super) fn metadata(s: &mut Scanner<'_, '_>) -> Result<Metadata, ScanError> {
    let mut fields = Fields::default();

    loop {
        let directive = directive(s)?;
        log::trace!(
            "metadata directive @{} with {} argument(s)",
            directive.name,
            directive.args.len()
        );

        let name = directive.name;
        match name {
            "begin" => return fields.finish(directive.line),
            "notes" => {}
            "type" => {
                let line = directive.line;
                let value = directive.single("type")?;
                let kind = StoryKind::from_token(&value).ok_or(ScanError::InvalidEnumValue {
                    directive: "type",
                    value,
                    line,
                })?;
                fields.kind = Some(kind);
            }
            "title" => fields.title = Some(directive.single("title")?),
            "shortTitle" => fields.short_title = Some(directive.single("shortTitle")?),
            "authorByline" => fields.byline = Some(directive.single("authorByline")?),
            "authorName" => fields.name = Some(directive.single("authorName")?),
            "authorShortName" => {
                fields.short_name = Some(directive.single("authorShortName")?)
            }
            "authorAddress" => fields.address = directive.lines("authorAddress")?,
            "authorPhoneNumber" => {
                fields.phone_number = Some(directive.single("authorPhoneNumber")?)
            }
            "authorEmail" => fields.email = Some(directive.single("authorEmail")?),
            "authorOrgs" => fields.professional_orgs = directive.lines("authorOrgs")?,
            other => {
                return Err(ScanError::UnrecognizedDirective {
                    name: other.to_string(),
                    line: directive.line,
                });
            }
        }
    }
}

/// Read one `@name` and its argument lines.
fn directive<'input>(s: &mut Scanner<'_, 'input>) -> Result<Directive<'input>, ScanError> {
    s.skip_blank();

    let Some(token) = s.current() else {
        return Err(ScanError::UnexpectedEndOfInput {
            expected: "`@begin`",
        });
    };
    let line = s.line_of(token);

    if token.kind != TokenKind::Directive || token.text == "@" {
        return Err(ScanError::MalformedDirectiveSyntax {
            found: token.text.to_string(),
            line,
        });
    }
    s.bump();

    let name = &token.text[1..];
    if BODY_DIRECTIVES.contains(&name) {
        return Err(ScanError::MalformedDirectiveSyntax {
            found: token.text.to_string(),
            line,
        });
    }
    if !METADATA_DIRECTIVES.contains(&name) {
        return Err(ScanError::UnrecognizedDirective {
            name: name.to_string(),
            line,
        });
    }

    let mut args = Vec::new();
    if name != "begin" {
        loop {
            s.skip_blank();
            match s.current_kind() {
                None => {
                    return Err(ScanError::UnexpectedEndOfInput {
                        expected: "`@begin`",
                    });
                }
                Some(TokenKind::Directive) => break,
                Some(_) => args.push(s.rest_of_line("end of line")?),
            }
        }
    }

    Ok(Directive { name, args, line })
}
