//! # manuscript-syntax
//!
//! Parser for manuscript markup: a plain-text format for fiction with a
//! block of metadata directives followed by the story itself.
//!
//! ```text
//! @type novel
//! @title The Long Way Home
//! @authorByline A. Writer
//! @begin
//!
//! @chapter Departure
//! It was *not* a good day to leave.
//!
//! @scene
//! The road was **long**.
//! ```
//!
//! ## Architecture Overview
//!
//! The parsing pipeline has three stages:
//!
//! ```text
//! Source Text → Lexer → Tokens → Scanner → Elements → Builder → Document
//!               (Logos)          (two phases)         (partitioning)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! [Logos] splits the input into a flat sequence of tokens. Every byte of the
//! input belongs to exactly one token.
//!
//! ### 2. Scanner ([`scanner`] module)
//!
//! The scanner reads the metadata directives up to `@begin`, then turns the
//! body into a flat list of [`Element`]s: text runs, paragraph breaks and
//! structural breaks. Emphasis is tracked as a single four-state
//! [`Emphasis`] value.
//!
//! ### 3. Builder ([`builder`] module)
//!
//! The builder folds the flat elements into the [`Document`] tree of parts,
//! chapters, scenes and paragraphs, numbering parts and chapters as it goes.
//!
//! Output formats are not part of this crate; they plug in through the
//! [`render::Render`] trait.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Module Structure
//!
//! ```text
//! manuscript-syntax/
//! ├── lib.rs          # This file - public API and pipeline tests
//! ├── lexer.rs        # Logos-based tokenizer
//! ├── element.rs      # Element, Run, Emphasis state machine
//! ├── metadata.rs     # Metadata and Author records
//! ├── document.rs     # Document tree and heading labels
//! ├── builder.rs      # Elements to Document
//! ├── error.rs        # ScanError
//! ├── render.rs       # Render trait and renderer registry
//! └── scanner/
//!     ├── mod.rs      # Scanner struct, lookahead, public scan() function
//!     ├── metadata.rs # Directives before @begin
//!     └── body.rs     # Paragraphs, emphasis and structural directives
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use manuscript_syntax::{parse, Emphasis};
//!
//! let doc = parse(
//!     "@type shortStory\n@title T\n@authorByline A\n@begin\nHello *world*.\n",
//! )
//! .unwrap();
//!
//! assert_eq!(doc.metadata.title, "T");
//! let paragraph = doc.paragraphs().next().unwrap();
//! assert_eq!(paragraph.plain_text(), "Hello world.");
//! assert_eq!(paragraph.runs[1].emphasis, Emphasis::Italic);
//! ```

pub mod builder;
pub mod document;
pub mod element;
pub mod error;
pub mod lexer;
pub mod metadata;
pub mod render;
pub mod scanner;

pub use document::{Chapter, Document, Paragraph, Part, Scene};
pub use element::{Element, Emphasis, Run};
pub use error::ScanError;
pub use metadata::{Author, Metadata, StoryKind};

/// Parse manuscript source into a [`Document`].
///
/// Fails on the first error; no partial document is returned.
pub fn parse(source: &str) -> Result<Document, ScanError> {
    let scanned = scanner::scan(source)?;
    Ok(builder::build(scanned.metadata, scanned.elements))
}
