//! The structured document handed to renderers.
//!
//! ```text
//! Document
//! └── Part            (anonymous unless introduced by @part)
//!     └── Chapter     (anonymous unless introduced by @chapter/@prologue)
//!         └── Scene   (split by @scene)
//!             └── Paragraph
//!                 └── Run
//! ```
//!
//! The tree is produced once by the [builder](crate::builder) and only read
//! afterwards.

use crate::element::Run;
use crate::metadata::Metadata;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub metadata: Metadata,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub title: Option<String>,
    /// No `@part` introduced this part; renderers emit no part heading.
    pub anonymous: bool,
    /// 1-based among non-anonymous parts, 0 for an anonymous part.
    pub number: usize,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: Option<String>,
    /// No `@chapter` or `@prologue` introduced this chapter.
    pub anonymous: bool,
    pub prologue: bool,
    /// 1-based within the part, counted separately for chapters and
    /// prologues; 0 for an anonymous chapter.
    pub number: usize,
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scene {
    /// The scene is followed by an explicit `@scene` break.
    pub ends_with_break: bool,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Document {
    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.parts.iter().flat_map(|p| p.chapters.iter())
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.chapters().flat_map(|c| c.scenes.iter())
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.scenes().flat_map(|s| s.paragraphs.iter())
    }
}

impl Part {
    /// Heading for the part, e.g. `Part II: The Return`.
    pub fn label(&self) -> Option<String> {
        if self.anonymous {
            return None;
        }
        Some(with_title(
            format!("Part {}", roman(self.number)),
            self.title.as_deref(),
        ))
    }
}

impl Chapter {
    /// Heading for the chapter, e.g. `Chapter 3: Home` or `Prologue`.
    pub fn label(&self) -> Option<String> {
        if self.anonymous {
            return None;
        }
        let base = if self.prologue {
            "Prologue".to_string()
        } else {
            format!("Chapter {}", self.number)
        };
        Some(with_title(base, self.title.as_deref()))
    }
}

impl Paragraph {
    /// The paragraph's text without emphasis.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

fn with_title(base: String, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{base}: {title}"),
        None => base,
    }
}

/// Upper-case Roman numeral for a part number.
pub fn roman(mut n: usize) -> String {
    const NUMERALS: [(usize, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}
