//! # Elements
//!
//! Elements are the intermediate representation between scanning and tree
//! building. Instead of building the document tree directly, the scanner
//! emits a **flat sequence** of elements: styled text runs interleaved with
//! the breaks that delimit paragraphs, scenes, chapters and parts.
//!
//! ```text
//! ChapterBreak(Some("One"))   ← @chapter One
//! Text(Plain "Hello ")
//! Text(Italic "world")
//! ParagraphBreak              ← blank line
//! SceneBreak                  ← @scene
//! Text(Plain "Later.")
//! ParagraphBreak
//! ```
//!
//! The [builder](crate::builder) folds this sequence into the nested
//! [`Document`](crate::document::Document).

/// Emphasis applied to a run of text.
///
/// This is also the scanner's style state while lexing a paragraph: the
/// bold and italic toggles are a single four-state value, and
/// [`Emphasis::toggle`] is the only way to move between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Emphasis {
    #[default]
    Plain,
    Italic,
    Bold,
    BoldItalic,
}

/// A run of one, two or three emphasis delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `*` toggles italic
    Single,
    /// `**` toggles bold
    Double,
    /// `***` toggles bold and italic together
    Triple,
}

impl Delimiter {
    /// Delimiter for a count of consecutive stars, if the count is 1..=3.
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(Delimiter::Single),
            2 => Some(Delimiter::Double),
            3 => Some(Delimiter::Triple),
            _ => None,
        }
    }
}

impl Emphasis {
    /// The state reached from `self` through `delimiter`.
    pub fn toggle(self, delimiter: Delimiter) -> Emphasis {
        use Delimiter::*;
        use Emphasis::*;

        match (self, delimiter) {
            (Plain, Single) => Italic,
            (Plain, Double) => Bold,
            (Plain, Triple) => BoldItalic,
            (Italic, Single) => Plain,
            (Italic, Double) => BoldItalic,
            (Italic, Triple) => Bold,
            (Bold, Single) => BoldItalic,
            (Bold, Double) => Plain,
            (Bold, Triple) => Italic,
            (BoldItalic, Single) => Bold,
            (BoldItalic, Double) => Italic,
            (BoldItalic, Triple) => Plain,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Emphasis::Bold | Emphasis::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Emphasis::Italic | Emphasis::BoldItalic)
    }
}

/// A contiguous span of text sharing one emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Run {
    pub emphasis: Emphasis,
    pub text: String,
}

impl Run {
    pub fn new(emphasis: Emphasis, text: impl Into<String>) -> Self {
        Self {
            emphasis,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Emphasis::Plain, text)
    }
}

/// An element of the flat, pre-structuring sequence produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// End of a paragraph.
    ParagraphBreak,
    /// `@scene`: ends the current scene.
    SceneBreak,
    /// `@part [title]`
    PartBreak(Option<String>),
    /// `@prologue [title]`
    PrologueBreak(Option<String>),
    /// `@chapter [title]`
    ChapterBreak(Option<String>),
    /// `@note text`: an author's note, dropped from the document.
    Note(String),
    /// Styled text within a paragraph.
    Text(Run),
}

impl Element {
    /// True for the markers that start a new part, chapter or prologue.
    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            Element::PartBreak(_) | Element::PrologueBreak(_) | Element::ChapterBreak(_)
        )
    }
}
