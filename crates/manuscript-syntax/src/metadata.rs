//! Front-matter metadata: everything declared before `@begin`.

/// What kind of story a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoryKind {
    /// A story without parts or chapters.
    ShortStory,
    /// A longer story which may have a prologue, parts and/or chapters.
    Novel,
}

impl StoryKind {
    /// Parse the value of a `@type` directive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "shortStory" => Some(StoryKind::ShortStory),
            "novel" => Some(StoryKind::Novel),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            StoryKind::ShortStory => "shortStory",
            StoryKind::Novel => "novel",
        }
    }
}

/// The author block of the front matter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Author {
    /// Name as printed under the title (`@authorByline`).
    pub byline: String,
    /// Legal name for the contact block (`@authorName`).
    pub name: Option<String>,
    /// Short name for running headers (`@authorShortName`).
    pub short_name: Option<String>,
    pub address: Vec<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    /// Professional organization memberships, one per line.
    pub professional_orgs: Vec<String>,
}

/// Story metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub kind: StoryKind,
    pub title: String,
    pub short_title: Option<String>,
    pub author: Author,
}

impl Metadata {
    /// Title for running headers: the short title if one was given.
    pub fn running_title(&self) -> &str {
        self.short_title.as_deref().unwrap_or(&self.title)
    }

    /// Author name for running headers, falling back to the byline.
    pub fn running_author(&self) -> &str {
        self.author
            .short_name
            .as_deref()
            .unwrap_or(&self.author.byline)
    }
}
