//! Builder for folding the scanner's flat elements into a [`Document`].
//!
//! The element sequence is partitioned level by level, highest first:
//!
//! 1. on `PartBreak` into parts,
//! 2. on `ChapterBreak`/`PrologueBreak` into chapters,
//! 3. on `SceneBreak` into scenes,
//! 4. on `ParagraphBreak` into paragraphs.
//!
//! Elements before the first marker of a level form an anonymous unit.
//! A unit with no content is dropped at every level, whether declared or
//! anonymous, and is not counted: numbering only covers units that are kept.

use crate::document::{Chapter, Document, Paragraph, Part, Scene};
use crate::element::Element;
use crate::metadata::Metadata;

/// Elements between two markers of one level.
struct Group<'e> {
    /// The marker that opened the group; `None` for the leading group.
    marker: Option<&'e Element>,
    elements: &'e [Element],
}

/// Split `elements` at every marker. Each marker opens the group after it.
///
/// A leading group exists only if elements precede the first marker.
fn partition<'e>(elements: &'e [Element], is_marker: impl Fn(&Element) -> bool) -> Vec<Group<'e>> {
    let mut groups = Vec::new();
    let mut marker = None;
    let mut start = 0;

    for (i, element) in elements.iter().enumerate() {
        if is_marker(element) {
            if marker.is_some() || i > start {
                groups.push(Group {
                    marker,
                    elements: &elements[start..i],
                });
            }
            marker = Some(element);
            start = i + 1;
        }
    }
    if marker.is_some() || start < elements.len() {
        groups.push(Group {
            marker,
            elements: &elements[start..],
        });
    }

    groups
}

/// Build the document tree from scanner output.
pub fn build(metadata: Metadata, elements: Vec<Element>) -> Document {
    let parts = parts(&elements);
    log::debug!(
        "built {} part(s), {} chapter(s)",
        parts.len(),
        parts.iter().map(|p| p.chapters.len()).sum::<usize>()
    );
    Document { metadata, parts }
}

fn parts(elements: &[Element]) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut number = 0;

    for group in partition(elements, |e| matches!(e, Element::PartBreak(_))) {
        let chapters = chapters(group.elements);
        if chapters.is_empty() {
            continue;
        }

        let part = match group.marker {
            Some(Element::PartBreak(title)) => {
                number += 1;
                Part {
                    title: title.clone(),
                    anonymous: false,
                    number,
                    chapters,
                }
            }
            _ => Part {
                title: None,
                anonymous: true,
                number: 0,
                chapters,
            },
        };
        parts.push(part);
    }

    parts
}

fn chapters(elements: &[Element]) -> Vec<Chapter> {
    let mut chapters = Vec::new();
    let mut chapter_number = 0;
    let mut prologue_number = 0;

    let is_marker = |e: &Element| matches!(e, Element::ChapterBreak(_) | Element::PrologueBreak(_));
    for group in partition(elements, is_marker) {
        let scenes = scenes(group.elements);
        if scenes.is_empty() {
            continue;
        }

        let (title, anonymous, prologue, number) = match group.marker {
            Some(Element::ChapterBreak(title)) => {
                chapter_number += 1;
                (title.clone(), false, false, chapter_number)
            }
            Some(Element::PrologueBreak(title)) => {
                prologue_number += 1;
                (title.clone(), false, true, prologue_number)
            }
            _ => (None, true, false, 0),
        };

        chapters.push(Chapter {
            title,
            anonymous,
            prologue,
            number,
            scenes,
        });
    }

    chapters
}

fn scenes(elements: &[Element]) -> Vec<Scene> {
    let groups: Vec<&[Element]> = elements
        .split(|e| matches!(e, Element::SceneBreak))
        .collect();
    let last = groups.len().saturating_sub(1);

    groups
        .into_iter()
        .enumerate()
        .filter_map(|(i, group)| {
            let paragraphs = paragraphs(group);
            (!paragraphs.is_empty()).then_some(Scene {
                ends_with_break: i < last,
                paragraphs,
            })
        })
        .collect()
}

fn paragraphs(elements: &[Element]) -> Vec<Paragraph> {
    elements
        .split(|e| matches!(e, Element::ParagraphBreak))
        .map(|group| Paragraph {
            runs: group
                .iter()
                .filter_map(|e| match e {
                    Element::Text(run) => Some(run.clone()),
                    _ => None,
                })
                .collect(),
        })
        .filter(|p| !p.runs.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Run;
    use crate::metadata::{Author, StoryKind};
    use pretty_assertions::assert_eq;

    use Element::*;

    fn metadata() -> Metadata {
        Metadata {
            kind: StoryKind::Novel,
            title: "T".to_string(),
            short_title: None,
            author: Author {
                byline: "A".to_string(),
                ..Author::default()
            },
        }
    }

    fn text(s: &str) -> Element {
        Text(Run::plain(s))
    }

    fn title(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn build_parts(elements: Vec<Element>) -> Vec<Part> {
        build(metadata(), elements).parts
    }

    #[test]
    fn empty_body_has_no_parts() {
        assert_eq!(build_parts(vec![]), vec![]);
    }

    #[test]
    fn single_paragraph_is_fully_anonymous() {
        let parts = build_parts(vec![text("Hello"), ParagraphBreak]);
        assert_eq!(
            parts,
            vec![Part {
                title: None,
                anonymous: true,
                number: 0,
                chapters: vec![Chapter {
                    title: None,
                    anonymous: true,
                    prologue: false,
                    number: 0,
                    scenes: vec![Scene {
                        ends_with_break: false,
                        paragraphs: vec![Paragraph {
                            runs: vec![Run::plain("Hello")]
                        }],
                    }],
                }],
            }]
        );
    }

    #[test]
    fn runs_between_breaks_form_paragraphs() {
        let parts = build_parts(vec![
            text("a"),
            text("b"),
            ParagraphBreak,
            text("c"),
            ParagraphBreak,
        ]);
        let scene = &parts[0].chapters[0].scenes[0];
        assert_eq!(scene.paragraphs.len(), 2);
        assert_eq!(scene.paragraphs[0].runs.len(), 2);
        assert_eq!(scene.paragraphs[1].plain_text(), "c");
    }

    #[test]
    fn chapters_are_numbered_without_gaps() {
        let parts = build_parts(vec![
            ChapterBreak(title("One")),
            text("x"),
            ParagraphBreak,
            ChapterBreak(None),
            text("y"),
            ParagraphBreak,
            ChapterBreak(title("Three")),
            text("z"),
            ParagraphBreak,
        ]);
        assert_eq!(parts.len(), 1);
        assert!(parts[0].anonymous);

        let numbers: Vec<_> = parts[0]
            .chapters
            .iter()
            .map(|c| (c.number, c.title.as_deref(), c.anonymous))
            .collect();
        assert_eq!(
            numbers,
            vec![
                (1, Some("One"), false),
                (2, None, false),
                (3, Some("Three"), false)
            ]
        );
    }

    #[test]
    fn prologues_are_counted_separately() {
        let parts = build_parts(vec![
            PrologueBreak(None),
            text("p"),
            ParagraphBreak,
            ChapterBreak(None),
            text("c1"),
            ParagraphBreak,
            ChapterBreak(None),
            text("c2"),
            ParagraphBreak,
        ]);
        let chapters: Vec<_> = parts[0]
            .chapters
            .iter()
            .map(|c| (c.prologue, c.number))
            .collect();
        assert_eq!(chapters, vec![(true, 1), (false, 1), (false, 2)]);
    }

    #[test]
    fn chapter_numbers_reset_per_part() {
        let parts = build_parts(vec![
            text("intro"),
            ParagraphBreak,
            PartBreak(title("First")),
            ChapterBreak(None),
            text("a"),
            ParagraphBreak,
            ChapterBreak(None),
            text("b"),
            ParagraphBreak,
            PartBreak(None),
            ChapterBreak(None),
            text("c"),
            ParagraphBreak,
        ]);

        let summary: Vec<_> = parts
            .iter()
            .map(|p| {
                (
                    p.anonymous,
                    p.number,
                    p.chapters.iter().map(|c| c.number).collect::<Vec<_>>(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![(true, 0, vec![0]), (false, 1, vec![1, 2]), (false, 2, vec![1])]
        );
        assert_eq!(parts[1].title.as_deref(), Some("First"));
    }

    #[test]
    fn leading_chapter_before_first_heading_is_anonymous() {
        let parts = build_parts(vec![
            text("opening"),
            ParagraphBreak,
            ChapterBreak(None),
            text("first"),
            ParagraphBreak,
        ]);
        let chapters = &parts[0].chapters;
        assert_eq!(chapters.len(), 2);
        assert!(chapters[0].anonymous);
        assert_eq!(chapters[0].number, 0);
        assert!(!chapters[1].anonymous);
        assert_eq!(chapters[1].number, 1);
    }

    #[test]
    fn scene_breaks_split_scenes() {
        let parts = build_parts(vec![
            text("one"),
            ParagraphBreak,
            SceneBreak,
            text("two"),
            ParagraphBreak,
        ]);
        let scenes = &parts[0].chapters[0].scenes;
        assert_eq!(scenes.len(), 2);
        assert!(scenes[0].ends_with_break);
        assert!(!scenes[1].ends_with_break);
    }

    #[test]
    fn trailing_scene_break_creates_no_empty_scene() {
        let parts = build_parts(vec![
            ChapterBreak(None),
            text("one"),
            ParagraphBreak,
            SceneBreak,
            ChapterBreak(None),
            text("two"),
            ParagraphBreak,
        ]);
        let first = &parts[0].chapters[0];
        assert_eq!(first.scenes.len(), 1);
        assert!(first.scenes[0].ends_with_break);
        assert_eq!(parts[0].chapters[1].scenes.len(), 1);
    }

    #[test]
    fn repeated_scene_breaks_create_no_empty_scenes() {
        let parts = build_parts(vec![
            SceneBreak,
            text("one"),
            ParagraphBreak,
            SceneBreak,
            SceneBreak,
            text("two"),
            ParagraphBreak,
        ]);
        let scenes = &parts[0].chapters[0].scenes;
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].paragraphs[0].plain_text(), "one");
        assert_eq!(scenes[1].paragraphs[0].plain_text(), "two");
    }

    #[test]
    fn notes_carry_no_output() {
        let parts = build_parts(vec![
            Note("remember".to_string()),
            ChapterBreak(None),
            text("a"),
            ParagraphBreak,
            Note("fix".to_string()),
            text("b"),
            ParagraphBreak,
        ]);
        assert_eq!(parts.len(), 1);
        let chapters = &parts[0].chapters;
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, 1);
        let paragraphs = &chapters[0].scenes[0].paragraphs;
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn declared_chapter_without_content_is_dropped() {
        let parts = build_parts(vec![
            ChapterBreak(title("Empty")),
            ChapterBreak(title("Full")),
            text("x"),
            ParagraphBreak,
            ChapterBreak(title("Scene break only")),
            SceneBreak,
            ChapterBreak(title("Last")),
            text("y"),
            ParagraphBreak,
        ]);
        let chapters: Vec<_> = parts[0]
            .chapters
            .iter()
            .map(|c| (c.number, c.title.as_deref()))
            .collect();
        assert_eq!(chapters, vec![(1, Some("Full")), (2, Some("Last"))]);
    }

    #[test]
    fn declared_part_without_content_is_dropped() {
        let parts = build_parts(vec![
            PartBreak(title("Alone")),
            PartBreak(title("Only headings")),
            ChapterBreak(None),
            PrologueBreak(None),
            PartBreak(title("Full")),
            ChapterBreak(None),
            text("x"),
            ParagraphBreak,
            PartBreak(title("Trailing")),
        ]);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].number, 1);
        assert_eq!(parts[0].title.as_deref(), Some("Full"));
        assert_eq!(parts[0].chapters[0].number, 1);
    }

    #[test]
    fn only_empty_headings_build_no_parts() {
        assert_eq!(
            build_parts(vec![
                PartBreak(None),
                ChapterBreak(None),
                SceneBreak,
                Note("todo".to_string())
            ]),
            vec![]
        );
    }
}
