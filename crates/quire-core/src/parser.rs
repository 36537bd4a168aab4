use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{parse_frontmatter, split_frontmatter};
use crate::model::{Note, NoteId};
use crate::wikilink::extract_links;

/// Build the query view of a note from its raw content.
///
/// Broken frontmatter is logged and treated as absent.
pub fn parse_note(id: NoteId, content: &str) -> Note {
    let fm = parse_frontmatter(content).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable frontmatter in {id}: {e}");
        Default::default()
    });
    let (_, body) = split_frontmatter(content);

    let title = fm
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| id.basename().to_string());

    let links = extract_links(content)
        .into_iter()
        .map(|link| link.target.to_string())
        .collect();

    Note {
        id,
        title,
        tags: fm.tags,
        is_private: fm.is_private,
        updated_at: fm.updated_at,
        gist_id: fm.gist_id,
        links,
        body: body.to_string(),
    }
}

/// Text of the first level-1 heading, if any.
fn first_heading(body: &str) -> Option<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut in_title = false;
    let mut text = String::new();

    for event in Parser::new_ext(body, options) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_title = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
                in_title = false;
                text.clear();
            }
            Event::Text(t) | Event::Code(t) if in_title => text.push_str(&t),
            _ => {}
        }
    }

    None
}
