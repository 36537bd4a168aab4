pub mod id;
pub mod time;

pub use id::generate_note_id;

/// Slugify a single path segment.
///
/// Rules:
/// - Trim and convert to lowercase
/// - Whitespace and underscores become hyphens
/// - Anything other than ASCII letters, digits and hyphens is dropped
/// - Runs of hyphens collapse to one
/// - Leading/trailing hyphens are trimmed
///
/// # Examples
///
/// ```
/// use quire_core::slugify_segment;
///
/// assert_eq!(slugify_segment("My Cool Note"), "my-cool-note");
/// assert_eq!(slugify_segment("  A   B  "), "a-b");
/// assert_eq!(slugify_segment("Hello (World)!"), "hello-world");
/// assert_eq!(slugify_segment("--x--y--"), "x-y");
/// assert_eq!(slugify_segment("!!!"), "");
/// ```
pub fn slugify_segment(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.trim().to_lowercase().chars() {
        let mapped = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else if c == '-' || c == '_' || c.is_whitespace() {
            '-'
        } else {
            continue;
        };
        if mapped == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(mapped);
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Turn free-form text into a hierarchical note ID.
///
/// Each `/`-separated piece is slugified; pieces that reduce to nothing are
/// dropped. Returns an empty string when nothing usable remains.
///
/// ```
/// use quire_core::to_slug;
///
/// assert_eq!(to_slug("Projects / Q3 Plan"), "projects/q3-plan");
/// assert_eq!(to_slug("a//b/"), "a/b");
/// assert_eq!(to_slug("///"), "");
/// ```
pub fn to_slug(text: &str) -> String {
    text.split('/')
        .map(slugify_segment)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `segment` is exactly what [`slugify_segment`] could produce.
fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('-')
        && !segment.ends_with('-')
        && !segment.contains("--")
        && segment
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// The gate every write goes through: one or more valid segments joined by `/`.
///
/// ```
/// use quire_core::is_valid_note_id;
///
/// assert!(is_valid_note_id("notes/final"));
/// assert!(!is_valid_note_id("notes//final"));
/// assert!(!is_valid_note_id("Notes"));
/// assert!(!is_valid_note_id(""));
/// ```
pub fn is_valid_note_id(id: &str) -> bool {
    !id.is_empty() && id.split('/').all(is_valid_segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_segment() {
        assert_eq!(slugify_segment("Hello World"), "hello-world");
        assert_eq!(slugify_segment("snake_case name"), "snake-case-name");
        assert_eq!(slugify_segment("a - b"), "a-b");
        assert_eq!(slugify_segment("Café"), "caf");
        assert_eq!(slugify_segment("2024 Review"), "2024-review");
        assert_eq!(slugify_segment("   "), "");
        assert_eq!(slugify_segment("-"), "");
    }

    #[test]
    fn test_to_slug_hierarchy() {
        assert_eq!(to_slug("Notes/Draft"), "notes/draft");
        assert_eq!(to_slug(" /Inbox/ /Idea #1"), "inbox/idea-1");
        assert_eq!(to_slug(""), "");
        assert_eq!(to_slug("!!/??"), "");
    }

    #[test]
    fn test_is_valid_note_id() {
        assert!(is_valid_note_id("a"));
        assert!(is_valid_note_id("a-b/c1"));
        assert!(!is_valid_note_id("a/"));
        assert!(!is_valid_note_id("/a"));
        assert!(!is_valid_note_id("a--b"));
        assert!(!is_valid_note_id("-a"));
        assert!(!is_valid_note_id("a b"));
        assert!(!is_valid_note_id("a.md"));
    }

    #[test]
    fn test_slug_output_is_always_valid() {
        let inputs = [
            "Hello World",
            "  Weird __ spacing -- here ",
            "Ünïcödé / Ünïcödé",
            "a/b/c",
            "-/-/-x-",
            "Tabs\tand\nnewlines",
            "#tag/ sub tag /",
            "1/2/3",
        ];
        for input in inputs {
            let slug = to_slug(input);
            if !slug.is_empty() {
                assert!(is_valid_note_id(&slug), "{input:?} -> {slug:?}");
            }
        }
    }

    #[test]
    fn test_generated_ids_are_valid() {
        for _ in 0..50 {
            let id = generate_note_id(12);
            assert_eq!(id.len(), 12);
            assert!(is_valid_note_id(&id), "{id}");
        }
    }
}
