//! Wikilink scanning and rewriting.
//!
//! Recognised forms: `[[target]]`, `[[target|alias]]`, `[[target#anchor]]`,
//! `[[target#anchor|alias]]`, and the embedded `![[...]]` variants. Only the
//! target span is ever replaced, so aliases, anchors and surrounding bytes are
//! left untouched.

use std::borrow::Cow;
use std::ops::Range;

/// One wikilink occurrence in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink<'a> {
    pub target: &'a str,
    pub anchor: Option<&'a str>,
    pub alias: Option<&'a str>,
    pub embedded: bool,
    /// Byte range of the trimmed target inside the document.
    pub target_range: Range<usize>,
    /// Byte range of the whole token, `!` included for embeds.
    pub range: Range<usize>,
}

/// List every wikilink in `content`, in order of appearance.
pub fn extract_links(content: &str) -> Vec<WikiLink<'_>> {
    let mut links = Vec::new();
    let mut cursor = 0;

    while let Some(found) = content[cursor..].find("[[") {
        let open = cursor + found;
        let inner_start = open + 2;
        let Some(close_rel) = content[inner_start..].find("]]") else {
            break;
        };
        let inner_end = inner_start + close_rel;
        let inner = &content[inner_start..inner_end];

        // A nested opener means the first `[[` was stray text.
        if let Some(nested) = inner.find("[[") {
            cursor = inner_start + nested;
            continue;
        }
        if inner.contains('\n') {
            cursor = inner_start;
            continue;
        }

        if let Some(link) = parse_inner(content, open, inner_start, inner) {
            links.push(link);
        }
        cursor = inner_end + 2;
    }

    links
}

fn parse_inner<'a>(
    content: &'a str,
    open: usize,
    inner_start: usize,
    inner: &'a str,
) -> Option<WikiLink<'a>> {
    let (reference, alias) = match inner.split_once('|') {
        Some((reference, alias)) => (reference, Some(alias.trim())),
        None => (inner, None),
    };
    let (target_part, anchor) = match reference.split_once('#') {
        Some((target, anchor)) => (target, Some(anchor.trim())),
        None => (reference, None),
    };

    let target = target_part.trim();
    if target.is_empty() {
        return None;
    }
    let leading = target_part.len() - target_part.trim_start().len();
    let target_start = inner_start + leading;

    let embedded = open > 0 && content.as_bytes()[open - 1] == b'!';
    let token_start = if embedded { open - 1 } else { open };

    Some(WikiLink {
        target,
        anchor,
        alias,
        embedded,
        target_range: target_start..target_start + target.len(),
        range: token_start..inner_start + inner.len() + 2,
    })
}

/// Replace every reference to `old_id` with `new_id`.
///
/// Returns `Cow::Borrowed(content)` when nothing references `old_id`, so
/// callers can detect a no-op without comparing strings.
pub fn rewrite_links<'a>(content: &'a str, old_id: &str, new_id: &str) -> Cow<'a, str> {
    let spans: Vec<Range<usize>> = extract_links(content)
        .into_iter()
        .filter(|link| link.target == old_id)
        .map(|link| link.target_range)
        .collect();

    if spans.is_empty() {
        return Cow::Borrowed(content);
    }

    let mut out = String::with_capacity(content.len() + spans.len() * new_id.len());
    let mut last = 0;
    for span in spans {
        out.push_str(&content[last..span.start]);
        out.push_str(new_id);
        last = span.end;
    }
    out.push_str(&content[last..]);
    Cow::Owned(out)
}

/// Apply several `(old, new)` rewrites in the order given.
pub fn rewrite_links_many<'a, S: AsRef<str>>(content: &'a str, pairs: &[(S, S)]) -> Cow<'a, str> {
    let mut current = Cow::Borrowed(content);
    for (old_id, new_id) in pairs {
        let rewritten = match rewrite_links(&current, old_id.as_ref(), new_id.as_ref()) {
            Cow::Owned(text) => Some(text),
            Cow::Borrowed(_) => None,
        };
        if let Some(text) = rewritten {
            current = Cow::Owned(text);
        }
    }
    current
}
