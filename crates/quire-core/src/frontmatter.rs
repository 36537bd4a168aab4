//! YAML frontmatter at the head of a note.
//!
//! Frontmatter is never persisted on its own: reads parse it out of the
//! content string and writes produce a new content string.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

use crate::error::Result;

const FENCE: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default, rename = "isPrivate", alias = "is_private")]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Identifier of the mirrored snippet on the external host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gist_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsField {
    One(String),
    Many(Vec<String>),
    Nothing(()),
}

fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = match TagsField::deserialize(deserializer)? {
        TagsField::One(s) => s.split(',').map(str::to_string).collect(),
        TagsField::Many(v) => v,
        TagsField::Nothing(()) => Vec::new(),
    };
    Ok(raw
        .into_iter()
        .map(|tag| tag.trim().trim_start_matches('#').to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}

/// Split `content` into its frontmatter YAML (if any) and the body after it.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, content)
}

/// Parse the frontmatter block; a note without one yields the default.
pub fn parse_frontmatter(content: &str) -> Result<Frontmatter> {
    match split_frontmatter(content) {
        (Some(yaml), _) if !yaml.trim().is_empty() => Ok(serde_yaml::from_str(yaml)?),
        _ => Ok(Frontmatter::default()),
    }
}

/// Return `content` with `key` set to `value` in its frontmatter, creating
/// the block when the note has none. The body is carried over unchanged.
pub fn set_field(content: &str, key: &str, value: Value) -> Result<String> {
    let (yaml, body) = split_frontmatter(content);
    let mut mapping = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(mapping) => mapping,
            _ => Mapping::new(),
        },
        _ => Mapping::new(),
    };
    mapping.insert(Value::String(key.to_string()), value);

    let rendered = serde_yaml::to_string(&Value::Mapping(mapping))?;
    Ok(format!("{FENCE}\n{rendered}{FENCE}\n{body}"))
}

/// Fresh content for a new note titled `title`.
pub fn new_note_content(title: &str) -> Result<String> {
    let fm = Frontmatter {
        title: Some(title.to_string()),
        ..Frontmatter::default()
    };
    let rendered = serde_yaml::to_string(&fm)?;
    Ok(format!("{FENCE}\n{rendered}{FENCE}\n\n# {title}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter() {
        let content = "---\ntitle: Hello\n---\nBody text";
        let (yaml, body) = split_frontmatter(content);
        assert_eq!(yaml, Some("title: Hello\n"));
        assert_eq!(body, "Body text");

        let (yaml, body) = split_frontmatter("No block here");
        assert_eq!(yaml, None);
        assert_eq!(body, "No block here");

        let (yaml, _) = split_frontmatter("---\nunterminated: true\n");
        assert_eq!(yaml, None);
    }

    #[test]
    fn test_parse_fields() {
        let content = "---\ntitle: Plan\ntags: [work, work/q3]\nisPrivate: true\nupdated_at: '2024-05-01T10:00:00Z'\ngist_id: abc123\ncolor: blue\n---\n# Plan";
        let fm = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Plan"));
        assert_eq!(fm.tags, vec!["work", "work/q3"]);
        assert!(fm.is_private);
        assert_eq!(fm.updated_at.as_deref(), Some("2024-05-01T10:00:00Z"));
        assert_eq!(fm.gist_id.as_deref(), Some("abc123"));
        assert_eq!(fm.extra.get("color"), Some(&Value::String("blue".into())));
    }

    #[test]
    fn test_tags_from_string_and_hashes() {
        let fm = parse_frontmatter("---\ntags: '#a, b ,,'\n---\n").unwrap();
        assert_eq!(fm.tags, vec!["a", "b"]);

        let fm = parse_frontmatter("---\ntags:\n---\n").unwrap();
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_missing_block_is_default() {
        assert_eq!(parse_frontmatter("# Just a body").unwrap(), Frontmatter::default());
        assert_eq!(parse_frontmatter("---\n---\nbody").unwrap(), Frontmatter::default());
    }

    #[test]
    fn test_set_field_keeps_body_and_other_keys() {
        let content = "---\ntitle: Plan\n---\nLine [[a]]\n";
        let updated = set_field(content, "updated_at", Value::String("now".into())).unwrap();
        let fm = parse_frontmatter(&updated).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Plan"));
        assert_eq!(fm.updated_at.as_deref(), Some("now"));
        assert!(updated.ends_with("---\nLine [[a]]\n"));
    }

    #[test]
    fn test_set_field_creates_block() {
        let updated = set_field("plain body", "gist_id", Value::String("g1".into())).unwrap();
        assert!(updated.starts_with("---\n"));
        assert!(updated.ends_with("---\nplain body"));
        assert_eq!(parse_frontmatter(&updated).unwrap().gist_id.as_deref(), Some("g1"));
    }

    #[test]
    fn test_new_note_content() {
        let content = new_note_content("Weekly Review").unwrap();
        let fm = parse_frontmatter(&content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Weekly Review"));
        assert!(content.contains("# Weekly Review"));
    }
}
