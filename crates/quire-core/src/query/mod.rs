//! Search query grammar and evaluation.
//!
//! A query is whitespace-separated tokens. `key:value[,value2,...]` is a
//! qualifier filter, negated by a leading `-`; every other token is free text.

mod tags;

pub use tags::{tag_cloud, TagFrequency};

use serde::{Deserialize, Serialize};

use crate::model::Note;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Query {
    /// Qualifier filters in the order they were typed; repeated keys stay separate.
    pub filters: Vec<Filter>,
    /// Free-text terms.
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub key: String,
    pub values: Vec<String>,
    pub exclude: bool,
}

pub fn parse_query(text: &str) -> Query {
    let mut query = Query::default();
    for token in text.split_whitespace() {
        match parse_qualifier(token) {
            Some(filter) => query.filters.push(filter),
            None => query.terms.push(token.to_string()),
        }
    }
    query
}

fn parse_qualifier(token: &str) -> Option<Filter> {
    let (exclude, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let (key, raw_values) = rest.split_once(':')?;
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let values: Vec<String> = raw_values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        return None;
    }

    Some(Filter {
        key: key.to_ascii_lowercase(),
        values,
        exclude,
    })
}

impl Query {
    /// Free-text part, terms joined by single spaces.
    pub fn text(&self) -> String {
        self.terms.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.terms.is_empty()
    }

    /// Filters AND together, values inside one filter OR together, and every
    /// free-text term must appear in the title or body (case-insensitive).
    pub fn matches(&self, note: &Note) -> bool {
        if !self.filters.iter().all(|filter| filter.accepts(note)) {
            return false;
        }
        if self.terms.is_empty() {
            return true;
        }
        let title = note.title.to_lowercase();
        let body = note.body.to_lowercase();
        self.terms.iter().all(|term| {
            let term = term.to_lowercase();
            title.contains(&term) || body.contains(&term)
        })
    }
}

impl Filter {
    fn accepts(&self, note: &Note) -> bool {
        let hit = match self.key.as_str() {
            "tag" => self.values.iter().any(|value| {
                note.tags.iter().any(|tag| {
                    tag == value
                        || (tag.len() > value.len()
                            && tag.starts_with(value.as_str())
                            && tag.as_bytes()[value.len()] == b'/')
                })
            }),
            "link" => self
                .values
                .iter()
                .any(|value| note.links.iter().any(|link| link == value)),
            "date" => self.values.iter().any(|value| {
                note.updated_at
                    .as_deref()
                    .is_some_and(|updated| updated.starts_with(value.as_str()))
            }),
            "is" => self.values.iter().any(|value| match value.as_str() {
                "private" => note.is_private,
                "public" => !note.is_private,
                _ => false,
            }),
            // Unknown qualifiers do not narrow the result.
            _ => return true,
        };
        hit != self.exclude
    }
}
