use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};

use crate::model::Note;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFrequency {
    pub tag: String,
    /// Number of notes in the result set carrying the tag.
    pub count: usize,
}

/// Tag cloud for a result set.
///
/// Drops tags carried by every note, and parent tags whose descendants all
/// share the parent's count. Sorted by descending count; ties keep the order
/// in which tags were first seen.
pub fn tag_cloud<N: Borrow<Note>>(notes: &[N]) -> Vec<TagFrequency> {
    let mut counts: Vec<TagFrequency> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for note in notes {
        let mut seen = HashSet::new();
        for tag in &note.borrow().tags {
            if !seen.insert(tag.as_str()) {
                continue;
            }
            match index.get(tag) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(tag.clone(), counts.len());
                    counts.push(TagFrequency {
                        tag: tag.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    let total = notes.len();
    let mut cloud: Vec<TagFrequency> = counts
        .iter()
        .filter(|entry| entry.count != total && !is_subsumed(entry, &counts))
        .cloned()
        .collect();
    cloud.sort_by(|a, b| b.count.cmp(&a.count));
    cloud
}

/// A tag adds nothing when it has descendants and all of them share its count.
fn is_subsumed(entry: &TagFrequency, counts: &[TagFrequency]) -> bool {
    let prefix = format!("{}/", entry.tag);
    let mut descendants = counts
        .iter()
        .filter(|other| other.tag.starts_with(&prefix))
        .peekable();
    descendants.peek().is_some() && descendants.all(|d| d.count == entry.count)
}
