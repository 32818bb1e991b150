//! Auxiliary payload carried by an entry.
//!
//! - [`ExtraData`] — free-form key/value payload
//! - [`NoteGroups`] — ordered `(step, note)` annotations
//! - [`Tags`] — set of labels

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Free-form structured payload attached to an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraData(HashMap<String, serde_json::Value>);

impl ExtraData {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no keys are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over keys and values in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    /// Copies every key of `other` into this payload, overwriting on conflict.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>, V: Into<serde_json::Value>> FromIterator<(K, V)> for ExtraData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A single annotation recorded at a named step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// Step label
    pub step: String,
    /// Free text
    pub note: String,
}

/// Ordered annotations, grouped by step label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteGroups(Vec<Note>);

impl NoteGroups {
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a note under `step`.
    pub fn add(&mut self, step: impl Into<String>, note: impl Into<String>) {
        self.0.push(Note {
            step: step.into(),
            note: note.into(),
        });
    }

    /// Iterates notes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.0.iter()
    }

    /// Number of notes across all steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing has been noted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Distinct step labels in the order they first appeared.
    #[must_use]
    pub fn steps(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for note in &self.0 {
            if !seen.contains(&note.step.as_str()) {
                seen.push(note.step.as_str());
            }
        }
        seen
    }

    /// Notes recorded under `step`, in insertion order.
    pub fn notes_for<'a>(&'a self, step: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |n| n.step == step)
            .map(|n| n.note.as_str())
    }

    /// Flattens the groups into the ordered pair list used on the wire.
    #[must_use]
    pub fn prepare_for_serialization(&self) -> Vec<Note> {
        self.0.clone()
    }
}

impl From<Vec<Note>> for NoteGroups {
    fn from(notes: Vec<Note>) -> Self {
        Self(notes)
    }
}

/// Set of free-form labels, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeSet<String>);

impl Tags {
    /// Creates an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag, returning false if it was already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    /// Returns true if `tag` is present.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Adds every tag from `tags`.
    pub fn extend<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(tags.into_iter().map(Into::into));
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
