//! Transport forms of an entry.
//!
//! This module provides:
//! - [`EntryProjection`] — point-in-time JSON snapshot of an entry
//! - [`ShadowReference`] — `(id, thread)` handle for re-linking across a boundary
//!
//! Timestamps travel as signed nanoseconds since the Unix epoch and parents
//! travel as their id only.

use crate::containers::{ExtraData, Note, NoteGroups, Tags};
use crate::entry::{Entry, ParentLink};
use crate::error::Result;
use crate::types::{from_unix_nanos, unix_nanos, EntryId, Environment, ThreadId};
use serde::{Deserialize, Serialize};

/// Serialized snapshot of an [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryProjection {
    /// Entry id
    pub id: EntryId,
    /// Thread id
    #[serde(rename = "threadID")]
    pub thread_id: ThreadId,
    /// Human label
    pub name: String,
    /// Owning application
    #[serde(rename = "app")]
    pub application: String,
    /// Start time, nanoseconds since epoch
    pub time: i64,
    /// End time, nanoseconds since epoch
    #[serde(rename = "timeEnd")]
    pub time_end: Option<i64>,
    /// Outcome
    pub result: bool,
    /// Thread closed at this entry
    pub finish: bool,
    /// Deployment environment
    #[serde(rename = "env")]
    pub environment: Environment,
    /// Failure message
    pub error: Option<String>,
    /// Free-form payload
    #[serde(default)]
    pub data: ExtraData,
    /// Ordered step notes
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Labels
    #[serde(default)]
    pub tags: Tags,
    /// Parent entry id
    pub parent: Option<EntryId>,
}

impl EntryProjection {
    /// Serializes the projection to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the projection to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses a projection from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Minimal `(id, thread)` reference to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShadowReference {
    /// Entry id
    pub id: EntryId,
    /// Thread id
    #[serde(rename = "threadID")]
    pub thread_id: ThreadId,
}

impl ShadowReference {
    /// Serializes the reference to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a reference from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<ShadowReference> for ParentLink {
    fn from(shadow: ShadowReference) -> Self {
        Self::Stub {
            id: shadow.id,
            thread_id: shadow.thread_id,
        }
    }
}

impl Entry {
    /// Takes a transport snapshot of the entry as it is now.
    #[must_use]
    pub fn to_projection(&self) -> EntryProjection {
        EntryProjection {
            id: self.id,
            thread_id: self.thread_id,
            name: self.name.clone(),
            application: self.application.clone(),
            time: unix_nanos(self.start_time),
            time_end: self.end_time.map(unix_nanos),
            result: self.result,
            finish: self.finish,
            environment: self.environment,
            error: self.error.clone(),
            data: self.data.clone(),
            notes: self.notes.prepare_for_serialization(),
            tags: self.tags.clone(),
            parent: self.parent.id(),
        }
    }

    /// Rebuilds an entry from a projection received over a boundary.
    ///
    /// Only the parent's id travels, so the parent comes back as a stub on
    /// the projection's thread.
    #[must_use]
    pub fn from_projection(projection: &EntryProjection) -> Self {
        let parent = projection.parent.map_or(ParentLink::None, |id| ParentLink::Stub {
            id,
            thread_id: projection.thread_id,
        });

        Self {
            id: projection.id,
            thread_id: projection.thread_id,
            name: projection.name.clone(),
            application: projection.application.clone(),
            environment: projection.environment,
            data: projection.data.clone(),
            notes: NoteGroups::from(projection.notes.clone()),
            tags: projection.tags.clone(),
            result: projection.result,
            finish: projection.finish,
            error: projection.error.clone(),
            start_time: from_unix_nanos(projection.time),
            end_time: projection.time_end.map(from_unix_nanos),
            parent,
        }
    }

    /// Returns the `(id, thread)` handle of this entry.
    #[must_use]
    pub const fn to_shadow(&self) -> ShadowReference {
        ShadowReference {
            id: self.id,
            thread_id: self.thread_id,
        }
    }

    /// Builds a placeholder entry standing in for the shadowed one.
    #[must_use]
    pub fn from_shadow(shadow: &ShadowReference) -> Self {
        let mut entry = Self::new("");
        entry.id = shadow.id;
        entry.thread_id = shadow.thread_id;
        entry
    }

    /// Re-links this entry under a parent received as a shadow reference.
    ///
    /// The parent becomes a stub and this entry moves onto the shadow's
    /// thread. `None` leaves the entry untouched.
    pub fn reconstruct_from_shadow(&mut self, shadow: Option<&ShadowReference>) -> &mut Self {
        if let Some(shadow) = shadow {
            self.parent = ParentLink::from(*shadow);
            self.thread_id = shadow.thread_id;
        }
        self
    }
}
