//! The traced entry and its causal links.
//!
//! An [`Entry`] is created as the root of its own thread. Children spawned
//! from it inherit the thread, application and environment, and point back
//! at a shared snapshot of the entry they were spawned from.
//!
//! Entries are plain records: mutate each one from a single owner at a time.

use crate::config::EntryDefaults;
use crate::containers::{ExtraData, NoteGroups, Tags};
use crate::error::{Result, TraceError};
use crate::id::{IdGenerator, RandomIdGenerator};
use crate::types::{EntryId, Environment, ThreadId};
use chrono::{DateTime, Utc};
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::{debug, warn};

/// Link from an entry to its parent.
#[derive(Debug, Clone, Default)]
pub enum ParentLink {
    /// Root entry.
    #[default]
    None,
    /// Shared snapshot of the in-memory parent.
    Full(Arc<Entry>),
    /// Detached reference to a parent living elsewhere, typically another
    /// process. Never validated.
    Stub {
        /// Parent entry id
        id: EntryId,
        /// Thread the parent belongs to
        thread_id: ThreadId,
    },
}

impl ParentLink {
    /// Returns true for a root entry.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Parent id, if linked.
    #[must_use]
    pub fn id(&self) -> Option<EntryId> {
        match self {
            Self::None => None,
            Self::Full(parent) => Some(parent.id),
            Self::Stub { id, .. } => Some(*id),
        }
    }

    /// Parent thread, if linked.
    #[must_use]
    pub fn thread_id(&self) -> Option<ThreadId> {
        match self {
            Self::None => None,
            Self::Full(parent) => Some(parent.thread_id),
            Self::Stub { thread_id, .. } => Some(*thread_id),
        }
    }

    /// The full parent entry, when one is held.
    #[must_use]
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Self::Full(parent) => Some(parent.as_ref()),
            _ => None,
        }
    }
}

/// A single traced event.
#[derive(Debug, Clone)]
pub struct Entry {
    pub(crate) id: EntryId,
    pub(crate) thread_id: ThreadId,
    pub(crate) name: String,
    pub(crate) application: String,
    pub(crate) environment: Environment,
    pub(crate) data: ExtraData,
    pub(crate) notes: NoteGroups,
    pub(crate) tags: Tags,
    pub(crate) result: bool,
    pub(crate) finish: bool,
    pub(crate) error: Option<String>,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) end_time: Option<DateTime<Utc>>,
    pub(crate) parent: ParentLink,
}

impl Entry {
    /// Creates a root entry with the built-in defaults (`"App"`, `dev`).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_defaults(name, &EntryDefaults::default(), &RandomIdGenerator)
    }

    /// Creates a root entry using the given defaults and id source.
    #[must_use]
    pub fn with_defaults(
        name: impl Into<String>,
        defaults: &EntryDefaults,
        ids: &dyn IdGenerator,
    ) -> Self {
        let id = EntryId(ids.generate());
        Self {
            id,
            thread_id: ThreadId::from(id),
            name: name.into(),
            application: defaults.application.clone(),
            environment: defaults.environment,
            data: ExtraData::new(),
            notes: NoteGroups::new(),
            tags: Tags::new(),
            result: false,
            finish: false,
            error: None,
            start_time: Utc::now(),
            end_time: None,
            parent: ParentLink::None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Unique id of this entry.
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// Thread this entry belongs to.
    #[must_use]
    pub const fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Human label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning application or service.
    #[must_use]
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Deployment environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Free-form payload.
    #[must_use]
    pub const fn data(&self) -> &ExtraData {
        &self.data
    }

    /// Step annotations.
    #[must_use]
    pub const fn notes(&self) -> &NoteGroups {
        &self.notes
    }

    /// Labels.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Outcome; only meaningful once [`end_time`](Self::end_time) is set.
    #[must_use]
    pub const fn result(&self) -> bool {
        self.result
    }

    /// Whether the causal thread has been closed at this entry.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finish
    }

    /// Failure message recorded by [`fail`](Self::fail).
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// When the entry was created.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// When the entry reached its outcome.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Link to the parent entry.
    #[must_use]
    pub const fn parent(&self) -> &ParentLink {
        &self.parent
    }

    /// Id of the parent entry, if linked.
    #[must_use]
    pub fn parent_id(&self) -> Option<EntryId> {
        self.parent.id()
    }

    /// Thread of the parent entry, if linked.
    #[must_use]
    pub fn parent_thread_id(&self) -> Option<ThreadId> {
        self.parent.thread_id()
    }

    /// Returns true if the entry has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Sets the human label.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Sets the owning application.
    pub fn set_application(&mut self, application: impl Into<String>) -> &mut Self {
        self.application = application.into();
        self
    }

    /// Sets the deployment environment.
    pub fn set_environment(&mut self, environment: Environment) -> &mut Self {
        self.environment = environment;
        self
    }

    /// Inserts or overwrites a payload value.
    pub fn add_data(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> &mut Self {
        self.data.set(key, value);
        self
    }

    /// Appends a note under `step`.
    pub fn add_note(&mut self, step: impl Into<String>, note: impl Into<String>) -> &mut Self {
        self.notes.add(step, note);
        self
    }

    /// Adds a label.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.insert(tag);
        self
    }

    /// Stamps the end time with the current time, overwriting any previous stamp.
    pub fn finish_time_end(&mut self) -> &mut Self {
        self.end_time = Some(Utc::now());
        self
    }

    /// Closes the causal thread at this entry. Independent of the outcome.
    pub fn thread_finish(&mut self) -> &mut Self {
        self.finish = true;
        self
    }

    // ------------------------------------------------------------------
    // Outcome
    // ------------------------------------------------------------------

    /// Records a successful outcome and stamps the end time.
    pub fn success(&mut self) -> &mut Self {
        self.result = true;
        self.error = None;
        self.finish_time_end();
        debug!(
            target: "tracefall",
            entry_id = %self.id,
            thread_id = %self.thread_id,
            "entry succeeded"
        );
        self
    }

    /// Records a failed outcome with its cause and stamps the end time.
    pub fn fail(&mut self, error: impl fmt::Display) -> &mut Self {
        self.record_failure(Some(error.to_string()))
    }

    /// Records a failed outcome without a cause.
    ///
    /// Accepted for producers that have nothing to report, but leaves
    /// consumers with no detail; prefer [`fail`](Self::fail).
    pub fn fail_without_error(&mut self) -> &mut Self {
        self.record_failure(None)
    }

    fn record_failure(&mut self, error: Option<String>) -> &mut Self {
        self.result = false;
        self.error = error;
        self.finish_time_end();
        debug!(
            target: "tracefall",
            entry_id = %self.id,
            thread_id = %self.thread_id,
            error = self.error.as_deref().unwrap_or(""),
            "entry failed"
        );
        self
    }

    // ------------------------------------------------------------------
    // Linking
    // ------------------------------------------------------------------

    /// Links this entry to `parent`.
    ///
    /// The link is left unchanged on error.
    ///
    /// # Errors
    ///
    /// - [`TraceError::ParentAlreadyFinished`] if the parent closed its thread
    /// - [`TraceError::ParentThreadMismatch`] if the parent is on another thread
    pub fn set_parent(&mut self, parent: impl Into<Arc<Self>>) -> Result<()> {
        let parent = parent.into();

        if parent.finish {
            warn!(
                target: "tracefall",
                entry_id = %self.id,
                parent_id = %parent.id,
                "rejected link to finished parent"
            );
            return Err(TraceError::ParentAlreadyFinished);
        }

        if parent.thread_id != self.thread_id {
            warn!(
                target: "tracefall",
                entry_id = %self.id,
                parent_id = %parent.id,
                thread_id = %self.thread_id,
                parent_thread_id = %parent.thread_id,
                "rejected link across threads"
            );
            return Err(TraceError::ParentThreadMismatch {
                expected: self.thread_id,
                found: parent.thread_id,
            });
        }

        self.parent = ParentLink::Full(parent);
        Ok(())
    }

    /// Links this entry to a parent known only by id, on this entry's thread.
    ///
    /// No validation happens: the parent is not available to inspect.
    pub fn set_parent_id(&mut self, id: EntryId) -> &mut Self {
        self.parent = ParentLink::Stub {
            id,
            thread_id: self.thread_id,
        };
        self
    }

    /// Spawns a child on this entry's thread.
    ///
    /// The child holds a snapshot of this entry as taken now. Taking the
    /// snapshot clones this entry's payload (data, notes, tags) once per
    /// child; use [`create_child_of`](Self::create_child_of) to share one
    /// parent allocation between many children.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::ParentAlreadyFinished`] if this entry closed its thread.
    pub fn create_child(&self, name: impl Into<String>) -> Result<Self> {
        self.check_can_spawn()?;
        Ok(Self::spawn(self, Arc::new(self.clone()), name))
    }

    /// Spawns a child pointing at an already shared parent without copying it.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::ParentAlreadyFinished`] if `parent` closed its thread.
    pub fn create_child_of(parent: &Arc<Self>, name: impl Into<String>) -> Result<Self> {
        parent.check_can_spawn()?;
        Ok(Self::spawn(parent, Arc::clone(parent), name))
    }

    fn check_can_spawn(&self) -> Result<()> {
        if self.finish {
            warn!(
                target: "tracefall",
                entry_id = %self.id,
                thread_id = %self.thread_id,
                "refused to spawn child from finished entry"
            );
            return Err(TraceError::ParentAlreadyFinished);
        }
        Ok(())
    }

    fn spawn(parent: &Self, link: Arc<Self>, name: impl Into<String>) -> Self {
        let mut child = Self::new(name);
        child.thread_id = parent.thread_id;
        child.application.clone_from(&parent.application);
        child.environment = parent.environment;
        child.parent = ParentLink::Full(link);

        debug!(
            target: "tracefall",
            entry_id = %child.id,
            parent_id = %parent.id,
            thread_id = %child.thread_id,
            "spawned child entry"
        );
        child
    }

    /// Spawns a child seeded with `data`.
    ///
    /// Besides the payload, the child is tagged with this entry's tags plus
    /// this entry's id and thread id.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::ParentAlreadyFinished`] if this entry closed its thread.
    pub fn create_child_with_data(&self, name: impl Into<String>, data: ExtraData) -> Result<Self> {
        let mut child = self.create_child(name)?;
        child.data = data;
        child.tags = self.tags.clone();
        child.tags.insert(self.id.to_string());
        child.tags.insert(self.thread_id.to_string());
        Ok(child)
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Number of parent hops up to the root; a root is level 0.
    ///
    /// A stub parent counts as one hop and ends the walk.
    #[must_use]
    pub fn get_level(&self) -> usize {
        let mut level = 0;
        let mut link = &self.parent;
        loop {
            match link {
                ParentLink::None => return level,
                ParentLink::Stub { .. } => return level + 1,
                ParentLink::Full(parent) => {
                    level += 1;
                    link = &parent.parent;
                }
            }
        }
    }

    /// Like [`get_level`](Self::get_level) but gives up after `max_hops`.
    ///
    /// Returns `None` if the chain is longer than `max_hops`.
    #[must_use]
    pub fn level_bounded(&self, max_hops: usize) -> Option<usize> {
        let mut level = 0;
        let mut link = &self.parent;
        loop {
            let next = match link {
                ParentLink::None => return Some(level),
                ParentLink::Stub { .. } => None,
                ParentLink::Full(parent) => Some(&parent.parent),
            };
            if level == max_hops {
                return None;
            }
            level += 1;
            match next {
                Some(parent_link) => link = parent_link,
                None => return Some(level),
            }
        }
    }

    /// Renders the chain from this entry up to its root as indented text.
    ///
    /// Each node is written at its own level, one tab per level.
    #[must_use]
    pub fn ancestry_tree(&self) -> String {
        let mut level = self.get_level();
        let mut text = String::new();
        let mut current = Some(self);

        while let Some(entry) = current {
            let offset = "\t".repeat(level);
            let parent = entry.parent_id().map(|id| id.to_string()).unwrap_or_default();
            // writing into a String cannot fail
            let _ = write!(
                text,
                "{offset}- id: {}\n{offset}- time: {}\n{offset}- name: {}\n{offset}- level: {level}\n{offset}- parent: {parent}\n",
                entry.id, entry.start_time, entry.name,
            );

            if let ParentLink::Stub { id, .. } = &entry.parent {
                let stub_level = level.saturating_sub(1);
                let offset = "\t".repeat(stub_level);
                let _ = write!(text, "{offset}- id: {id}\n{offset}- level: {stub_level}\n");
            }

            current = entry.parent.entry();
            level = level.saturating_sub(1);
        }

        text
    }
}

/// Releases exclusively owned ancestors in a loop rather than recursively.
impl Drop for Entry {
    fn drop(&mut self) {
        let mut link = std::mem::take(&mut self.parent);
        while let ParentLink::Full(parent) = link {
            match Arc::into_inner(parent) {
                Some(mut parent) => link = std::mem::take(&mut parent.parent),
                None => break,
            }
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.start_time, self.name)
    }
}
