//! # tracefall
//!
//! Causally linked log entries for lightweight tracing across call and
//! process boundaries.
//!
//! Every unit of work emits an [`Entry`]. Entries spawned from one another
//! share a [`ThreadId`], so a whole causal chain can be grouped after the fact
//! without a full tracing protocol.
//!
//! ## Features
//!
//! - [`Entry`] — Identity, thread membership, timing, outcome and payload
//! - [`ParentLink`] — Full in-memory parent or an unchecked id-only stub
//! - [`EntryProjection`] — JSON snapshot for transport
//! - [`ShadowReference`] — `(id, thread)` handle for re-linking remotely
//! - [`EntryDefaults`] — Application/environment defaults for new entries
//! - [`EntryEmitter`] — Pluggable destination, with [`TracingEmitter`] by default
//!
//! ## Example
//!
//! ```rust
//! use tracefall::{Entry, EntryEmitter, TracingEmitter, TraceError};
//!
//! let mut job = Entry::new("import");
//! job.set_application("loader").add_data("file", "users.csv");
//!
//! let mut step = job.create_child("parse")?;
//! step.add_note("parse", "1200 rows").success();
//! assert_eq!(step.thread_id(), job.thread_id());
//! assert_eq!(step.get_level(), 1);
//!
//! // Hand the step to another process.
//! let json = step.to_projection().to_json()?;
//! assert!(json.contains("\"threadID\""));
//!
//! // Once the thread is closed no more children can be spawned.
//! job.thread_finish();
//! assert!(matches!(job.create_child("late"), Err(TraceError::ParentAlreadyFinished)));
//!
//! TracingEmitter::new().emit(&step);
//! # Ok::<(), TraceError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod containers;
pub mod emitter;
pub mod entry;
pub mod error;
pub mod id;
pub mod projection;
pub mod types;

// Re-export main types
pub use config::EntryDefaults;
pub use containers::{ExtraData, Note, NoteGroups, Tags};
pub use emitter::{BoxedEmitter, EntryEmitter, NoopEmitter, TracingEmitter};
pub use entry::{Entry, ParentLink};
pub use error::{Result, TraceError};
pub use id::{IdGenerator, RandomIdGenerator};
pub use projection::{EntryProjection, ShadowReference};
pub use types::{EntryId, Environment, ThreadId};
