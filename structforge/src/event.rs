//! Build events raised by the two build phases.
//!
//! Only successful outcomes are reported here; failures propagate as
//! [`crate::StructureError`] and abort the build.

use std::path::PathBuf;

/// An event raised during a build run, delivered in occurrence order and at
/// most once per occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A data-access type definition was emitted. `path` is set when the
    /// definition was written to an output directory.
    TypeBuilt { name: String, path: Option<PathBuf> },
    /// A foreign-key constraint was created on the live connection.
    AssociationCreated { description: String },
    /// A belongs-to / has-one constraint already existed; no DDL was run.
    AssociationExists { description: String },
    /// One side of a many-to-many constraint already existed; no DDL was run.
    AssociationSkipped { description: String },
    /// Seed rows were inserted.
    RecordsInserted { description: String },
}

/// Consumer of build events. Any `FnMut(&Event)` closure qualifies.
pub trait Observer {
    fn on_event(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> Observer for F {
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

/// A no-op observer for callers that do not care about events.
pub fn null_observer() -> impl FnMut(&Event) {
    |_| {}
}
