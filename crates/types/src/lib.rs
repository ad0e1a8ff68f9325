//! Shared types for the composer workspace.
//!
//! The relation and payload types define the `/save_composition` wire
//! contract. The message and effect enums are the vocabulary the terminal UI
//! uses to move between pure state updates and side effects.

pub mod relation;
pub mod validation;

pub use relation::{
    CompositionPayload, ParseRelationKindError, RelationKind, RelationRecord, SaveCompositionResponse, parse_interval,
};
pub use validation::{ValidationError, ValidationPolicy};

/// Identifier of a relation row. Unique within one form; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "relation-{}", self.0)
    }
}

/// Visual weight of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Error,
}

/// Result of a background command, handed back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The server accepted the composition and replied with a status text.
    CompositionSaved { status: String, relation_count: usize },
    /// The request failed or the response could not be understood.
    CompositionFailed { message: String },
}

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (e.g., throbbers)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
}

/// Side effects requested by state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the payload to `/save_composition`
    SubmitComposition(CompositionPayload),
    // Display a modal view
    ShowModal(Modal),
    // Hide any open modals
    CloseModal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Blocking notification carrying the last submission result
    Status,
}
