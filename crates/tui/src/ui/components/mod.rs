//! UI components: relation editor, activity log, notification modal.

pub mod common;
pub mod component;
pub mod composition;
pub mod logs;

pub use common::StatusModal;
pub use component::*;
pub use composition::CompositionComponent;
pub use logs::LogsComponent;
