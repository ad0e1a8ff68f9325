mod status_modal;

pub mod text_input;

pub use status_modal::{StatusModal, StatusModalState};
pub use text_input::TextInputState;
