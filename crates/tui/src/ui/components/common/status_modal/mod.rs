mod state;
mod status_modal_component;

pub use state::StatusModalState;
pub use status_modal_component::StatusModal;
