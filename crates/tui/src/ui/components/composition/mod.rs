mod composition_component;
pub mod state;

pub use composition_component::CompositionComponent;
pub use state::{CompositionFormState, FormInput, RelationRow, SubmissionState, SubmitError};
