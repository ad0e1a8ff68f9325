//! Application state for the composer TUI.
//!
//! `App` owns the form, the notification modal and the activity log, and
//! turns user intents and background results into `Effect`s for the runtime.

use std::rc::Rc;

use composer_api::CompositionClient;
use composer_types::{Effect, ExecOutcome, Modal, Msg, RowId};
use rat_focus::{Focus, FocusBuilder};
use tracing::{info, warn};

use crate::ui::components::common::StatusModalState;
use crate::ui::components::composition::{CompositionFormState, SubmitError};
use crate::ui::components::logs::LogsState;
use crate::ui::theme::Theme;

/// Cross-cutting shared context owned by the App.
#[derive(Debug)]
pub struct SharedCtx {
    /// Active color theme
    pub theme: Box<dyn Theme>,
    /// Client used for submissions
    pub client: CompositionClient,
}

#[derive(Debug)]
pub struct App {
    pub ctx: SharedCtx,
    pub composition: CompositionFormState,
    pub status_modal: StatusModalState,
    pub logs: LogsState,
    pub focus: Rc<Focus>,
    pub open_modal_kind: Option<Modal>,
    /// Animation frame for the submit throbber
    pub throbber_idx: usize,
}

impl App {
    pub fn new(ctx: SharedCtx, composition: CompositionFormState) -> Self {
        let focus = Rc::new(FocusBuilder::build_for(&composition));
        Self {
            ctx,
            composition,
            status_modal: StatusModalState::default(),
            logs: LogsState::default(),
            focus,
            open_modal_kind: None,
            throbber_idx: 0,
        }
    }

    /// Rebuild the focus tree after the set of focusable widgets changed.
    pub fn rebuild_focus(&mut self) {
        let old_focus = std::mem::take(&mut self.focus);
        self.focus = Rc::new(FocusBuilder::rebuild_for(
            &self.composition,
            Some(Rc::unwrap_or_clone(old_focus)),
        ));
    }

    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.composition.is_submitting() {
                    self.throbber_idx = (self.throbber_idx + 1) % 10;
                }
                Vec::new()
            }
            Msg::Resize(..) => Vec::new(),
            Msg::ExecCompleted(outcome) => self.handle_exec_outcome(outcome),
        }
    }

    fn handle_exec_outcome(&mut self, outcome: &ExecOutcome) -> Vec<Effect> {
        self.composition.finish_submit();
        self.throbber_idx = 0;
        match outcome {
            ExecOutcome::CompositionSaved { status, relation_count } => {
                info!(relation_count, %status, "composition saved");
                self.logs.info(format!("Saved {relation_count} relation(s): {status}"));
                self.status_modal.show_status(status.clone());
            }
            ExecOutcome::CompositionFailed { message } => {
                warn!(%message, "composition submission failed");
                self.logs.error(format!("Submission failed: {message}"));
                self.status_modal.show_error("Submission failed", message.clone());
            }
        }
        vec![Effect::ShowModal(Modal::Status)]
    }

    /// Append a relation row and log it.
    pub fn add_relation(&mut self) -> RowId {
        let id = self.composition.add_row();
        self.logs.info(format!("Added {id}"));
        self.rebuild_focus();
        id
    }

    /// Remove the selected relation row, if any.
    pub fn remove_selected_relation(&mut self) -> Option<RowId> {
        let removed = self.composition.remove_selected_row();
        if let Some(id) = removed {
            self.logs.info(format!("Removed {id}"));
            self.rebuild_focus();
        }
        removed
    }

    /// Validate the form and request a submission.
    ///
    /// Invalid forms open the error notification instead; a request that is
    /// already pending makes this a logged no-op.
    pub fn request_submit(&mut self) -> Vec<Effect> {
        match self.composition.begin_submit() {
            Ok(payload) => {
                let count = payload.compositions.len();
                info!(relations = count, interval = ?payload.interval, "submitting composition");
                self.logs.info(format!("Submitting {count} relation(s)"));
                vec![Effect::SubmitComposition(payload)]
            }
            Err(SubmitError::InFlight) => {
                warn!("submit ignored; a submission is already in progress");
                self.logs.warn("A submission is already in progress");
                Vec::new()
            }
            Err(SubmitError::Invalid(error)) => {
                self.logs.error(error.to_string());
                self.status_modal.show_error("Cannot submit composition", error.to_string());
                vec![Effect::ShowModal(Modal::Status)]
            }
        }
    }
}

/// App pointed at a local server with an empty form.
#[cfg(test)]
pub(crate) fn test_app() -> App {
    use composer_api::DEFAULT_TIMEOUT;
    use composer_types::ValidationPolicy;

    use crate::ui::theme::NordTheme;

    let ctx = SharedCtx {
        theme: Box::new(NordTheme::new()),
        client: CompositionClient::new("http://127.0.0.1:8080", DEFAULT_TIMEOUT).unwrap(),
    };
    App::new(ctx, CompositionFormState::new(ValidationPolicy::default()))
}

#[cfg(test)]
mod tests {
    use composer_types::Severity;

    use super::*;
    use crate::ui::components::composition::FormInput;

    fn fill_valid_row(app: &mut App) {
        app.add_relation();
        app.composition.set_input_text(FormInput::ServiceA, "svcA");
        app.composition.set_input_text(FormInput::ServiceB, "svcB");
    }

    #[test]
    fn submit_emits_payload_effect_and_blocks_resubmission() {
        let mut app = test_app();
        fill_valid_row(&mut app);

        let effects = app.request_submit();
        assert!(matches!(effects.as_slice(), [Effect::SubmitComposition(payload)] if payload.compositions.len() == 1));
        assert!(app.request_submit().is_empty());
        assert!(app.composition.is_submitting());
    }

    #[test]
    fn invalid_form_opens_error_notification_without_request() {
        let mut app = test_app();
        app.add_relation();

        let effects = app.request_submit();
        assert_eq!(effects, vec![Effect::ShowModal(Modal::Status)]);
        assert_eq!(app.status_modal.severity(), Severity::Error);
        assert_eq!(app.status_modal.message(), "relation 1: service A is required");
        assert!(!app.composition.is_submitting());
    }

    #[test]
    fn saved_outcome_shows_server_status() {
        let mut app = test_app();
        fill_valid_row(&mut app);
        app.request_submit();

        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::CompositionSaved {
            status: "Composition saved and execution started".into(),
            relation_count: 1,
        })));

        assert_eq!(effects, vec![Effect::ShowModal(Modal::Status)]);
        assert_eq!(app.status_modal.severity(), Severity::Info);
        assert_eq!(app.status_modal.message(), "Composition saved and execution started");
        assert!(!app.composition.is_submitting());
        assert_eq!(app.composition.rows().len(), 1);
    }

    #[test]
    fn failed_outcome_shows_distinguishable_error() {
        let mut app = test_app();
        fill_valid_row(&mut app);
        app.request_submit();

        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::CompositionFailed {
            message: "network error: connection refused".into(),
        })));

        assert_eq!(app.status_modal.severity(), Severity::Error);
        assert_eq!(app.status_modal.title(), "Submission failed");
        assert!(!app.composition.is_submitting());
    }

    #[test]
    fn tick_animates_only_while_submitting() {
        let mut app = test_app();
        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 0);

        app.request_submit();
        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 1);
    }

    #[test]
    fn removing_without_selection_does_nothing() {
        let mut app = test_app();
        assert_eq!(app.remove_selected_relation(), None);
        let id = app.add_relation();
        assert_eq!(app.remove_selected_relation(), Some(id));
        assert!(app.composition.rows().is_empty());
    }
}
