//! State for the relation composition form.
//!
//! Rows are typed records owned by the state and updated on every edit, so a
//! submission only has to walk them in display order. Row identifiers come
//! from a per-form counter and are never reused, even after removal.

use composer_types::{
    CompositionPayload, RelationKind, RelationRecord, RowId, ValidationError, ValidationPolicy, parse_interval,
};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::TableState};
use thiserror::Error;
use tracing::debug;

use crate::ui::components::common::TextInputState;

/// One relation row as the user currently sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRow {
    pub id: RowId,
    pub service_a: String,
    pub relation: RelationKind,
    pub service_b: String,
    /// Kept while the relation is `after` so switching back restores it.
    pub expected_value: String,
}

impl RelationRow {
    fn new(id: RowId) -> Self {
        Self {
            id,
            service_a: String::new(),
            relation: RelationKind::default(),
            service_b: String::new(),
            expected_value: String::new(),
        }
    }

    /// The record this row contributes to a submission.
    pub fn to_record(&self) -> RelationRecord {
        RelationRecord::from_fields(
            self.service_a.clone(),
            self.relation,
            self.service_b.clone(),
            self.expected_value.clone(),
        )
    }
}

/// Text inputs of the form. The relation select is edited by cycling instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    ServiceA,
    ServiceB,
    ExpectedValue,
    Interval,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Editing,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a submission is already in progress")]
    InFlight,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Default)]
pub struct CompositionFormState {
    pub f_table: FocusFlag,
    pub f_service_a: FocusFlag,
    pub f_relation: FocusFlag,
    pub f_service_b: FocusFlag,
    pub f_expected_value: FocusFlag,
    pub f_interval: FocusFlag,
    pub f_add_button: FocusFlag,
    pub f_remove_button: FocusFlag,
    pub f_submit_button: FocusFlag,

    container: FocusFlag,
    rows: Vec<RelationRow>,
    next_row_id: u64,
    table_state: TableState,
    service_a_input: TextInputState,
    service_b_input: TextInputState,
    expected_value_input: TextInputState,
    interval_input: TextInputState,
    submission: SubmissionState,
    policy: ValidationPolicy,
}

impl CompositionFormState {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Prefill the form from a saved payload. Rows receive fresh identifiers.
    pub fn from_payload(payload: &CompositionPayload, policy: ValidationPolicy) -> Self {
        let mut state = Self::new(policy);
        for record in &payload.compositions {
            let id = state.add_row();
            state.edit_row(id, |row| {
                row.service_a = record.service_a.clone();
                row.relation = record.relation;
                row.service_b = record.service_b.clone();
                row.expected_value = record.expected_value.clone().unwrap_or_default();
            });
        }
        if let Some(interval) = payload.interval {
            state.interval_input.set_input(interval.to_string());
        }
        state.set_selected_row((!state.rows.is_empty()).then_some(0));
        state
    }

    // ----- Rows -----

    pub fn rows(&self) -> &[RelationRow] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&RelationRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    fn position_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Append an empty row, select it and return its identifier.
    pub fn add_row(&mut self) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        self.rows.push(RelationRow::new(id));
        self.set_selected_row(Some(self.rows.len() - 1));
        id
    }

    /// Remove the row with `id`.
    ///
    /// Returns `false` without touching anything when no such row exists,
    /// e.g. when the same row is removed twice.
    pub fn remove_row(&mut self, id: RowId) -> bool {
        let Some(index) = self.position_of(id) else {
            debug!(%id, "ignoring removal of unknown row");
            return false;
        };
        let selected = self.table_state.selected();
        self.rows.remove(index);

        let next_selection = match selected {
            _ if self.rows.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) => Some(current.min(self.rows.len() - 1)),
            None => None,
        };
        self.set_selected_row(next_selection);
        true
    }

    /// Remove the selected row, returning its identifier.
    pub fn remove_selected_row(&mut self) -> Option<RowId> {
        let id = self.selected_row()?.id;
        self.remove_row(id).then_some(id)
    }

    /// Apply `edit` to the row with `id`, keeping the inputs in sync when it
    /// is the selected row. Returns `false` when the row does not exist.
    pub fn edit_row(&mut self, id: RowId, edit: impl FnOnce(&mut RelationRow)) -> bool {
        let Some(index) = self.position_of(id) else {
            return false;
        };
        edit(&mut self.rows[index]);
        if self.table_state.selected() == Some(index) {
            self.load_inputs_for_selected_row();
        }
        true
    }

    // ----- Selection -----

    pub fn table_state(&self) -> &TableState {
        &self.table_state
    }

    pub fn table_state_mut(&mut self) -> &mut TableState {
        &mut self.table_state
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.table_state.selected().filter(|index| *index < self.rows.len())
    }

    pub fn selected_row(&self) -> Option<&RelationRow> {
        self.selected_index().and_then(|index| self.rows.get(index))
    }

    pub fn set_selected_row(&mut self, maybe_index: Option<usize>) {
        let normalized = maybe_index.filter(|index| *index < self.rows.len());
        self.table_state.select(normalized);
        self.load_inputs_for_selected_row();
    }

    pub fn select_previous_row(&mut self) {
        let previous = match self.selected_index() {
            Some(index) => index.saturating_sub(1),
            None if self.rows.is_empty() => return,
            None => 0,
        };
        self.set_selected_row(Some(previous));
    }

    pub fn select_next_row(&mut self) {
        let next = match self.selected_index() {
            Some(index) => (index + 1).min(self.rows.len().saturating_sub(1)),
            None if self.rows.is_empty() => return,
            None => 0,
        };
        self.set_selected_row(Some(next));
    }

    // ----- Field editing -----

    /// Cycle the relation select of the selected row.
    pub fn cycle_relation(&mut self) {
        if let Some(index) = self.selected_index() {
            let row = &mut self.rows[index];
            row.relation = row.relation.next();
        }
    }

    pub fn input_state(&self, input: FormInput) -> &TextInputState {
        match input {
            FormInput::ServiceA => &self.service_a_input,
            FormInput::ServiceB => &self.service_b_input,
            FormInput::ExpectedValue => &self.expected_value_input,
            FormInput::Interval => &self.interval_input,
        }
    }

    fn input_state_mut(&mut self, input: FormInput) -> &mut TextInputState {
        match input {
            FormInput::ServiceA => &mut self.service_a_input,
            FormInput::ServiceB => &mut self.service_b_input,
            FormInput::ExpectedValue => &mut self.expected_value_input,
            FormInput::Interval => &mut self.interval_input,
        }
    }

    /// Whether `input` can be edited right now. Row inputs need a selected row.
    pub fn is_input_editable(&self, input: FormInput) -> bool {
        matches!(input, FormInput::Interval) || self.selected_index().is_some()
    }

    pub fn insert_character(&mut self, input: FormInput, character: char) {
        self.edit_input(input, |state| state.insert_char(character));
    }

    pub fn delete_previous_character(&mut self, input: FormInput) {
        self.edit_input(input, TextInputState::backspace);
    }

    pub fn delete_next_character(&mut self, input: FormInput) {
        self.edit_input(input, TextInputState::delete);
    }

    pub fn move_cursor_left(&mut self, input: FormInput) {
        self.input_state_mut(input).move_left();
    }

    pub fn move_cursor_right(&mut self, input: FormInput) {
        self.input_state_mut(input).move_right();
    }

    /// Move the cursor of `input` to a display column.
    pub fn set_cursor_column(&mut self, input: FormInput, column: u16) {
        self.input_state_mut(input).set_cursor_from_column(column);
    }

    /// Replace the whole text of `input`.
    pub fn set_input_text(&mut self, input: FormInput, text: &str) {
        self.edit_input(input, |state| state.set_input(text));
    }

    fn edit_input(&mut self, input: FormInput, edit: impl FnOnce(&mut TextInputState)) {
        if !self.is_input_editable(input) {
            return;
        }
        edit(self.input_state_mut(input));
        self.sync_input_into_row(input);
    }

    fn sync_input_into_row(&mut self, input: FormInput) {
        let Some(index) = self.selected_index() else {
            return;
        };
        let row = &mut self.rows[index];
        match input {
            FormInput::ServiceA => row.service_a = self.service_a_input.input().to_string(),
            FormInput::ServiceB => row.service_b = self.service_b_input.input().to_string(),
            FormInput::ExpectedValue => row.expected_value = self.expected_value_input.input().to_string(),
            FormInput::Interval => {}
        }
    }

    fn load_inputs_for_selected_row(&mut self) {
        match self.selected_index().map(|index| self.rows[index].clone()) {
            Some(row) => {
                self.service_a_input.set_input(row.service_a);
                self.service_b_input.set_input(row.service_b);
                self.expected_value_input.set_input(row.expected_value);
            }
            None => {
                self.service_a_input.clear();
                self.service_b_input.clear();
                self.expected_value_input.clear();
            }
        }
    }

    /// Focus flag of the widget editing `input`.
    pub fn input_focus(&self, input: FormInput) -> &FocusFlag {
        match input {
            FormInput::ServiceA => &self.f_service_a,
            FormInput::ServiceB => &self.f_service_b,
            FormInput::ExpectedValue => &self.f_expected_value,
            FormInput::Interval => &self.f_interval,
        }
    }

    /// Focused text input, if any.
    pub fn focused_input(&self) -> Option<FormInput> {
        if self.f_service_a.get() {
            Some(FormInput::ServiceA)
        } else if self.f_service_b.get() {
            Some(FormInput::ServiceB)
        } else if self.f_expected_value.get() {
            Some(FormInput::ExpectedValue)
        } else if self.f_interval.get() {
            Some(FormInput::Interval)
        } else {
            None
        }
    }

    // ----- Submission -----

    pub fn interval_text(&self) -> &str {
        self.interval_input.input()
    }

    /// Parsed interval, `None` when the field holds no usable number.
    pub fn interval(&self) -> Option<u64> {
        parse_interval(self.interval_input.input())
    }

    /// Build the payload from the rows in display order.
    pub fn collect_payload(&self) -> CompositionPayload {
        CompositionPayload::new(self.rows.iter().map(RelationRow::to_record).collect(), self.interval())
    }

    pub fn is_submitting(&self) -> bool {
        self.submission == SubmissionState::Submitting
    }

    /// Validate and hand out the payload, entering the submitting state.
    ///
    /// Refused while a previous submission is still pending.
    pub fn begin_submit(&mut self) -> Result<CompositionPayload, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        let payload = self.collect_payload();
        payload.validate(&self.policy)?;
        self.submission = SubmissionState::Submitting;
        Ok(payload)
    }

    /// Return to editing once the pending submission has completed.
    pub fn finish_submit(&mut self) {
        self.submission = SubmissionState::Editing;
    }
}

impl HasFocus for CompositionFormState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_table);
        if !self.rows.is_empty() {
            builder.leaf_widget(&self.f_service_a);
            builder.leaf_widget(&self.f_relation);
            builder.leaf_widget(&self.f_service_b);
            builder.leaf_widget(&self.f_expected_value);
        }
        builder.leaf_widget(&self.f_interval);
        builder.leaf_widget(&self.f_add_button);
        if !self.rows.is_empty() {
            builder.leaf_widget(&self.f_remove_button);
        }
        builder.leaf_widget(&self.f_submit_button);
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn type_text(state: &mut CompositionFormState, input: FormInput, text: &str) {
        text.chars().for_each(|character| state.insert_character(input, character));
    }

    #[test]
    fn row_count_tracks_adds_minus_removes_with_unique_ids() {
        let mut state = CompositionFormState::default();
        let ids = (0..5).map(|_| state.add_row()).collect::<Vec<_>>();
        assert!(state.remove_row(ids[1]));
        assert!(state.remove_row(ids[3]));
        state.add_row();

        assert_eq!(state.rows().len(), 5 - 2 + 1);
        let unique = state.rows().iter().map(|row| row.id).collect::<HashSet<_>>();
        assert_eq!(unique.len(), state.rows().len());
    }

    #[test]
    fn identifiers_are_never_reused_after_removal() {
        let mut state = CompositionFormState::default();
        let first = state.add_row();
        assert!(state.remove_row(first));
        let second = state.add_row();
        assert_ne!(first, second);
        assert_eq!(second, RowId(1));
    }

    #[test]
    fn removing_a_row_removes_exactly_that_row() {
        let mut state = CompositionFormState::default();
        let a = state.add_row();
        let b = state.add_row();
        let c = state.add_row();
        assert!(state.remove_row(b));

        let remaining = state.rows().iter().map(|row| row.id).collect::<Vec<_>>();
        assert_eq!(remaining, vec![a, c]);
    }

    #[test]
    fn removing_an_unknown_row_is_a_guarded_no_op() {
        let mut state = CompositionFormState::default();
        let a = state.add_row();
        let b = state.add_row();
        assert!(state.remove_row(a));
        assert!(!state.remove_row(a));
        assert!(!state.remove_row(RowId(42)));
        assert_eq!(state.rows().len(), 1);
        assert_eq!(state.rows()[0].id, b);
    }

    #[test]
    fn after_rows_never_produce_expected_value() {
        let mut state = CompositionFormState::default();
        state.add_row();
        type_text(&mut state, FormInput::ServiceA, "svcA");
        type_text(&mut state, FormInput::ServiceB, "svcB");
        type_text(&mut state, FormInput::ExpectedValue, "leftover");

        let payload = state.collect_payload();
        assert_eq!(payload.compositions[0].relation, RelationKind::After);
        assert_eq!(payload.compositions[0].expected_value, None);
    }

    #[test]
    fn on_value_rows_carry_the_current_expected_value() {
        let mut state = CompositionFormState::default();
        state.add_row();
        state.cycle_relation();
        type_text(&mut state, FormInput::ExpectedValue, "READX");
        state.delete_previous_character(FormInput::ExpectedValue);
        state.insert_character(FormInput::ExpectedValue, 'Y');

        let payload = state.collect_payload();
        assert_eq!(payload.compositions[0].relation, RelationKind::OnValue);
        assert_eq!(payload.compositions[0].expected_value.as_deref(), Some("READY"));
    }

    #[test]
    fn interval_field_maps_to_number_or_null() {
        let mut state = CompositionFormState::default();
        assert_eq!(state.collect_payload().interval, None);

        state.set_input_text(FormInput::Interval, "5");
        assert_eq!(state.collect_payload().interval, Some(5));

        state.set_input_text(FormInput::Interval, "soon");
        assert_eq!(state.collect_payload().interval, None);
    }

    #[test]
    fn single_after_row_submits_the_expected_body() {
        let mut state = CompositionFormState::default();
        state.add_row();
        type_text(&mut state, FormInput::ServiceA, "svcA");
        type_text(&mut state, FormInput::ServiceB, "svcB");

        let payload = state.begin_submit().unwrap();
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"compositions":[{"service_a":"svcA","relation":"after","service_b":"svcB"}],"interval":null}"#
        );
    }

    #[test]
    fn removing_the_first_of_two_rows_submits_only_the_second() {
        let mut state = CompositionFormState::default();
        let first = state.add_row();
        state.add_row();
        assert!(state.remove_row(first));

        state.set_selected_row(Some(0));
        type_text(&mut state, FormInput::ServiceA, "flame_status");
        type_text(&mut state, FormInput::ServiceB, "activate_buzzer");
        state.cycle_relation();
        type_text(&mut state, FormInput::ExpectedValue, "READY");

        let payload = state.begin_submit().unwrap();
        assert_eq!(payload.compositions.len(), 1);
        assert_eq!(payload.compositions[0].expected_value.as_deref(), Some("READY"));
    }

    #[test]
    fn submission_follows_display_order() {
        let mut state = CompositionFormState::default();
        for name in ["one", "two", "three"] {
            state.add_row();
            type_text(&mut state, FormInput::ServiceA, name);
            type_text(&mut state, FormInput::ServiceB, "sink");
        }
        let two = state.rows()[1].id;
        assert!(state.remove_row(two));
        state.add_row();
        type_text(&mut state, FormInput::ServiceA, "four");
        type_text(&mut state, FormInput::ServiceB, "sink");

        let names = state
            .collect_payload()
            .compositions
            .into_iter()
            .map(|record| record.service_a)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["one", "three", "four"]);
    }

    #[test]
    fn second_submit_is_refused_while_in_flight() {
        let mut state = CompositionFormState::default();
        assert!(state.begin_submit().is_ok());
        assert_eq!(state.begin_submit(), Err(SubmitError::InFlight));

        state.finish_submit();
        assert!(!state.is_submitting());
        assert!(state.begin_submit().is_ok());
    }

    #[test]
    fn invalid_rows_block_submission_without_entering_flight() {
        let mut state = CompositionFormState::default();
        state.add_row();
        type_text(&mut state, FormInput::ServiceA, "svcA");

        assert_eq!(
            state.begin_submit(),
            Err(SubmitError::Invalid(ValidationError::MissingServiceB { row: 1 }))
        );
        assert!(!state.is_submitting());
    }

    #[test]
    fn strict_policy_requires_expected_value_for_on_value() {
        let mut state = CompositionFormState::new(ValidationPolicy {
            require_expected_value: true,
        });
        state.add_row();
        type_text(&mut state, FormInput::ServiceA, "a");
        type_text(&mut state, FormInput::ServiceB, "b");
        state.cycle_relation();

        assert_eq!(
            state.begin_submit(),
            Err(SubmitError::Invalid(ValidationError::MissingExpectedValue { row: 1 }))
        );
    }

    #[test]
    fn row_inputs_are_inert_without_a_selected_row() {
        let mut state = CompositionFormState::default();
        state.insert_character(FormInput::ServiceA, 'x');
        assert_eq!(state.input_state(FormInput::ServiceA).input(), "");
        state.insert_character(FormInput::Interval, '9');
        assert_eq!(state.interval(), Some(9));
    }

    #[test]
    fn selection_moves_load_each_rows_values() {
        let mut state = CompositionFormState::default();
        state.add_row();
        type_text(&mut state, FormInput::ServiceA, "first");
        state.add_row();
        type_text(&mut state, FormInput::ServiceA, "second");

        state.select_previous_row();
        assert_eq!(state.input_state(FormInput::ServiceA).input(), "first");
        state.select_next_row();
        assert_eq!(state.input_state(FormInput::ServiceA).input(), "second");
    }

    #[test]
    fn removing_selected_row_keeps_a_neighbour_selected() {
        let mut state = CompositionFormState::default();
        state.add_row();
        state.add_row();
        let last = state.add_row();
        assert_eq!(state.remove_selected_row(), Some(last));
        assert_eq!(state.selected_index(), Some(1));

        state.set_selected_row(Some(0));
        state.remove_selected_row();
        assert_eq!(state.selected_index(), Some(0));
        state.remove_selected_row();
        assert_eq!(state.selected_index(), None);
        assert_eq!(state.remove_selected_row(), None);
    }

    #[test]
    fn from_payload_prefills_rows_and_interval() {
        let payload = CompositionPayload::new(
            vec![
                RelationRecord::from_fields("a", RelationKind::After, "b", ""),
                RelationRecord::from_fields("c", RelationKind::OnValue, "d", "30"),
            ],
            Some(10),
        );
        let state = CompositionFormState::from_payload(&payload, ValidationPolicy::default());

        assert_eq!(state.rows().len(), 2);
        assert_eq!(state.selected_index(), Some(0));
        assert_eq!(state.interval_text(), "10");
        assert_eq!(state.collect_payload(), payload);
    }
}
