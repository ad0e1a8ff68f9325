use thiserror::Error;

use crate::relation::{CompositionPayload, RelationRecord};

/// Controls how strictly a composition is checked before submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Reject `on_value` relations whose expected value is blank.
    pub require_expected_value: bool,
}

/// A record that cannot be submitted. Rows are numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("relation {row}: service A is required")]
    MissingServiceA { row: usize },
    #[error("relation {row}: service B is required")]
    MissingServiceB { row: usize },
    #[error("relation {row}: an expected value is required for on_value relations")]
    MissingExpectedValue { row: usize },
}

impl ValidationError {
    pub fn row(&self) -> usize {
        match self {
            ValidationError::MissingServiceA { row }
            | ValidationError::MissingServiceB { row }
            | ValidationError::MissingExpectedValue { row } => *row,
        }
    }
}

impl RelationRecord {
    /// Checks this record; `row` is its 1-based position in the composition.
    pub fn validate(&self, row: usize, policy: &ValidationPolicy) -> Result<(), ValidationError> {
        if self.service_a.trim().is_empty() {
            return Err(ValidationError::MissingServiceA { row });
        }
        if self.service_b.trim().is_empty() {
            return Err(ValidationError::MissingServiceB { row });
        }
        if policy.require_expected_value
            && self.relation.takes_expected_value()
            && self.expected_value.as_deref().is_none_or(|value| value.trim().is_empty())
        {
            return Err(ValidationError::MissingExpectedValue { row });
        }
        Ok(())
    }
}

impl CompositionPayload {
    /// Validates every record, reporting the first failure in display order.
    pub fn validate(&self, policy: &ValidationPolicy) -> Result<(), ValidationError> {
        self.compositions
            .iter()
            .enumerate()
            .try_for_each(|(index, record)| record.validate(index + 1, policy))
    }
}
