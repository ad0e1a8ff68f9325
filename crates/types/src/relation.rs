//! Relation records and the submission payload sent to `/save_composition`.
//!
//! A composition is the full set of relation records a user describes in one
//! form, plus an optional polling interval. These types define the exact wire
//! shape: `expected_value` is omitted (not emptied) for `after` relations and
//! `interval` is always present, serialised as `null` when unset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The dependency type between two services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Service A runs after service B.
    #[default]
    After,
    /// Service A waits until service B reports an expected value.
    OnValue,
}

impl RelationKind {
    /// All kinds in the order a select control offers them.
    pub const ALL: [RelationKind; 2] = [RelationKind::After, RelationKind::OnValue];

    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::After => "after",
            RelationKind::OnValue => "on_value",
        }
    }

    /// The next kind in select order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            RelationKind::After => RelationKind::OnValue,
            RelationKind::OnValue => RelationKind::After,
        }
    }

    /// Whether records of this kind carry an `expected_value`.
    pub fn takes_expected_value(&self) -> bool {
        matches!(self, RelationKind::OnValue)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown relation kind '{0}', expected 'after' or 'on_value'")]
pub struct ParseRelationKindError(pub String);

impl FromStr for RelationKind {
    type Err = ParseRelationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseRelationKindError(s.to_string()))
    }
}

/// One dependency constraint between two named services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub service_a: String,
    pub relation: RelationKind,
    pub service_b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
}

impl RelationRecord {
    /// Builds a record from raw field values.
    ///
    /// `expected_value` is kept only for `on_value` relations, even when it is
    /// empty; for `after` relations it is dropped entirely.
    pub fn from_fields(
        service_a: impl Into<String>,
        relation: RelationKind,
        service_b: impl Into<String>,
        expected_value: impl Into<String>,
    ) -> Self {
        Self {
            service_a: service_a.into(),
            relation,
            service_b: service_b.into(),
            expected_value: relation.takes_expected_value().then(|| expected_value.into()),
        }
    }

    /// Drops an `expected_value` that the relation kind does not carry.
    pub fn normalized(mut self) -> Self {
        if !self.relation.takes_expected_value() {
            self.expected_value = None;
        }
        self
    }
}

/// Body of `POST /save_composition`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompositionPayload {
    pub compositions: Vec<RelationRecord>,
    /// Re-execution interval in seconds; `null` runs the composition once.
    #[serde(default)]
    pub interval: Option<u64>,
}

impl CompositionPayload {
    pub fn new(compositions: Vec<RelationRecord>, interval: Option<u64>) -> Self {
        Self { compositions, interval }
    }

    /// Normalizes every record, see [`RelationRecord::normalized`]. A zero
    /// interval becomes `None`, as it does when typed into the form.
    pub fn normalized(self) -> Self {
        Self {
            compositions: self.compositions.into_iter().map(RelationRecord::normalized).collect(),
            interval: self.interval.filter(|seconds| *seconds > 0),
        }
    }
}

/// Response body of `POST /save_composition`. Only `status` is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveCompositionResponse {
    pub status: String,
}

/// Parses the interval field the way a browser `parseInt` would, then
/// discards values that are not a usable positive number of seconds.
///
/// Leading whitespace is skipped, an optional sign is accepted and digits are
/// consumed up to the first non-digit. Empty or non-numeric input, zero,
/// negative values and overflow all yield `None`.
///
/// Unlike `parseInt(v) || null`, a negative number such as `-4` is not sent
/// as `-4`: a negative re-execution period has no meaning, so it is treated
/// like a blank field. Values beyond `u64` are dropped for the same reason.
pub fn parse_interval(input: &str) -> Option<u64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let value = rest[..digits_len].parse::<u64>().ok()?;
    if negative || value == 0 {
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn after_record_omits_expected_value_key() {
        let record = RelationRecord::from_fields("svcA", RelationKind::After, "svcB", "ignored");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"service_a": "svcA", "relation": "after", "service_b": "svcB"}));
        assert!(value.get("expected_value").is_none());
    }

    #[test]
    fn on_value_record_keeps_expected_value_even_when_empty() {
        let filled = RelationRecord::from_fields("flame_status", RelationKind::OnValue, "activate_buzzer", "READY");
        assert_eq!(filled.expected_value.as_deref(), Some("READY"));

        let empty = RelationRecord::from_fields("flame_status", RelationKind::OnValue, "activate_buzzer", "");
        let value = serde_json::to_value(&empty).unwrap();
        assert_eq!(value["expected_value"], json!(""));
    }

    #[test]
    fn payload_serializes_missing_interval_as_null() {
        let payload = CompositionPayload::new(
            vec![RelationRecord::from_fields("svcA", RelationKind::After, "svcB", "")],
            None,
        );
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"compositions":[{"service_a":"svcA","relation":"after","service_b":"svcB"}],"interval":null}"#
        );
    }

    #[test]
    fn parse_interval_follows_leading_integer_rules() {
        assert_eq!(parse_interval(""), None);
        assert_eq!(parse_interval("   "), None);
        assert_eq!(parse_interval("abc"), None);
        assert_eq!(parse_interval("5"), Some(5));
        assert_eq!(parse_interval("  12s"), Some(12));
        assert_eq!(parse_interval("3.9"), Some(3));
        assert_eq!(parse_interval("+7"), Some(7));
        assert_eq!(parse_interval("0"), None);
        assert_eq!(parse_interval("-4"), None);
        assert_eq!(parse_interval("  -15s"), None);
        assert_eq!(parse_interval("99999999999999999999999"), None);
    }

    #[test]
    fn relation_kind_round_trips_through_wire_names() {
        assert_eq!("on_value".parse::<RelationKind>(), Ok(RelationKind::OnValue));
        assert_eq!(RelationKind::OnValue.next(), RelationKind::After);
        assert!("before".parse::<RelationKind>().is_err());
    }

    #[test]
    fn normalized_drops_expected_value_on_after_relations() {
        let payload: CompositionPayload = serde_json::from_value(json!({
            "compositions": [
                {"service_a": "a", "relation": "after", "service_b": "b", "expected_value": "1"},
                {"service_a": "c", "relation": "on_value", "service_b": "d", "expected_value": "2"}
            ]
        }))
        .unwrap();
        let payload = payload.normalized();
        assert_eq!(payload.interval, None);
        assert_eq!(payload.compositions[0].expected_value, None);
        assert_eq!(payload.compositions[1].expected_value.as_deref(), Some("2"));
    }
}
