//! Audit event model
//!
//! One event records one fact: a named event type plus a flat mapping of
//! string keys to scalar values. Events are write-once; builders return a
//! new value and nothing mutates a recorded event.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar value carried in an audit event field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuditValue {
    /// Text value
    Text(String),
    /// Signed integer value
    Integer(i64),
    /// Unsigned integer value (byte counts, attempt ids)
    Unsigned(u64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
}

impl fmt::Display for AuditValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditValue::Text(s) => f.write_str(s),
            AuditValue::Integer(v) => write!(f, "{v}"),
            AuditValue::Unsigned(v) => write!(f, "{v}"),
            AuditValue::Float(v) => write!(f, "{v}"),
            AuditValue::Boolean(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for AuditValue {
    fn from(value: &str) -> Self {
        AuditValue::Text(value.to_string())
    }
}

impl From<String> for AuditValue {
    fn from(value: String) -> Self {
        AuditValue::Text(value)
    }
}

impl From<i64> for AuditValue {
    fn from(value: i64) -> Self {
        AuditValue::Integer(value)
    }
}

impl From<u64> for AuditValue {
    fn from(value: u64) -> Self {
        AuditValue::Unsigned(value)
    }
}

impl From<f64> for AuditValue {
    fn from(value: f64) -> Self {
        AuditValue::Float(value)
    }
}

impl From<bool> for AuditValue {
    fn from(value: bool) -> Self {
        AuditValue::Boolean(value)
    }
}

/// A single auditable fact
///
/// Field order is stable (sorted by key) so serialized events diff cleanly
/// across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event type, e.g. `firmware_update` or `fault_injection`
    pub name: String,

    /// Flat key/value payload for this event
    pub fields: BTreeMap<String, AuditValue>,

    /// When the event was constructed (UTC)
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

impl AuditEvent {
    /// Create an event with an empty payload, timestamped now
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
            recorded_at: chrono::Utc::now(),
        }
    }

    /// Attach a field, consuming and returning the event
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<AuditValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a field by key
    pub fn field(&self, key: &str) -> Option<&AuditValue> {
        self.fields.get(key)
    }

    /// Render the payload as a single JSON object for log transports
    ///
    /// # Errors
    ///
    /// Returns a serialization error if a float field is non-finite.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_fields() {
        let event = AuditEvent::new("firmware_update")
            .with_field("status", "success")
            .with_field("attempt_id", 7u64)
            .with_field("rollback_performed", false);

        assert_eq!(event.name, "firmware_update");
        assert_eq!(event.field("status"), Some(&AuditValue::from("success")));
        assert_eq!(event.field("attempt_id"), Some(&AuditValue::Unsigned(7)));
        assert_eq!(
            event.field("rollback_performed"),
            Some(&AuditValue::Boolean(false))
        );
    }

    #[test]
    fn later_field_wins_on_duplicate_key() {
        let event = AuditEvent::new("fault_injection")
            .with_field("severity", "warning")
            .with_field("severity", "critical");

        assert_eq!(event.field("severity"), Some(&AuditValue::from("critical")));
    }

    #[test]
    fn serializes_round_trip() -> Result<(), serde_json::Error> {
        let event = AuditEvent::new("firmware_rollback")
            .with_field("status", "rolled_back")
            .with_field("duration_ms", 120i64);

        let json = event.to_json()?;
        let back: AuditEvent = serde_json::from_str(&json)?;
        assert_eq!(back, event);
        Ok(())
    }
}
