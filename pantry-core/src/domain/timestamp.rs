//! Store-assigned timestamps
//!
//! Opaque to clients beyond ordering and display.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// A stamp strictly later than `previous`, using the clock when it is ahead
    pub fn next_after(previous: Option<Timestamp>) -> Self {
        let now = Self::now();
        match previous {
            Some(prev) if prev >= now => Self(prev.0 + Duration::microseconds(1)),
            _ => now,
        }
    }

    /// Read a stamp previously written into a document field
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_value(self) -> Value {
        Value::String(self.0.to_rfc3339())
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_after_is_strictly_later() {
        let far_future = Timestamp::from(Utc::now() + Duration::days(1));
        let next = Timestamp::next_after(Some(far_future));
        assert!(next > far_future);
    }

    #[test]
    fn test_value_roundtrip_keeps_order() {
        let a = Timestamp::now();
        let b = Timestamp::next_after(Some(a));
        let a2 = Timestamp::from_value(&a.to_value()).unwrap();
        let b2 = Timestamp::from_value(&b.to_value()).unwrap();
        assert!(a2 < b2);
    }

    #[test]
    fn test_from_value_rejects_garbage() {
        assert!(Timestamp::from_value(&Value::from("yesterday")).is_none());
    }
}
