use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ConvertError;
use crate::reflect::Reflect;
use crate::types::Shape;
use crate::value::Value;

/// Schema-side point in time: seconds and nanoseconds since the Unix epoch, always UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    pub fn now() -> Self {
        Self::from_time(&Utc::now())
    }

    pub fn from_time<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Self {
            seconds: time.timestamp(),
            nanos: time.timestamp_subsec_nanos() as i32,
        }
    }

    /// Instant as a UTC time, or `None` when it is not representable.
    pub fn to_time(&self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.nanos).ok().filter(|nanos| *nanos < 1_000_000_000)?;
        DateTime::from_timestamp(self.seconds, nanos)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(time: DateTime<Tz>) -> Self {
        Self::from_time(&time)
    }
}

impl Reflect for Timestamp {
    fn shape() -> Shape {
        Shape::Time
    }

    /// An unrepresentable instant reflects as its raw text, which conversion rejects as out of range.
    fn reflect(&self) -> Value {
        match self.to_time() {
            Some(time) => Value::Time(time.fixed_offset()),
            None => Value::Text(format!("{}s {}ns", self.seconds, self.nanos)),
        }
    }

    fn absorb(&mut self, value: Value) -> Result<(), ConvertError> {
        *self = match value {
            Value::Null => Self::default(),
            Value::Time(time) => Self::from_time(&time),
            other => return Err(ConvertError::mismatch(other.kind(), Self::shape())),
        };
        Ok(())
    }

    fn instantiate(value: Value) -> Result<Self, ConvertError> {
        crate::reflect::instantiate_default(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn keeps_instant_and_drops_zone() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = zone.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let stamp = Timestamp::from(local);
        let time = stamp.to_time().unwrap();
        assert_eq!(time, local);
        assert_eq!(time.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn preserves_nanoseconds() {
        let now = Utc::now();
        assert_eq!(Timestamp::from_time(&now).to_time(), Some(now));
    }

    #[test]
    fn unrepresentable_instants_have_no_time() {
        assert_eq!(Timestamp::new(i64::MAX / 2, 0).to_time(), None);
        assert_eq!(Timestamp::new(0, -1).to_time(), None);
        assert_eq!(Timestamp::new(0, 1_000_000_000).to_time(), None);
        assert_eq!(
            Timestamp::new(i64::MAX / 2, 0).reflect(),
            Value::Text(format!("{}s 0ns", i64::MAX / 2))
        );
    }
}
