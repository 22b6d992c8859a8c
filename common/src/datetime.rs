//! UTC timestamps with a microsecond precision.
//!
//! [`DateTimeOf`] carries a phantom marker, so the creation moment of a rental
//! and its planned return are different types and can't be swapped silently.
//! Use [`DateTimeOf::coerce()`] to convert between markers explicitly.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, marker::PhantomData, ops, time::Duration};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime, UtcOffset};

/// Timestamp without any marker.
pub type DateTime = DateTimeOf;

/// Timestamp in UTC, truncated to microseconds.
///
/// PostgreSQL `TIMESTAMPTZ` stores microseconds, so values are truncated on
/// creation and survive a database round trip unchanged.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// UTC moment.
    utc: OffsetDateTime,

    /// Marker of what this timestamp stands for.
    #[debug(skip)]
    _marker: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Wraps the provided moment, converting it to UTC and dropping everything
    /// finer than a microsecond.
    fn truncated(dt: OffsetDateTime) -> Self {
        let utc = dt.to_offset(UtcOffset::UTC);
        let nanos = utc.nanosecond() % 1_000;
        Self {
            utc: utc - time::Duration::nanoseconds(i64::from(nanos)),
            _marker: PhantomData,
        }
    }

    /// Returns the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self::truncated(OffsetDateTime::now_utc())
    }

    /// Parses an [RFC 3339] timestamp, converting it to UTC.
    ///
    /// # Errors
    ///
    /// If the `input` isn't a valid [RFC 3339] timestamp.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        OffsetDateTime::parse(input, &Rfc3339)
            .map(Self::truncated)
            .map_err(ParseError)
    }

    /// Formats this timestamp as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "UTC years fit RFC 3339")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        // Years outside `0..=9999` are unreachable from `now()` and parsing.
        self.utc
            .format(&Rfc3339)
            .expect("UTC timestamp within RFC 3339 range")
    }

    /// Checks whether this timestamp is strictly earlier than the `other` one,
    /// whatever their markers are.
    #[must_use]
    pub fn is_before<Other: ?Sized>(&self, other: &DateTimeOf<Other>) -> bool {
        self.utc < other.utc
    }

    /// Returns the time elapsed from the `earlier` timestamp till this one.
    ///
    /// [`Duration::ZERO`] is returned if the `earlier` one is actually later.
    #[must_use]
    pub fn saturating_since<Other: ?Sized>(
        &self,
        earlier: &DateTimeOf<Other>,
    ) -> Duration {
        (self.utc - earlier.utc).try_into().unwrap_or(Duration::ZERO)
    }

    /// Re-marks this timestamp as another kind.
    #[must_use]
    pub fn coerce<To: ?Sized>(self) -> DateTimeOf<To> {
        DateTimeOf {
            utc: self.utc,
            _marker: PhantomData,
        }
    }
}

/// Error of parsing a [`DateTime`] from an [RFC 3339] string.
///
/// [RFC 3339]: https://tools.ietf.org/html/rfc3339
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid RFC 3339 timestamp: {_0}")]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> From<OffsetDateTime> for DateTimeOf<Of> {
    fn from(dt: OffsetDateTime) -> Self {
        Self::truncated(dt)
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.utc
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self::truncated(self.utc + rhs)
    }
}

impl<Of: ?Sized> ops::Sub<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self {
        Self::truncated(self.utc - rhs)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        OffsetDateTime::from_sql(ty, raw).map(Self::truncated)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.utc.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! [`juniper`] scalar of a [`DateTime`](crate::DateTime).

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Timestamp in [RFC 3339] format, e.g. `2024-05-01T10:00:00Z`.
    ///
    /// Precision is limited to microseconds.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            let s = input.as_string_value().ok_or_else(|| {
                format!("`DateTime` expects a string, found: {input}")
            })?;
            Self::from_rfc3339(s).map_err(|e| e.to_string())
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::DateTime;

    #[test]
    fn truncates_to_microseconds() {
        let dt = DateTime::from_rfc3339("2024-05-01T10:00:00.123456789Z")
            .expect("valid timestamp");

        assert_eq!(dt.to_rfc3339(), "2024-05-01T10:00:00.123456Z");
    }

    #[test]
    fn normalizes_offset_to_utc() {
        let local = DateTime::from_rfc3339("2024-05-01T13:00:00+03:00")
            .expect("valid timestamp");
        let utc = DateTime::from_rfc3339("2024-05-01T10:00:00Z")
            .expect("valid timestamp");

        assert_eq!(local, utc);
        assert_eq!(local.to_rfc3339(), "2024-05-01T10:00:00Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(DateTime::from_rfc3339("yesterday").is_err());
        assert!(DateTime::from_rfc3339("2024-13-01T00:00:00Z").is_err());
    }

    #[test]
    fn measures_elapsed_time() {
        let start = DateTime::from_rfc3339("2024-05-01T10:00:00Z")
            .expect("valid timestamp");
        let end = start + Duration::from_secs(90 * 60);

        assert!(start.is_before(&end));
        assert!(!end.is_before(&start));
        assert!(!start.is_before(&start));
        assert_eq!(end.saturating_since(&start), Duration::from_secs(5400));
        assert_eq!(start.saturating_since(&end), Duration::ZERO);
        assert_eq!(end - Duration::from_secs(5400), start);
    }
}
