//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Percentage in the `[0; 100]` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Percent(Decimal);

impl Percent {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Fifty percent.
    pub const HALF: Self = Self(Decimal::from_parts(50, 0, 0, false, 0));

    /// One hundred percent.
    pub const FULL: Self = Self(Decimal::ONE_HUNDRED);

    /// Creates a new [`Percent`] if the provided value lies in the `[0; 100]`
    /// range.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Decimal::ONE_HUNDRED)
            .contains(&val)
            .then_some(Self(val))
    }

    /// Returns this [`Percent`] as a fraction in the `[0; 1]` range.
    #[must_use]
    pub fn fraction(self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }
}

impl From<Percent> for Decimal {
    fn from(p: Percent) -> Self {
        p.0
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Decimal percentage in the `[0; 100]` range.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Percent = super::Percent;

    impl Percent {
        fn to_output<S: ScalarValue>(m: &Percent) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Percent` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Percent` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    #[test]
    fn checks_range() {
        assert!(Percent::new(Decimal::from(-1)).is_none());
        assert!(Percent::new(Decimal::from(101)).is_none());
        assert_eq!(Percent::new(Decimal::from(50)), Some(Percent::HALF));
        assert_eq!(Percent::new(Decimal::ZERO), Some(Percent::ZERO));
        assert_eq!(Percent::new(Decimal::ONE_HUNDRED), Some(Percent::FULL));
    }

    #[test]
    fn converts_to_fraction() {
        assert_eq!(Percent::HALF.fraction(), "0.5".parse().unwrap());
        assert_eq!(Percent::FULL.fraction(), Decimal::ONE);
        assert_eq!(Percent::ZERO.fraction(), Decimal::ZERO);
    }

    #[test]
    fn parses() {
        assert_eq!("50".parse::<Percent>(), Ok(Percent::HALF));
        assert!("150".parse::<Percent>().is_err());
        assert!("half".parse::<Percent>().is_err());
    }
}
