//! [`Money`]-related definitions.

use std::{fmt, ops, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{define_kind, Percent};

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Number of fractional digits [`Money`] is rounded to.
    pub const SCALE: u32 = 2;

    /// Creates a new [`Money`] of the provided `amount` and [`Currency`].
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero [`Money`] in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Rounds this [`Money`] to [`Money::SCALE`] fractional digits, with
    /// midpoints rounded away from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                Self::SCALE,
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency: self.currency,
        }
    }

    /// Indicates whether this [`Money`] is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Adds the `other` [`Money`] to this one.
    ///
    /// [`None`] is returned if the currencies differ or the sum overflows.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        (self.currency == other.currency).then_some(())?;
        Some(Self::new(
            self.amount.checked_add(other.amount)?,
            self.currency,
        ))
    }

    /// Subtracts the `other` [`Money`] from this one.
    ///
    /// [`None`] is returned if the currencies differ or the difference
    /// overflows.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        (self.currency == other.currency).then_some(())?;
        Some(Self::new(
            self.amount.checked_sub(other.amount)?,
            self.currency,
        ))
    }

    /// Multiplies this [`Money`] by the provided `factor`.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn checked_mul(self, factor: Decimal) -> Option<Self> {
        Some(Self::new(self.amount.checked_mul(factor)?, self.currency))
    }

    /// Returns the rounded [`Percent`] share of this [`Money`].
    #[must_use]
    pub fn share(self, percent: Percent) -> Self {
        (self * percent.fraction()).round()
    }
}

impl ops::Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self::new(self.amount * rhs, self.currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.scale() <= Self::SCALE {
            write!(f, "{amount:.2}{currency}")
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "US Dollar."]
        Usd = 1,

        #[doc = "Euro."]
        Eur = 2,

        #[doc = "Russian Ruble."]
        Rub = 3,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }

    /// Three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Currency = super::Currency;

    impl Currency {
        fn to_output<S: ScalarValue>(c: &Currency) -> Value<S> {
            Value::scalar(c.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Currency` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Currency` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use crate::Percent;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn rub(s: &str) -> Money {
        Money::new(decimal(s), Currency::Rub)
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money::new(decimal("123.45"), Currency::Usd),
        );
        assert_eq!(Money::from_str("800RUB").unwrap(), rub("800"));
        assert_eq!(Money::from_str("0.5EUR").unwrap().currency, Currency::Eur);

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Us").is_err());
        assert!(Money::from_str("123.45Usdollar").is_err());
        assert!(Money::from_str("abcRUB").is_err());
    }

    #[test]
    fn displays_two_fractional_digits() {
        assert_eq!(rub("800").to_string(), "800.00RUB");
        assert_eq!(rub("12.5").to_string(), "12.50RUB");
        assert_eq!(rub("0.125").to_string(), "0.125RUB");
        assert_eq!(
            Money::new(decimal("123.45"), Currency::Usd).to_string(),
            "123.45USD",
        );
    }

    #[test]
    fn rounds_midpoint_away_from_zero() {
        assert_eq!(rub("0.125").round(), rub("0.13"));
        assert_eq!(rub("-0.125").round(), rub("-0.13"));
        assert_eq!(rub("2.675").round(), rub("2.68"));
        assert_eq!(rub("2.674").round(), rub("2.67"));
        assert_eq!(rub("800").round(), rub("800.00"));
    }

    #[test]
    fn adds_only_same_currency() {
        assert_eq!(rub("300").checked_add(rub("500")), Some(rub("800")));
        assert_eq!(
            rub("300").checked_add(Money::new(decimal("1"), Currency::Usd)),
            None,
        );
        assert_eq!(rub("800").checked_sub(rub("500")), Some(rub("300")));
    }

    #[test]
    fn multiplies() {
        assert_eq!(rub("100") * Decimal::from(3), rub("300"));
        assert_eq!(rub("10.50").checked_mul(decimal("2")), Some(rub("21")));
    }

    #[test]
    fn takes_percent_share() {
        let deposit = rub("1000");

        assert_eq!(deposit.share(Percent::ZERO), rub("0.00"));
        assert_eq!(deposit.share(Percent::HALF), rub("500.00"));
        assert_eq!(deposit.share(Percent::FULL), rub("1000.00"));
        assert_eq!(rub("0.05").share(Percent::HALF), rub("0.03"));
    }

    #[test]
    fn detects_negative() {
        assert!(rub("-1").is_negative());
        assert!(!rub("0").is_negative());
        assert!(!rub("-0").is_negative());
        assert!(!rub("1").is_negative());
    }
}
