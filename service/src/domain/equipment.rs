//! [`Equipment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_text, unit, Currency, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{category, rental};
#[cfg(doc)]
use crate::domain::{Category, Rental};

/// Rentable equipment unit.
#[derive(Clone, Debug)]
pub struct Equipment {
    /// ID of this [`Equipment`].
    pub id: Id,

    /// [`Name`] of this [`Equipment`].
    pub name: Name,

    /// ID of the [`Category`] this [`Equipment`] belongs to.
    pub category_id: category::Id,

    /// Current [`Status`] of this [`Equipment`].
    ///
    /// [`Status::Rented`] if and only if there is an open [`Rental`] of this
    /// [`Equipment`].
    pub status: Status,

    /// [`SerialNumber`] of this [`Equipment`], if any.
    pub serial_number: Option<SerialNumber>,

    /// [`Description`] of this [`Equipment`], if any.
    pub description: Option<Description>,

    /// Free-form [`Notes`] about this [`Equipment`], if any.
    pub notes: Option<Notes>,

    /// [`Rates`] this [`Equipment`] is rented for.
    pub rates: Rates,

    /// [`DateTime`] when this [`Equipment`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Equipment`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Equipment {
    /// Indicates whether this [`Equipment`] is deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// ID of an [`Equipment`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_text! {
    #[doc = "Name of an [`Equipment`]."]
    struct Name(max_len = 256);
}

define_text! {
    #[doc = "Manufacturer serial number of an [`Equipment`]."]
    struct SerialNumber(max_len = 128);
}

define_text! {
    #[doc = "Description of an [`Equipment`]."]
    struct Description(max_len = 4096);
}

define_text! {
    #[doc = "Free-form notes about an [`Equipment`]."]
    struct Notes(max_len = 4096);
}

define_kind! {
    #[doc = "Availability status of an [`Equipment`]."]
    enum Status {
        #[doc = "[`Equipment`] may be rented."]
        Available = 1,

        #[doc = "[`Equipment`] is given out by an open [`Rental`]."]
        Rented = 2,
    }
}

/// Conditional transition of an [`Equipment`] [`Status`].
///
/// Applies only if the stored [`Status`] still equals [`StatusChange::from`]
/// and the [`Equipment`] is not deleted. The store reports whether it was
/// applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusChange {
    /// ID of the [`Equipment`] to transition.
    pub id: Id,

    /// [`Status`] expected to be stored.
    pub from: Status,

    /// [`Status`] to store.
    pub to: Status,
}

impl StatusChange {
    /// Transition of a rented-out [`Equipment`].
    #[must_use]
    pub const fn rent(id: Id) -> Self {
        Self {
            id,
            from: Status::Available,
            to: Status::Rented,
        }
    }

    /// Transition of a returned [`Equipment`].
    #[must_use]
    pub const fn release(id: Id) -> Self {
        Self {
            id,
            from: Status::Rented,
            to: Status::Available,
        }
    }
}

/// Prices an [`Equipment`] is rented for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rates {
    /// Price of a single day.
    daily: Money,

    /// Price of a single hour, if hourly rental is allowed.
    hourly: Option<Money>,

    /// Deposit taken for the rental duration.
    deposit: Money,
}

impl Rates {
    /// Creates new [`Rates`] checking that all the prices are non-negative
    /// and share the same [`Currency`].
    ///
    /// # Errors
    ///
    /// See [`RatesError`] for details.
    pub fn new(
        daily: Money,
        hourly: Option<Money>,
        deposit: Money,
    ) -> Result<Self, RatesError> {
        let all = [Some(daily), hourly, Some(deposit)];
        if all.iter().flatten().any(Money::is_negative) {
            return Err(RatesError::Negative);
        }
        if all.iter().flatten().any(|m| m.currency != daily.currency) {
            return Err(RatesError::CurrencyMismatch);
        }

        Ok(Self {
            daily,
            hourly,
            deposit,
        })
    }

    /// Creates new [`Rates`] without checking their invariants.
    ///
    /// # Safety
    ///
    /// The caller must ensure the prices are non-negative and share the same
    /// [`Currency`].
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(
        daily: Money,
        hourly: Option<Money>,
        deposit: Money,
    ) -> Self {
        Self {
            daily,
            hourly,
            deposit,
        }
    }

    /// Returns the daily price.
    #[must_use]
    pub const fn daily(&self) -> Money {
        self.daily
    }

    /// Returns the hourly price, if any.
    #[must_use]
    pub const fn hourly(&self) -> Option<Money> {
        self.hourly
    }

    /// Returns the deposit.
    #[must_use]
    pub const fn deposit(&self) -> Money {
        self.deposit
    }

    /// Returns the [`Currency`] of these [`Rates`].
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.daily.currency
    }

    /// Calculates the rental cost (without the deposit) for the provided
    /// `period` of `unit`s.
    ///
    /// # Errors
    ///
    /// - [`CostError::MissingHourlyRate`] if hourly rental is requested but no
    ///   hourly price is set.
    /// - [`CostError::Overflow`] if the cost doesn't fit into [`Money`].
    pub fn cost(
        &self,
        unit: rental::Unit,
        period: rental::Period,
    ) -> Result<Money, CostError> {
        let price = match unit {
            rental::Unit::Hour => {
                self.hourly.ok_or(CostError::MissingHourlyRate)?
            }
            rental::Unit::Day => self.daily,
        };
        price
            .checked_mul(period.decimal())
            .map(Money::round)
            .ok_or(CostError::Overflow)
    }
}

/// Error of calculating a rental cost out of [`Rates`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum CostError {
    /// Hourly rental is requested, but there is no hourly price.
    #[display("No hourly price is set")]
    MissingHourlyRate,

    /// Cost is too large to be represented.
    #[display("Rental cost overflows")]
    Overflow,
}

/// Error of creating [`Rates`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum RatesError {
    /// Prices are in different [`Currency`]s.
    #[display("Daily, hourly and deposit prices must share a currency")]
    CurrencyMismatch,

    /// Some price is negative.
    #[display("Prices must not be negative")]
    Negative,
}

/// [`DateTime`] when an [`Equipment`] was created.
pub type CreationDateTime = DateTimeOf<(Equipment, unit::Creation)>;

/// [`DateTime`] when an [`Equipment`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Equipment, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use common::{Currency, Money};

    use crate::domain::rental::{Period, Unit};

    use super::{CostError, Rates, RatesError, Status};

    fn rub(amount: i64) -> Money {
        Money::new(amount.into(), Currency::Rub)
    }

    #[test]
    fn computes_daily_cost() {
        let rates = Rates::new(rub(100), None, rub(500)).unwrap();

        assert_eq!(
            rates.cost(Unit::Day, Period::new(3).unwrap()),
            Ok(rub(300)),
        );
    }

    #[test]
    fn computes_hourly_cost() {
        let rates = Rates::new(rub(100), Some(rub(15)), rub(500)).unwrap();

        assert_eq!(
            rates.cost(Unit::Hour, Period::new(4).unwrap()),
            Ok(rub(60)),
        );
    }

    #[test]
    fn misses_hourly_rate() {
        let rates = Rates::new(rub(100), None, rub(500)).unwrap();

        assert_eq!(
            rates.cost(Unit::Hour, Period::new(1).unwrap()),
            Err(CostError::MissingHourlyRate),
        );
    }

    #[test]
    fn reports_cost_overflow() {
        let huge = Money::new(
            "70000000000000000000000000000".parse().unwrap(),
            Currency::Rub,
        );
        let rates = Rates::new(huge, Some(huge), rub(0)).unwrap();

        assert_eq!(
            rates.cost(Unit::Day, Period::new(2).unwrap()),
            Err(CostError::Overflow),
        );
        assert_eq!(
            rates.cost(Unit::Hour, Period::new(1).unwrap()),
            Ok(huge),
        );
    }

    #[test]
    fn rejects_invalid_rates() {
        assert_eq!(
            Rates::new(rub(100), Some(rub(-1)), rub(500)),
            Err(RatesError::Negative),
        );
        assert_eq!(
            Rates::new(
                rub(100),
                None,
                Money::new(500.into(), Currency::Usd),
            ),
            Err(RatesError::CurrencyMismatch),
        );
    }

    #[test]
    fn status_roundtrips_u8() {
        for s in Status::ALL {
            assert_eq!(Status::from_u8(s.u8()), Some(*s));
        }
        assert_eq!(Status::from_u8(0), None);
        assert_eq!(Status::Rented.to_string(), "RENTED");
    }
}
