//! [`Rental`] definitions.

use std::time::Duration;

use common::{define_kind, define_text, unit, DateTime, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{client, employee, equipment};
#[cfg(doc)]
use crate::domain::{Client, Employee, Equipment, ReturnRecord};

/// Rental of an [`Equipment`] by a [`Client`].
///
/// A [`Rental`] is open until a [`ReturnRecord`] referencing it exists.
#[derive(Clone, Debug)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the [`Client`] renting the [`Equipment`].
    pub client_id: client::Id,

    /// ID of the rented [`Equipment`].
    pub equipment_id: equipment::Id,

    /// ID of the [`Employee`] who issued this [`Rental`].
    pub employee_id: employee::Id,

    /// [`DateTime`] when this [`Rental`] was opened.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when the [`Equipment`] is expected to be returned.
    pub planned_return_at: PlannedReturnDateTime,

    /// [`Unit`] the [`Period`] is measured in.
    pub unit: Unit,

    /// [`Period`] of this [`Rental`].
    pub period: Period,

    /// Total charged at opening: the rental cost plus the deposit.
    pub total_cost: Money,

    /// Deposit taken at opening.
    pub deposit: Money,

    /// [`PaymentStatus`] of this [`Rental`].
    pub payment_status: PaymentStatus,

    /// Free-form [`Notes`] about this [`Rental`], if any.
    pub notes: Option<Notes>,
}

impl Rental {
    /// Returns the rental cost of this [`Rental`] without the deposit.
    #[must_use]
    pub fn rental_cost(&self) -> Money {
        self.total_cost
            .checked_sub(self.deposit)
            .map_or(self.total_cost, Money::round)
    }

    /// Indicates whether this [`Rental`] is overdue at the provided moment,
    /// assuming it is still open.
    #[must_use]
    pub fn is_overdue_at(&self, now: &DateTime) -> bool {
        self.planned_return_at.is_before(now)
    }
}

/// ID of a [`Rental`].
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
    PartialEq,
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

define_kind! {
    #[doc = "Unit a rental [`Period`] is measured in."]
    enum Unit {
        #[doc = "Hourly rental."]
        Hour = 1,

        #[doc = "Daily rental."]
        Day = 2,
    }
}

impl Unit {
    /// Returns the [`Duration`] of a single [`Unit`].
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::Hour => Duration::from_secs(60 * 60),
            Self::Day => Duration::from_secs(24 * 60 * 60),
        }
    }
}

define_kind! {
    #[doc = "Payment status of a [`Rental`]."]
    enum PaymentStatus {
        #[doc = "Nothing is paid yet."]
        NotPaid = 1,

        #[doc = "Everything is paid."]
        Paid = 2,

        #[doc = "Only a part is paid."]
        PartiallyPaid = 3,
    }
}

/// Positive number of [`Unit`]s a [`Rental`] lasts.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Period(u32);

impl Period {
    /// Creates a new [`Period`] if the provided `units` is positive.
    #[must_use]
    pub const fn new(units: u32) -> Option<Self> {
        if units == 0 {
            None
        } else {
            Some(Self(units))
        }
    }

    /// Returns this [`Period`] as a [`Decimal`].
    #[must_use]
    pub fn decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Returns the [`Duration`] of this [`Period`] of the provided [`Unit`]s.
    #[must_use]
    pub fn duration(self, unit: Unit) -> Duration {
        unit.duration().saturating_mul(self.0)
    }
}

#[cfg(feature = "postgres")]
mod period_postgres {
    use std::error::Error as StdError;

    use postgres_types::{
        accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql,
        Type,
    };

    use super::Period;

    impl<'a> FromSql<'a> for Period {
        fn from_sql(
            ty: &Type,
            raw: &'a [u8],
        ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
            let units = i32::from_sql(ty, raw)?;
            u32::try_from(units)
                .ok()
                .and_then(Self::new)
                .ok_or_else(|| format!("invalid `Period`: {units}").into())
        }

        accepts!(INT4);
    }

    impl ToSql for Period {
        fn to_sql(
            &self,
            ty: &Type,
            out: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
            i32::try_from(self.0)?.to_sql(ty, out)
        }

        accepts!(INT4);
        to_sql_checked!();
    }
}

define_text! {
    #[doc = "Free-form notes about a [`Rental`]."]
    struct Notes(max_len = 4096);
}

/// Amounts charged when a [`Rental`] is opened.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Charge {
    /// Rental cost without the deposit.
    pub cost: Money,

    /// Deposit taken.
    pub deposit: Money,

    /// Sum of the cost and the deposit.
    pub total: Money,
}

impl Charge {
    /// Calculates the [`Charge`] of renting the provided [`equipment::Rates`]
    /// for the provided `period` of `unit`s.
    ///
    /// # Errors
    ///
    /// If the [`equipment::Rates`] have no price for the requested [`Unit`],
    /// or the total doesn't fit into [`Money`].
    pub fn calculate(
        rates: &equipment::Rates,
        unit: Unit,
        period: Period,
    ) -> Result<Self, equipment::CostError> {
        let cost = rates.cost(unit, period)?;
        let deposit = rates.deposit().round();
        let total = cost
            .checked_add(deposit)
            .ok_or(equipment::CostError::Overflow)?
            .round();
        Ok(Self {
            cost,
            deposit,
            total,
        })
    }
}

/// [`DateTime`] when a [`Rental`] was opened.
pub type CreationDateTime = DateTimeOf<(Rental, unit::Creation)>;

/// [`DateTime`] when a [`Rental`] is expected to be returned.
pub type PlannedReturnDateTime = DateTimeOf<(Rental, unit::PlannedReturn)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{Currency, Money};

    use crate::domain::equipment::{CostError, Rates};

    use super::{Charge, Period, Unit};

    fn rub(amount: &str) -> Money {
        Money::new(amount.parse().unwrap(), Currency::Rub)
    }

    #[test]
    fn rejects_zero_period() {
        assert!(Period::new(0).is_none());
        assert_eq!(Period::new(2).map(Period::decimal), Some(2.into()));
    }

    #[test]
    fn computes_period_duration() {
        let period = Period::new(3).unwrap();

        assert_eq!(period.duration(Unit::Hour), Duration::from_secs(3 * 3600));
        assert_eq!(period.duration(Unit::Day), Duration::from_secs(3 * 86400));
    }

    #[test]
    fn charges_cost_and_deposit() {
        let rates =
            Rates::new(rub("800.00"), Some(rub("120.50")), rub("5000.00"))
                .unwrap();

        let charge =
            Charge::calculate(&rates, Unit::Day, Period::new(1).unwrap())
                .unwrap();
        assert_eq!(charge.cost, rub("800.00"));
        assert_eq!(charge.deposit, rub("5000.00"));
        assert_eq!(charge.total, rub("5800.00"));

        let charge =
            Charge::calculate(&rates, Unit::Hour, Period::new(3).unwrap())
                .unwrap();
        assert_eq!(charge.cost, rub("361.50"));
        assert_eq!(charge.total, rub("5361.50"));
    }

    #[test]
    fn misses_charge_without_hourly_rate() {
        let rates = Rates::new(rub("800"), None, rub("0")).unwrap();

        assert_eq!(
            Charge::calculate(&rates, Unit::Hour, Period::new(1).unwrap()),
            Err(CostError::MissingHourlyRate),
        );
    }

    #[test]
    fn reports_total_overflow() {
        let max: rust_decimal::Decimal = "79228162514264337593543950335"
            .parse()
            .unwrap();
        let rates = Rates::new(
            Money::new(max, Currency::Rub),
            None,
            rub("1.00"),
        )
        .unwrap();

        assert_eq!(
            Charge::calculate(&rates, Unit::Day, Period::new(1).unwrap()),
            Err(CostError::Overflow),
        );
    }
}
