//! [`ReturnRecord`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_text, unit, DateTimeOf, Money, Percent};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::rental;
#[cfg(doc)]
use crate::domain::{Equipment, Rental};

/// Record of an [`Equipment`] returned by a [`Rental`].
///
/// At most one [`ReturnRecord`] exists per [`Rental`].
#[derive(Clone, Debug)]
pub struct ReturnRecord {
    /// ID of this [`ReturnRecord`].
    pub id: Id,

    /// ID of the closed [`Rental`].
    pub rental_id: rental::Id,

    /// [`DateTime`] when the [`Equipment`] was returned.
    pub returned_at: ReturnDateTime,

    /// [`Condition`] the [`Equipment`] was returned in.
    pub condition: Condition,

    /// [`DamageDescription`] of a [`Condition::Damaged`] [`Equipment`].
    pub damage_description: Option<DamageDescription>,

    /// [`ManagerComment`] on the return, if any.
    pub manager_comment: Option<ManagerComment>,

    /// Part of the [`Rental`] deposit kept by the shop.
    pub deposit_withheld: Money,

    /// Part of the [`Rental`] deposit given back to the client.
    pub deposit_returned: Money,
}

/// ID of a [`ReturnRecord`].
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
    #[doc = "Condition an [`Equipment`] is returned in."]
    enum Condition {
        #[doc = "No signs of use."]
        Excellent = 1,

        #[doc = "Ordinary wear."]
        Good = 2,

        #[doc = "Broken or otherwise damaged."]
        Damaged = 3,

        #[doc = "Not returned at all."]
        Lost = 4,
    }
}

impl Condition {
    /// Returns the [`Percent`] of the deposit withheld for this [`Condition`].
    #[must_use]
    pub const fn withheld_percent(self) -> Percent {
        match self {
            Self::Excellent | Self::Good => Percent::ZERO,
            Self::Damaged => Percent::HALF,
            Self::Lost => Percent::FULL,
        }
    }
}

define_text! {
    #[doc = "Description of a damage of a returned [`Equipment`]."]
    struct DamageDescription(max_len = 4096);
}

define_text! {
    #[doc = "Comment of a manager on a return."]
    struct ManagerComment(max_len = 4096);
}

/// Split of a [`Rental`] deposit on return.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settlement {
    /// Part of the deposit kept by the shop.
    pub withheld: Money,

    /// Part of the deposit given back to the client.
    pub returned: Money,
}

impl Settlement {
    /// Splits the provided `deposit` according to the [`Condition`].
    ///
    /// Both parts are rounded and always sum up to the rounded `deposit`.
    #[must_use]
    pub fn new(deposit: Money, condition: Condition) -> Self {
        let deposit = deposit.round();
        let withheld = deposit.share(condition.withheld_percent());
        let returned = deposit
            .checked_sub(withheld)
            .map_or(Money::zero(deposit.currency), Money::round);
        Self { withheld, returned }
    }
}

/// [`DateTime`] when an [`Equipment`] was returned.
pub type ReturnDateTime = DateTimeOf<(ReturnRecord, unit::ActualReturn)>;

#[cfg(test)]
mod spec {
    use common::{Currency, Money};

    use super::{Condition, DamageDescription, Settlement};

    fn rub(amount: &str) -> Money {
        Money::new(amount.parse().unwrap(), Currency::Rub)
    }

    #[test]
    fn trims_damage_description() {
        assert_eq!(DamageDescription::from_trimmed(""), Ok(None));
        assert_eq!(DamageDescription::from_trimmed(" \t\n "), Ok(None));
        assert_eq!(
            DamageDescription::from_trimmed(" scratched lens ")
                .map(|d| d.map(|d| d.to_string())),
            Ok(Some("scratched lens".to_owned())),
        );
        assert!(DamageDescription::from_trimmed(&"x".repeat(4097)).is_err());
    }

    #[test]
    fn withholds_by_condition() {
        let deposit = rub("1000.00");

        for (condition, withheld, returned) in [
            (Condition::Excellent, "0", "1000"),
            (Condition::Good, "0", "1000"),
            (Condition::Damaged, "500", "500"),
            (Condition::Lost, "1000", "0"),
        ] {
            assert_eq!(
                Settlement::new(deposit, condition),
                Settlement {
                    withheld: rub(withheld),
                    returned: rub(returned),
                },
                "{condition}",
            );
        }
    }

    #[test]
    fn rounds_odd_deposit() {
        let settlement = Settlement::new(rub("0.25"), Condition::Damaged);

        assert_eq!(settlement.withheld, rub("0.13"));
        assert_eq!(settlement.returned, rub("0.12"));
    }

    #[test]
    fn handles_zero_deposit() {
        let settlement = Settlement::new(rub("0"), Condition::Lost);

        assert_eq!(settlement.withheld, rub("0"));
        assert_eq!(settlement.returned, rub("0"));
    }
}
