//! [`ReturnRecord`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    Context,
};

/// Record of an `Equipment` returned by a `Rental`.
#[derive(Clone, Debug, From)]
pub struct ReturnRecord(domain::ReturnRecord);

/// Record of an `Equipment` returned by a `Rental`.
#[graphql_object(context = Context)]
impl ReturnRecord {
    /// Unique identifier of this `ReturnRecord`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ReturnRecord.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Rental` closed by this `ReturnRecord`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ReturnRecord.rental",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn rental(&self) -> api::Rental {
        // SAFETY: `Rental`s are never deleted, and `ReturnRecord` references
        //         an existing one only.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let rental = unsafe { api::Rental::new_unchecked(self.0.rental_id) };
        rental
    }

    /// `DateTime` when the `Equipment` was returned.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ReturnRecord.returnedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn returned_at(&self) -> DateTime {
        self.0.returned_at.coerce()
    }

    /// `Condition` the `Equipment` was returned in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ReturnRecord.condition",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn condition(&self) -> Condition {
        self.0.condition.into()
    }

    /// Description of the damage, if the `Equipment` was returned damaged.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ReturnRecord.damageDescription",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn damage_description(&self) -> Option<DamageDescription> {
        self.0.damage_description.clone().map(Into::into)
    }

    /// Comment of the manager on the return, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ReturnRecord.managerComment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn manager_comment(&self) -> Option<ManagerComment> {
        self.0.manager_comment.clone().map(Into::into)
    }

    /// Part of the `Rental` deposit kept by the shop.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ReturnRecord.depositWithheld",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn deposit_withheld(&self) -> Money {
        self.0.deposit_withheld
    }

    /// Part of the `Rental` deposit given back to the `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ReturnRecord.depositReturned",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn deposit_returned(&self) -> Money {
        self.0.deposit_returned
    }
}

/// Unique identifier of a `ReturnRecord`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::return_record::Id)]
#[into(domain::return_record::Id)]
#[graphql(name = "ReturnRecordId", transparent)]
pub struct Id(Uuid);

/// Description of a damage of a returned `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ReturnDamageDescription",
    with = scalar::Via::<domain::return_record::DamageDescription>,
)]
pub struct DamageDescription(domain::return_record::DamageDescription);

/// Comment of a manager on a return.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ReturnManagerComment",
    with = scalar::Via::<domain::return_record::ManagerComment>,
)]
pub struct ManagerComment(domain::return_record::ManagerComment);

/// Condition an `Equipment` is returned in.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ReturnCondition")]
pub enum Condition {
    /// No signs of use. The whole deposit is returned.
    Excellent,

    /// Ordinary wear. The whole deposit is returned.
    Good,

    /// Broken or otherwise damaged. Half of the deposit is withheld.
    Damaged,

    /// Not returned at all. The whole deposit is withheld.
    Lost,
}

impl From<domain::return_record::Condition> for Condition {
    fn from(condition: domain::return_record::Condition) -> Self {
        use domain::return_record::Condition as C;
        match condition {
            C::Excellent => Self::Excellent,
            C::Good => Self::Good,
            C::Damaged => Self::Damaged,
            C::Lost => Self::Lost,
        }
    }
}

impl From<Condition> for domain::return_record::Condition {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Excellent => Self::Excellent,
            Condition::Good => Self::Good,
            Condition::Damaged => Self::Damaged,
            Condition::Lost => Self::Lost,
        }
    }
}
