//! [`Rental`]-related definitions.

use std::future;

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A rental of an `Equipment` by a `Client`.
#[derive(Clone, Debug)]
pub struct Rental {
    /// ID of this [`Rental`].
    id: Id,

    /// Underlying [`domain::Rental`].
    rental: OnceCell<domain::Rental>,
}

impl From<domain::Rental> for Rental {
    fn from(rental: domain::Rental) -> Self {
        Self {
            id: rental.id.into(),
            rental: OnceCell::new_with(Some(rental)),
        }
    }
}

impl Rental {
    /// Creates a new [`Rental`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Rental`] with the provided ID exists,
    /// otherwise accessing this [`Rental`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            rental: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Rental`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Rental`] doesn't exist.
    async fn rental(&self, ctx: &Context) -> Result<&domain::Rental, Error> {
        let id = self.id.into();
        self.rental
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::rental::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|r| {
                        future::ready(r.ok_or_else(|| {
                            api::query::RentalError::NotExists.into()
                        }))
                    })
            })
            .await
    }

    /// Returns the [`domain::ReturnRecord`] closing this [`Rental`], if any.
    async fn closing_record(
        &self,
        ctx: &Context,
    ) -> Result<Option<domain::ReturnRecord>, Error> {
        ctx.service()
            .execute(query::return_record::ByRentalId::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

/// A rental of an `Equipment` by a `Client`.
#[graphql_object(context = Context)]
impl Rental {
    /// Unique identifier of this `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Client` renting the `Equipment`.
    ///
    /// `null` if the `Client` has been deleted since.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.client",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn client(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Client>, Error> {
        let id = self.rental(ctx).await?.client_id;
        ctx.service()
            .execute(query::client::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.map(Into::into))
    }

    /// Rented `Equipment`.
    ///
    /// `null` if the `Equipment` has been deleted since.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.equipment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn equipment(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Equipment>, Error> {
        let id = self.rental(ctx).await?.equipment_id;
        ctx.service()
            .execute(query::equipment::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|e| e.map(Into::into))
    }

    /// `Employee` who issued this `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.employee",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn employee(
        &self,
        ctx: &Context,
    ) -> Result<api::Employee, Error> {
        let id = self.rental(ctx).await?.employee_id;
        // SAFETY: `Employee`s are never deleted, and `Rental` references an
        //         existing one only.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let employee = unsafe { api::Employee::new_unchecked(id) };
        Ok(employee)
    }

    /// `DateTime` when this `Rental` was opened.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.rental(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when the `Equipment` is expected to be returned.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.plannedReturnAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn planned_return_at(
        &self,
        ctx: &Context,
    ) -> Result<DateTime, Error> {
        Ok(self.rental(ctx).await?.planned_return_at.coerce())
    }

    /// Unit the `period` of this `Rental` is measured in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.unit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn unit(&self, ctx: &Context) -> Result<Unit, Error> {
        Ok(self.rental(ctx).await?.unit.into())
    }

    /// Number of `unit`s this `Rental` lasts.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.period",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn period(&self, ctx: &Context) -> Result<i32, Error> {
        let period = u32::from(self.rental(ctx).await?.period);
        Ok(i32::try_from(period).unwrap_or(i32::MAX))
    }

    /// Total charged cost, including the `deposit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.totalCost",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total_cost(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.rental(ctx).await?.total_cost)
    }

    /// Deposit taken for the `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.deposit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn deposit(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.rental(ctx).await?.deposit)
    }

    /// Cost of the rental itself, i.e. `totalCost` without the `deposit`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.rentalCost",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rental_cost(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.rental(ctx).await?.rental_cost())
    }

    /// Payment status of this `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.paymentStatus",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payment_status(
        &self,
        ctx: &Context,
    ) -> Result<PaymentStatus, Error> {
        Ok(self.rental(ctx).await?.payment_status.into())
    }

    /// Notes of this `Rental`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.notes",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn notes(&self, ctx: &Context) -> Result<Option<Notes>, Error> {
        Ok(self.rental(ctx).await?.notes.clone().map(Into::into))
    }

    /// Indicator whether this `Rental` is open, i.e. has started and its
    /// `Equipment` is not returned yet.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.isOpen",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_open(&self, ctx: &Context) -> Result<bool, Error> {
        let started = !DateTime::now()
            .is_before(&self.rental(ctx).await?.created_at);
        Ok(started && self.closing_record(ctx).await?.is_none())
    }

    /// Indicator whether this `Rental` is open past its `plannedReturnAt`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.isOverdue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn is_overdue(&self, ctx: &Context) -> Result<bool, Error> {
        let overdue = self.rental(ctx).await?.is_overdue_at(&DateTime::now());
        Ok(overdue && self.closing_record(ctx).await?.is_none())
    }

    /// `ReturnRecord` closing this `Rental`, if returned.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rental.returnRecord",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn return_record(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::ReturnRecord>, Error> {
        Ok(self.closing_record(ctx).await?.map(Into::into))
    }
}

/// Unique identifier of a `Rental`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::rental::Id)]
#[into(domain::rental::Id)]
#[graphql(name = "RentalId", transparent)]
pub struct Id(Uuid);

/// Notes of a `Rental`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RentalNotes",
    with = scalar::Via::<domain::rental::Notes>,
)]
pub struct Notes(domain::rental::Notes);

/// Unit a `Rental` period is measured in.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RentalUnit")]
pub enum Unit {
    /// Hourly rental.
    Hour,

    /// Daily rental.
    Day,
}

impl From<domain::rental::Unit> for Unit {
    fn from(unit: domain::rental::Unit) -> Self {
        use domain::rental::Unit as U;
        match unit {
            U::Hour => Self::Hour,
            U::Day => Self::Day,
        }
    }
}

impl From<Unit> for domain::rental::Unit {
    fn from(unit: Unit) -> Self {
        match unit {
            Unit::Hour => Self::Hour,
            Unit::Day => Self::Day,
        }
    }
}

/// Payment status of a `Rental`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RentalPaymentStatus")]
pub enum PaymentStatus {
    /// Nothing is paid yet.
    NotPaid,

    /// Everything is paid.
    Paid,

    /// Only a part is paid.
    PartiallyPaid,
}

impl From<domain::rental::PaymentStatus> for PaymentStatus {
    fn from(status: domain::rental::PaymentStatus) -> Self {
        use domain::rental::PaymentStatus as S;
        match status {
            S::NotPaid => Self::NotPaid,
            S::Paid => Self::Paid,
            S::PartiallyPaid => Self::PartiallyPaid,
        }
    }
}

impl From<PaymentStatus> for domain::rental::PaymentStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::NotPaid => Self::NotPaid,
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::PartiallyPaid => Self::PartiallyPaid,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Rental`] list.

    use juniper::graphql_object;
    use service::query;

    use super::Rental;
    use crate::{api, Context};

    /// Listed [`Rental`]s along with the number of overdue ones.
    #[derive(Clone, Debug)]
    pub struct List {
        /// Listed [`Rental`]s.
        items: Vec<Rental>,

        /// Number of the listed open [`Rental`]s being overdue.
        overdue: usize,
    }

    impl From<query::rentals::Output> for List {
        fn from(output: query::rentals::Output) -> Self {
            Self {
                items: output.items.into_iter().map(Into::into).collect(),
                overdue: output.overdue,
            }
        }
    }

    /// Listed `Rental`s along with the number of overdue ones.
    #[graphql_object(name = "RentalList", context = Context)]
    impl List {
        /// Listed `Rental`s, newest first.
        #[must_use]
        pub fn items(&self) -> &[Rental] {
            &self.items
        }

        /// Number of the open `Rental`s matching the filter, whose planned
        /// return has passed.
        #[must_use]
        pub fn overdue(&self) -> i32 {
            api::count(self.overdue)
        }
    }
}
