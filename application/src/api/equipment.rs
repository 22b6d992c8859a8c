//! [`Equipment`]-related definitions.

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

/// A rentable unit of equipment.
#[derive(Clone, Debug)]
pub struct Equipment {
    /// ID of this [`Equipment`].
    id: Id,

    /// Underlying [`domain::Equipment`].
    equipment: OnceCell<domain::Equipment>,
}

impl From<domain::Equipment> for Equipment {
    fn from(equipment: domain::Equipment) -> Self {
        Self {
            id: equipment.id.into(),
            equipment: OnceCell::new_with(Some(equipment)),
        }
    }
}

impl Equipment {
    /// Returns the underlying [`domain::Equipment`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Equipment`] doesn't exist or is deleted.
    async fn equipment(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Equipment, Error> {
        let id = self.id.into();
        self.equipment
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::equipment::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|e| {
                        future::ready(e.ok_or_else(|| {
                            api::query::EquipmentError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A rentable unit of equipment.
#[graphql_object(context = Context)]
impl Equipment {
    /// Unique identifier of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.equipment(ctx).await?.name.clone().into())
    }

    /// `Category` of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn category(
        &self,
        ctx: &Context,
    ) -> Result<api::Category, Error> {
        let id = self.equipment(ctx).await?.category_id;
        // SAFETY: `Category`s are never deleted, and `Equipment` references
        //         an existing one only.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let category = unsafe { api::Category::new_unchecked(id) };
        Ok(category)
    }

    /// Availability status of this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.equipment(ctx).await?.status.into())
    }

    /// Serial number of this `Equipment`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.serialNumber",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn serial_number(
        &self,
        ctx: &Context,
    ) -> Result<Option<SerialNumber>, Error> {
        Ok(self
            .equipment(ctx)
            .await?
            .serial_number
            .clone()
            .map(Into::into))
    }

    /// Description of this `Equipment`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self
            .equipment(ctx)
            .await?
            .description
            .clone()
            .map(Into::into))
    }

    /// Free-form notes about this `Equipment`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.notes",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn notes(&self, ctx: &Context) -> Result<Option<Notes>, Error> {
        Ok(self.equipment(ctx).await?.notes.clone().map(Into::into))
    }

    /// Price of renting this `Equipment` for a day.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.dailyRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn daily_rate(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.equipment(ctx).await?.rates.daily())
    }

    /// Price of renting this `Equipment` for an hour.
    ///
    /// `null` if this `Equipment` can't be rented hourly.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.hourlyRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn hourly_rate(
        &self,
        ctx: &Context,
    ) -> Result<Option<Money>, Error> {
        Ok(self.equipment(ctx).await?.rates.hourly())
    }

    /// Deposit taken when renting this `Equipment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.deposit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn deposit(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.equipment(ctx).await?.rates.deposit())
    }

    /// `DateTime` when this `Equipment` was added to the catalogue.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.equipment(ctx).await?.created_at.coerce())
    }

    /// Indicator whether this `Equipment` may be deleted, i.e. it is not
    /// given out by an open `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Equipment.canDelete",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn can_delete(&self, ctx: &Context) -> Result<bool, Error> {
        ctx.service()
            .execute(query::equipment::CanDelete(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

/// Unique identifier of an `Equipment`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::equipment::Id)]
#[into(domain::equipment::Id)]
#[graphql(name = "EquipmentId", transparent)]
pub struct Id(Uuid);

/// Name of an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentName",
    with = scalar::Via::<domain::equipment::Name>,
)]
pub struct Name(domain::equipment::Name);

/// Serial number of an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentSerialNumber",
    with = scalar::Via::<domain::equipment::SerialNumber>,
)]
pub struct SerialNumber(domain::equipment::SerialNumber);

/// Description of an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentDescription",
    with = scalar::Via::<domain::equipment::Description>,
)]
pub struct Description(domain::equipment::Description);

/// Free-form notes about an `Equipment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EquipmentNotes",
    with = scalar::Via::<domain::equipment::Notes>,
)]
pub struct Notes(domain::equipment::Notes);

/// Availability status of an `Equipment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "EquipmentStatus")]
pub enum Status {
    /// May be rented.
    Available,

    /// Given out by an open `Rental`.
    Rented,
}

impl From<domain::equipment::Status> for Status {
    fn from(status: domain::equipment::Status) -> Self {
        use domain::equipment::Status as S;
        match status {
            S::Available => Self::Available,
            S::Rented => Self::Rented,
        }
    }
}

impl From<Status> for domain::equipment::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Available => Self::Available,
            Status::Rented => Self::Rented,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Equipment`] list.

    use juniper::graphql_object;
    use service::{query, read};

    use super::Equipment;
    use crate::{api, Context};

    /// Listed [`Equipment`] along with its [`Stats`].
    #[derive(Clone, Debug)]
    pub struct List {
        /// Listed [`Equipment`].
        items: Vec<Equipment>,

        /// [`Stats`] of the listed [`Equipment`].
        stats: Stats,
    }

    impl From<query::equipments::Output> for List {
        fn from(output: query::equipments::Output) -> Self {
            Self {
                items: output.items.into_iter().map(Into::into).collect(),
                stats: Stats(output.stats),
            }
        }
    }

    /// Listed `Equipment` along with its statistics.
    #[graphql_object(name = "EquipmentList", context = Context)]
    impl List {
        /// Listed `Equipment`, ordered by name.
        #[must_use]
        pub fn items(&self) -> &[Equipment] {
            &self.items
        }

        /// Statistics of the listed `Equipment`.
        #[must_use]
        pub fn stats(&self) -> Stats {
            self.stats
        }
    }

    /// Counts of the listed [`Equipment`].
    #[derive(Clone, Copy, Debug)]
    pub struct Stats(read::equipment::list::Stats);

    /// Counts of the listed `Equipment`.
    #[graphql_object(name = "EquipmentListStats", context = Context)]
    impl Stats {
        /// Total number of the listed `Equipment`.
        #[must_use]
        pub fn total(&self) -> i32 {
            api::count(self.0.total)
        }

        /// Number of the listed `AVAILABLE` `Equipment`.
        #[must_use]
        pub fn available(&self) -> i32 {
            api::count(self.0.available)
        }

        /// Number of the listed `RENTED` `Equipment`.
        #[must_use]
        pub fn rented(&self) -> i32 {
            api::count(self.0.rented)
        }
    }
}
