//! [`Employee`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, read, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, person, scalar},
    AsError, Context, Error,
};

/// An employee of the rental shop.
#[derive(Clone, Debug)]
pub struct Employee {
    /// ID of this [`Employee`].
    id: Id,

    /// Underlying [`domain::Employee`].
    employee: OnceCell<domain::Employee>,
}

impl From<domain::Employee> for Employee {
    fn from(employee: domain::Employee) -> Self {
        Self {
            id: employee.id.into(),
            employee: OnceCell::new_with(Some(employee)),
        }
    }
}

impl Employee {
    /// Creates a new [`Employee`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Employee`] with the provided ID exists,
    /// otherwise accessing this [`Employee`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            employee: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Employee`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Employee`] doesn't exist.
    async fn employee(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Employee, Error> {
        let id = self.id.into();
        self.employee
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::employee::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|e| {
                        future::ready(e.ok_or_else(|| {
                            api::query::EmployeeError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// An employee of the rental shop.
#[graphql_object(context = Context)]
impl Employee {
    /// Unique identifier of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Last name of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.lastName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn last_name(
        &self,
        ctx: &Context,
    ) -> Result<person::NamePart, Error> {
        Ok(self.employee(ctx).await?.name.last.clone().into())
    }

    /// First name of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.firstName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn first_name(
        &self,
        ctx: &Context,
    ) -> Result<person::NamePart, Error> {
        Ok(self.employee(ctx).await?.name.first.clone().into())
    }

    /// Middle name of this `Employee`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.middleName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn middle_name(
        &self,
        ctx: &Context,
    ) -> Result<Option<person::NamePart>, Error> {
        Ok(self.employee(ctx).await?.name.middle.clone().map(Into::into))
    }

    /// Position of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.position",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn position(&self, ctx: &Context) -> Result<Position, Error> {
        Ok(self.employee(ctx).await?.position.into())
    }

    /// Phone of this `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<person::Phone, Error> {
        Ok(self.employee(ctx).await?.phone.clone().into())
    }

    /// Email of this `Employee`, used as the login.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<person::Email, Error> {
        Ok(self.employee(ctx).await?.email.clone().into())
    }

    /// `DateTime` when this `Employee` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Employee.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.employee(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of an `Employee`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::employee::Id)]
#[into(domain::employee::Id)]
#[graphql(name = "EmployeeId", transparent)]
pub struct Id(Uuid);

/// Password of an `Employee`.
#[derive(AsRef, Clone, Debug, From, GraphQLScalar, Into)]
#[graphql(
    name = "EmployeePassword",
    with = scalar::Via::<domain::employee::Password>,
)]
pub struct Password(domain::employee::Password);

/// Text searched in `Employee` full names, phones and emails.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "EmployeeSearch",
    with = scalar::Via::<read::employee::list::Search>,
)]
pub struct Search(read::employee::list::Search);

/// Position of an `Employee`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "EmployeePosition")]
pub enum Position {
    /// Administrator managing the catalogue and the staff.
    Administrator,

    /// Manager serving clients.
    Manager,
}

impl From<domain::employee::Position> for Position {
    fn from(position: domain::employee::Position) -> Self {
        use domain::employee::Position as P;
        match position {
            P::Administrator => Self::Administrator,
            P::Manager => Self::Manager,
        }
    }
}

impl From<Position> for domain::employee::Position {
    fn from(position: Position) -> Self {
        match position {
            Position::Administrator => Self::Administrator,
            Position::Manager => Self::Manager,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Employee`] list.

    use juniper::graphql_object;
    use service::{query, read};

    use super::Employee;
    use crate::{api, Context};

    /// Listed [`Employee`]s along with their [`Stats`].
    #[derive(Clone, Debug)]
    pub struct List {
        /// Listed [`Employee`]s.
        items: Vec<Employee>,

        /// [`Stats`] of the listed [`Employee`]s.
        stats: Stats,
    }

    impl From<query::employees::Output> for List {
        fn from(output: query::employees::Output) -> Self {
            Self {
                items: output.items.into_iter().map(Into::into).collect(),
                stats: Stats(output.stats),
            }
        }
    }

    /// Listed `Employee`s along with their statistics.
    #[graphql_object(name = "EmployeeList", context = Context)]
    impl List {
        /// Listed `Employee`s, ordered by full name.
        #[must_use]
        pub fn items(&self) -> &[Employee] {
            &self.items
        }

        /// Statistics of the listed `Employee`s.
        #[must_use]
        pub fn stats(&self) -> Stats {
            self.stats
        }
    }

    /// Counts of the listed [`Employee`]s.
    #[derive(Clone, Copy, Debug)]
    pub struct Stats(read::employee::list::Stats);

    /// Counts of the listed `Employee`s.
    #[graphql_object(name = "EmployeeListStats", context = Context)]
    impl Stats {
        /// Total number of the listed `Employee`s.
        #[must_use]
        pub fn total(&self) -> i32 {
            api::count(self.0.total)
        }

        /// Number of the listed `ADMINISTRATOR`s.
        #[must_use]
        pub fn administrators(&self) -> i32 {
            api::count(self.0.administrators)
        }

        /// Number of the listed `MANAGER`s.
        #[must_use]
        pub fn managers(&self) -> i32 {
            api::count(self.0.managers)
        }
    }
}
