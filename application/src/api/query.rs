//! GraphQL [`Query`]s definitions.

use common::{Currency, DateTime};
use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Lists all the `Category`s, ordered by name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "categories",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn categories(
        ctx: &Context,
    ) -> Result<Vec<api::Category>, Error> {
        ctx.service()
            .execute(query::categories::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Returns the `Equipment` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` with the specified ID does
    ///                            not exist or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "equipment",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn equipment(
        id: api::equipment::Id,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        ctx.service()
            .execute(query::equipment::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| EquipmentError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Equipment` matching all the provided filters, ordered by
    /// name.
    #[tracing::instrument(
        skip_all,
        fields(
            category_id = ?category_id.map(|id| id.to_string()),
            gql.name = "equipmentList",
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn equipment_list(
        name: Option<api::equipment::Name>,
        category_id: Option<api::category::Id>,
        status: Option<api::equipment::Status>,
        ctx: &Context,
    ) -> Result<api::equipment::list::List, Error> {
        ctx.service()
            .execute(query::equipments::List(read::equipment::list::Filter {
                name: name.map(Into::into),
                category_id: category_id.map(Into::into),
                status: status.map(Into::into),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Indicates whether the `Equipment` with the specified ID may be
    /// deleted, i.e. it is not given out by an open `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "canDeleteEquipment",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn can_delete_equipment(
        id: api::equipment::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(query::equipment::CanDelete(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `Client` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the specified ID does not
    ///                         exist or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "client",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn client(
        id: api::client::Id,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        ctx.service()
            .execute(query::client::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ClientError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Client`s, newest registered first.
    ///
    /// Only the ones whose full name or phone contains the `search` text
    /// (ignoring case) are listed, if it's specified.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "clients",
            otel.name = Self::SPAN_NAME,
            search = ?search.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn clients(
        search: Option<api::client::Search>,
        ctx: &Context,
    ) -> Result<Vec<api::Client>, Error> {
        ctx.service()
            .execute(query::clients::List::by(read::client::list::Filter {
                search: search.map(Into::into),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Indicates whether the `Client` with the specified ID may be deleted,
    /// i.e. the `Client` has no open `Rental`s.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "canDeleteClient",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn can_delete_client(
        id: api::client::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(query::client::CanDelete(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `Employee` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPLOYEE_NOT_EXISTS` - the `Employee` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "employee",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn employee(
        id: api::employee::Id,
        ctx: &Context,
    ) -> Result<api::Employee, Error> {
        ctx.service()
            .execute(query::employee::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| EmployeeError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Employee`s matching all the provided filters, ordered by
    /// full name.
    ///
    /// The `search` text is matched against full names, phones and emails,
    /// ignoring case.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "employees",
            otel.name = Self::SPAN_NAME,
            position = ?position,
            search = ?search.as_ref().map(ToString::to_string),
        ),
    )]
    pub async fn employees(
        position: Option<api::employee::Position>,
        search: Option<api::employee::Search>,
        ctx: &Context,
    ) -> Result<api::employee::list::List, Error> {
        ctx.service()
            .execute(query::employees::List(read::employee::list::Filter {
                position: position.map(Into::into),
                search: search.map(Into::into),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Rental` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the specified ID does not
    ///                         exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "rental",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rental(
        id: api::rental::Id,
        ctx: &Context,
    ) -> Result<api::Rental, Error> {
        ctx.service()
            .execute(query::rental::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| RentalError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists the `Rental`s matching all the provided filters, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            client_id = ?client_id.map(|id| id.to_string()),
            equipment_id = ?equipment_id.map(|id| id.to_string()),
            gql.name = "rentals",
            open = ?open,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rentals(
        open: Option<bool>,
        client_id: Option<api::client::Id>,
        equipment_id: Option<api::equipment::Id>,
        ctx: &Context,
    ) -> Result<api::rental::list::List, Error> {
        ctx.service()
            .execute(query::rentals::List(read::rental::list::Filter {
                open,
                client_id: client_id.map(Into::into),
                equipment_id: equipment_id.map(Into::into),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists all the `ReturnRecord`s, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "returnRecords",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn return_records(
        ctx: &Context,
    ) -> Result<Vec<api::ReturnRecord>, Error> {
        ctx.service()
            .execute(query::return_records::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    /// Calculates the raw cost and the final price of a recipe made out of
    /// the provided `Ingredient`s.
    ///
    /// `margin` defaults to `50` percents.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `VALIDATION_ERROR` - no `Ingredient`s are provided, or they are
    ///                        priced in different currencies, or a quantity,
    ///                        a price or the `margin` is negative.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "recipeCost",
            ingredients = ingredients.len(),
            margin = ?margin.map(|m| m.to_string()),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn recipe_cost(
        ingredients: Vec<api::recipe::Ingredient>,
        margin: Option<api::recipe::Margin>,
        ctx: &Context,
    ) -> Result<api::recipe::Cost, Error> {
        let margin = margin
            .map(|m| {
                domain::recipe::Margin::new(m.into()).ok_or_else(|| {
                    Error::validation(&"Margin can't be negative")
                })
            })
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::recipe::Calculate {
                ingredients: ingredients.into_iter().map(Into::into).collect(),
                margin,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Calculates the `PeriodReport` for the specified inclusive period.
    ///
    /// `currency` defaults to the configured one.
    #[tracing::instrument(
        skip_all,
        fields(
            currency = ?currency,
            end_at = ?end_at,
            gql.name = "report",
            otel.name = Self::SPAN_NAME,
            start_at = ?start_at,
        ),
    )]
    pub async fn report(
        start_at: DateTime,
        end_at: DateTime,
        currency: Option<Currency>,
        ctx: &Context,
    ) -> Result<api::report::Report, Error> {
        ctx.service()
            .execute(query::report::Period {
                start: start_at,
                end: end_at,
                currency: currency
                    .unwrap_or(ctx.service().config().default_currency),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::report::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "REPORT_OVERFLOW"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "Revenue of the period is too large"]
                Overflow,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Overflow => Some(Error::Overflow.into()),
        }
    }
}

impl AsError for domain::recipe::RecipeError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::validation(self))
    }
}

define_error! {
    enum CategoryError {
        #[code = "CATEGORY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Category` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ClientError {
        #[code = "CLIENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Client` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum EmployeeError {
        #[code = "EMPLOYEE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Employee` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum EquipmentError {
        #[code = "EQUIPMENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Equipment` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum RentalError {
        #[code = "RENTAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Rental` with the specified ID does not exist"]
        NotExists,
    }
}
