//! [`Client`]-related definitions.

use std::future;

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, person, scalar},
    AsError, Context, Error,
};

/// A client of the rental shop.
#[derive(Clone, Debug)]
pub struct Client {
    /// ID of this [`Client`].
    id: Id,

    /// Underlying [`domain::Client`].
    client: OnceCell<domain::Client>,
}

impl From<domain::Client> for Client {
    fn from(client: domain::Client) -> Self {
        Self {
            id: client.id.into(),
            client: OnceCell::new_with(Some(client)),
        }
    }
}

impl Client {
    /// Returns the underlying [`domain::Client`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Client`] doesn't exist or is deleted.
    async fn client(&self, ctx: &Context) -> Result<&domain::Client, Error> {
        let id = self.id.into();
        self.client
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::client::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::ClientError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A client of the rental shop.
#[graphql_object(context = Context)]
impl Client {
    /// Unique identifier of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Last name of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.lastName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn last_name(
        &self,
        ctx: &Context,
    ) -> Result<person::NamePart, Error> {
        Ok(self.client(ctx).await?.name.last.clone().into())
    }

    /// First name of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.firstName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn first_name(
        &self,
        ctx: &Context,
    ) -> Result<person::NamePart, Error> {
        Ok(self.client(ctx).await?.name.first.clone().into())
    }

    /// Middle name of this `Client`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.middleName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn middle_name(
        &self,
        ctx: &Context,
    ) -> Result<Option<person::NamePart>, Error> {
        Ok(self.client(ctx).await?.name.middle.clone().map(Into::into))
    }

    /// Full name of this `Client`, as `{last} {first} {middle}`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.fullName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn full_name(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.client(ctx).await?.name.to_string())
    }

    /// Phone of this `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<person::Phone, Error> {
        Ok(self.client(ctx).await?.phone.clone().into())
    }

    /// Email of this `Client`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(
        &self,
        ctx: &Context,
    ) -> Result<Option<person::Email>, Error> {
        Ok(self.client(ctx).await?.email.clone().map(Into::into))
    }

    /// `DateTime` when this `Client` was registered.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.registeredAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn registered_at(
        &self,
        ctx: &Context,
    ) -> Result<DateTime, Error> {
        Ok(self.client(ctx).await?.registered_at.coerce())
    }

    /// Indicator whether this `Client` may be deleted, i.e. the `Client` has
    /// no open `Rental`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.canDelete",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn can_delete(&self, ctx: &Context) -> Result<bool, Error> {
        ctx.service()
            .execute(query::client::CanDelete(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// `Rental`s of this `Client`, newest first.
    ///
    /// Only open or closed ones are listed if `open` is specified.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Client.rentals",
            open = ?open,
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rentals(
        &self,
        open: Option<bool>,
        ctx: &Context,
    ) -> Result<api::rental::list::List, Error> {
        ctx.service()
            .execute(query::rentals::List(read::rental::list::Filter {
                open,
                client_id: Some(self.id.into()),
                equipment_id: None,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Unique identifier of a `Client`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::client::Id)]
#[into(domain::client::Id)]
#[graphql(name = "ClientId", transparent)]
pub struct Id(Uuid);

/// Text searched in `Client` full names and phones.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ClientSearch",
    with = scalar::Via::<read::client::list::Search>,
)]
pub struct Search(read::client::list::Search);
