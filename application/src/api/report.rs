//! [`Report`] definitions.

use common::Money;
use juniper::graphql_object;
use service::{query, Query as _};

use crate::{api, AsError, Context, Error};

/// Figures of the rental shop within a period.
#[derive(Clone, Debug)]
pub struct Report {
    /// Underlying [`query::report::Output`].
    output: query::report::Output,
}

impl From<query::report::Output> for Report {
    fn from(output: query::report::Output) -> Self {
        Self { output }
    }
}

/// Figures of the rental shop within a period.
#[graphql_object(name = "PeriodReport", context = Context)]
impl Report {
    /// Sum of the total costs of the `Rental`s opened within the period and
    /// charged in the report currency.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PeriodReport.revenue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn revenue(&self) -> Money {
        self.output.revenue
    }

    /// Number of `Rental`s opened within the period.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PeriodReport.rentalsCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn rentals_count(&self) -> i32 {
        api::count(self.output.rentals)
    }

    /// Revenue per a single `Rental` charged in the report currency.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PeriodReport.averageCheck",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn average_check(&self) -> Money {
        self.output.average_check
    }

    /// Number of `Client`s registered within the period.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PeriodReport.newClientsCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn new_clients_count(&self) -> i32 {
        api::count(self.output.new_clients)
    }

    /// Number of `Equipment` returns made within the period.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PeriodReport.returnsCount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn returns_count(&self) -> i32 {
        api::count(self.output.returns)
    }

    /// `Client`s who spent the most within the period, in descending order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PeriodReport.topClients",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn top_clients(&self) -> Vec<ClientRow> {
        self.output.top_clients.iter().copied().map(ClientRow).collect()
    }

    /// Most rented `Equipment` within the period, in descending order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PeriodReport.topEquipment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn top_equipment(&self) -> Vec<EquipmentRow> {
        self.output
            .top_equipment
            .iter()
            .copied()
            .map(EquipmentRow)
            .collect()
    }
}

/// Row of [`Report::top_clients`].
#[derive(Clone, Copy, Debug)]
pub struct ClientRow(query::report::ClientRow);

/// Row of the `PeriodReport.topClients`.
#[graphql_object(name = "PeriodReportClientRow", context = Context)]
impl ClientRow {
    /// `Client` this row is about.
    ///
    /// `null` if the `Client` has been deleted since.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PeriodReportClientRow.client",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn client(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Client>, Error> {
        ctx.service()
            .execute(query::client::ById::by(self.0.client_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.map(Into::into))
    }

    /// Sum spent by the `Client` within the period.
    #[must_use]
    pub fn spent(&self) -> Money {
        self.0.spent
    }
}

/// Row of [`Report::top_equipment`].
#[derive(Clone, Copy, Debug)]
pub struct EquipmentRow(query::report::EquipmentRow);

/// Row of the `PeriodReport.topEquipment`.
#[graphql_object(name = "PeriodReportEquipmentRow", context = Context)]
impl EquipmentRow {
    /// `Equipment` this row is about.
    ///
    /// `null` if the `Equipment` has been deleted since.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PeriodReportEquipmentRow.equipment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn equipment(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Equipment>, Error> {
        ctx.service()
            .execute(query::equipment::ById::by(self.0.equipment_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|e| e.map(Into::into))
    }

    /// Number of `Rental`s of the `Equipment` opened within the period.
    #[must_use]
    pub fn rentals_count(&self) -> i32 {
        api::count(self.0.rentals)
    }
}
