//! GraphQL API of the equipment rental [`Service`], served over HTTP.

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    Extension, Json,
};
use derive_more::Debug;
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    DefaultScalarValue, IntoFieldError as _, ScalarValue,
};
use juniper_axum::extract::JuniperRequest;
// Only the binary uses these.
use axum_client_ip as _;
use refinery as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::Context,
    error::{AsError, Error},
};

/// Rental [`Service`] backed by PostgreSQL.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Postgres>;

/// HTTP response carrying a GraphQL result.
#[derive(Debug)]
pub struct JuniperResponse<S = DefaultScalarValue>
where
    S: ScalarValue,
{
    /// Status sent if the GraphQL result contains errors.
    ///
    /// Successful results are always sent with `200 OK`.
    pub status_code: http::StatusCode,

    /// GraphQL result itself.
    #[debug(skip)]
    pub response: GraphQLBatchResponse<S>,
}

impl JuniperResponse {
    /// Creates a [`JuniperResponse`] failed as a whole before any field got
    /// resolved.
    #[must_use]
    pub fn failed(err: Error) -> Self {
        Self {
            status_code: err.status_code,
            response: GraphQLBatchResponse::Single(GraphQLResponse::error(
                err.into_field_error(),
            )),
        }
    }
}

impl<S> IntoResponse for JuniperResponse<S>
where
    S: ScalarValue,
{
    fn into_response(self) -> Response {
        let status = if self.response.is_ok() {
            http::StatusCode::OK
        } else {
            self.status_code
        };
        (status, Json(self.response)).into_response()
    }
}

/// Executes a GraphQL request, either a `GET` or a `POST` one.
pub async fn graphql(
    Extension(schema): Extension<Arc<api::Schema>>,
    ctx: Context,
    JuniperRequest(request): JuniperRequest,
) -> JuniperResponse {
    let response = request.execute(&*schema, &ctx).await;
    JuniperResponse {
        status_code: ctx.error_status_code(),
        response,
    }
}
