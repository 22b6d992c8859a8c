//! Per-request GraphQL [`Context`].

use std::sync::atomic::{AtomicU16, Ordering};

use axum::{async_trait, extract::FromRequestParts};

use crate::{Error, JuniperResponse, Service};

/// State of a single GraphQL request.
#[derive(Debug)]
pub struct Context {
    /// Rental [`Service`] to resolve fields with.
    service: Service,

    /// [`http::StatusCode`] to respond with if any field fails.
    ///
    /// The last failed field wins.
    failure_status: AtomicU16,
}

impl Context {
    /// Creates a new [`Context`] over the provided [`Service`].
    #[must_use]
    pub fn new(service: Service) -> Self {
        Self {
            service,
            failure_status: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
        }
    }

    /// Returns the rental [`Service`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the [`http::StatusCode`] of a failed response.
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        let code = self.failure_status.load(Ordering::Relaxed);
        http::StatusCode::from_u16(code)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Overrides the [`http::StatusCode`] of a failed response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.failure_status
            .store(status_code.as_u16(), Ordering::Relaxed);
    }

    /// Returns a closure for [`Result::map_err()`] that records the status of
    /// the passed [`Error`] and returns it back.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Service>()
            .cloned()
            .map(Self::new)
            .ok_or_else(|| {
                JuniperResponse::failed(Error::internal(
                    &"`Service` is not attached to the router",
                ))
            })
    }
}
