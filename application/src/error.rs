//! API [`Error`] and conversions into it.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::infra::database;
use tracerr::{Trace, Traced};

/// Declares an enum of expected API errors, each variant carrying its
/// machine-readable code, HTTP status and message.
///
/// ```ignore
/// define_error! {
///     enum RentalError {
///         #[code = "RENTAL_NOT_EXISTS"]
///         #[status = NOT_FOUND]
///         #[message = "`Rental` with the specified ID does not exist"]
///         NotExists,
///     }
/// }
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Expected API error.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                let (code, status) = match err {
                    $(
                        $name::$variant => {
                            ($code, ::http::StatusCode::$status_code)
                        }
                    )*
                };
                Self::new(code, status, &err)
            }
        }
    };
}

/// Error returned to API clients.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// Machine-readable [`Code`], e.g. `EQUIPMENT_UNAVAILABLE`.
    pub code: Code,

    /// [`http::StatusCode`] the whole response is sent with.
    pub status_code: http::StatusCode,

    /// Where the error originated, if traced.
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// Human-readable description.
    pub message: String,
}

impl Error {
    /// Creates a new untraced [`Error`].
    #[must_use]
    pub fn new(
        code: Code,
        status_code: http::StatusCode,
        msg: &impl ToString,
    ) -> Self {
        Self {
            code,
            status_code,
            backtrace: None,
            message: msg.to_string(),
        }
    }

    /// Creates an [`Error`] the client can do nothing about.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self::new(
            "INTERNAL_SERVER_ERROR",
            http::StatusCode::INTERNAL_SERVER_ERROR,
            msg,
        )
    }

    /// Creates an [`Error`] of arguments rejected before touching any data.
    #[must_use]
    pub fn validation(msg: &impl ToString) -> Self {
        Self::new("VALIDATION_ERROR", http::StatusCode::BAD_REQUEST, msg)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        for frame in self.backtrace.iter().flat_map(|t| t.iter()) {
            write!(f, "\n  at {frame}")?;
        }
        Ok(())
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let frames = self
            .backtrace
            .iter()
            .flat_map(|trace| trace.iter())
            .map(|frame| juniper::Value::scalar(frame.to_string()))
            .collect_vec();

        let mut extensions = juniper::Object::with_capacity(3);
        for (name, value) in [
            ("code", juniper::Value::scalar(self.code.to_owned())),
            (
                "status",
                juniper::Value::scalar(self.status_code.as_u16().to_string()),
            ),
            ("backtrace", juniper::Value::list(frames)),
        ] {
            drop(extensions.add_field(name, value));
        }

        juniper::FieldError::new(
            self.message,
            juniper::Value::object(extensions),
        )
    }
}

/// Machine-readable [`Error`] code.
pub type Code = &'static str;

/// Conversion of lower-layer errors into API [`Error`]s.
pub trait AsError {
    /// Returns the API [`Error`] this one represents, or [`None`] if it's
    /// unexpected and shouldn't be exposed as is.
    fn try_as_error(&self) -> Option<Error>;

    /// Returns the API [`Error`] this one represents, reporting unexpected
    /// ones as [`Error::internal()`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error().unwrap_or_else(|| Error::internal(&self))
    }

    /// Same as [`AsError::as_error()`], but consuming.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        self.as_ref().try_as_error().map(|e| Error {
            backtrace: Some(self.trace().clone()),
            ..e
        })
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, FieldError, IntoFieldError as _};

    use super::{AsError, Error};

    crate::define_error! {
        enum ShelfError {
            #[code = "SHELF_EMPTY"]
            #[status = CONFLICT]
            #[message = "Shelf is empty"]
            Empty,
        }
    }

    #[test]
    fn declared_error_carries_code_and_status() {
        let err = Error::from(ShelfError::Empty);

        assert_eq!(err.code, "SHELF_EMPTY");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
        assert_eq!(err.message, "Shelf is empty");
        assert_eq!(err.to_string(), "[SHELF_EMPTY] Shelf is empty");
    }

    #[test]
    fn field_error_exposes_extensions() {
        let field: FieldError<DefaultScalarValue> =
            Error::validation(&"margin must not be negative")
                .into_field_error();

        assert_eq!(field.message(), "margin must not be negative");
        let ext = field.extensions().as_object_value().expect("object");
        assert_eq!(
            ext.get_field_value("code")
                .and_then(|v| v.as_string_value()),
            Some("VALIDATION_ERROR"),
        );
        assert_eq!(
            ext.get_field_value("status")
                .and_then(|v| v.as_string_value()),
            Some("400"),
        );
    }

    #[test]
    fn unexpected_errors_become_internal() {
        #[derive(Debug, derive_more::Display)]
        #[display("disk on fire")]
        struct Unexpected;

        impl AsError for Unexpected {
            fn try_as_error(&self) -> Option<Error> {
                None
            }
        }

        let err = Unexpected.into_error();

        assert_eq!(err.code, "INTERNAL_SERVER_ERROR");
        assert_eq!(err.status_code, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "disk on fire");
    }
}
