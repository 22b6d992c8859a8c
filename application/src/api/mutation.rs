//! GraphQL [`Mutation`]s definitions.

use common::{DateTime, Money};
use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{
    api::{self, person},
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Category` with the provided name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createCategory",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_category(
        name: api::category::Name,
        ctx: &Context,
    ) -> Result<api::Category, Error> {
        ctx.service()
            .execute(command::CreateCategory { name: name.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds a new `Equipment` to the catalogue.
    ///
    /// `hourlyRate` is omitted for `Equipment` rented daily only.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CATEGORY_NOT_EXISTS` - the `Category` with the provided ID does not
    ///                           exist;
    /// - `VALIDATION_ERROR` - the rates are negative or priced in different
    ///                        currencies.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            category_id = %category_id,
            daily_rate = %daily_rate,
            deposit = %deposit,
            gql.name = "createEquipment",
            hourly_rate = ?hourly_rate.map(|r| r.to_string()),
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_equipment(
        name: api::equipment::Name,
        category_id: api::category::Id,
        daily_rate: Money,
        hourly_rate: Option<Money>,
        deposit: Money,
        serial_number: Option<api::equipment::SerialNumber>,
        description: Option<api::equipment::Description>,
        notes: Option<api::equipment::Notes>,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        ctx.service()
            .execute(command::CreateEquipment {
                name: name.into(),
                category_id: category_id.into(),
                serial_number: serial_number.map(Into::into),
                description: description.map(Into::into),
                notes: notes.map(Into::into),
                daily_rate,
                hourly_rate,
                deposit,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces all the editable fields of the `Equipment` with the provided
    /// ID.
    ///
    /// The `status` of the `Equipment` is left untouched.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` with the provided ID does
    ///                            not exist or is deleted;
    /// - `CATEGORY_NOT_EXISTS` - the `Category` with the provided ID does not
    ///                           exist;
    /// - `VALIDATION_ERROR` - the rates are negative or priced in different
    ///                        currencies.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            category_id = %category_id,
            daily_rate = %daily_rate,
            deposit = %deposit,
            gql.name = "updateEquipment",
            hourly_rate = ?hourly_rate.map(|r| r.to_string()),
            id = %id,
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_equipment(
        id: api::equipment::Id,
        name: api::equipment::Name,
        category_id: api::category::Id,
        daily_rate: Money,
        hourly_rate: Option<Money>,
        deposit: Money,
        serial_number: Option<api::equipment::SerialNumber>,
        description: Option<api::equipment::Description>,
        notes: Option<api::equipment::Notes>,
        ctx: &Context,
    ) -> Result<api::Equipment, Error> {
        ctx.service()
            .execute(command::UpdateEquipment {
                equipment_id: id.into(),
                name: name.into(),
                category_id: category_id.into(),
                serial_number: serial_number.map(Into::into),
                description: description.map(Into::into),
                notes: notes.map(Into::into),
                daily_rate,
                hourly_rate,
                deposit,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Equipment` with the provided ID.
    ///
    /// The `Equipment` stays referenced by its past `Rental`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` with the provided ID does
    ///                            not exist or is already deleted;
    /// - `HAS_OPEN_RENTAL` - the `Equipment` is given out by an open
    ///                       `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteEquipment",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_equipment(
        id: api::equipment::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(command::DeleteEquipment {
                equipment_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Registers a new `Client`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email.as_ref().map(ToString::to_string),
            gql.name = "createClient",
            otel.name = Self::SPAN_NAME,
            phone = %phone,
        ),
    )]
    pub async fn create_client(
        last_name: person::NamePart,
        first_name: person::NamePart,
        middle_name: Option<person::NamePart>,
        phone: person::Phone,
        email: Option<person::Email>,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        ctx.service()
            .execute(command::CreateClient {
                name: person::full_name(last_name, first_name, middle_name),
                phone: phone.into(),
                email: email.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces the name and the contacts of the `Client` with the provided
    /// ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the provided ID does not
    ///                         exist or is deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email.as_ref().map(ToString::to_string),
            gql.name = "updateClient",
            id = %id,
            otel.name = Self::SPAN_NAME,
            phone = %phone,
        ),
    )]
    pub async fn update_client(
        id: api::client::Id,
        last_name: person::NamePart,
        first_name: person::NamePart,
        middle_name: Option<person::NamePart>,
        phone: person::Phone,
        email: Option<person::Email>,
        ctx: &Context,
    ) -> Result<api::Client, Error> {
        ctx.service()
            .execute(command::UpdateClient {
                client_id: id.into(),
                name: person::full_name(last_name, first_name, middle_name),
                phone: phone.into(),
                email: email.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Client` with the provided ID.
    ///
    /// The `Client` stays referenced by its past `Rental`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the provided ID does not
    ///                         exist or is already deleted;
    /// - `HAS_OPEN_RENTAL` - the `Client` has an open `Rental`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteClient",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_client(
        id: api::client::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(command::DeleteClient {
                client_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Creates a new `Employee` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - the provided email is used by another
    ///                      `Employee`.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createEmployee",
            otel.name = Self::SPAN_NAME,
            phone = %phone,
            position = ?position,
        ),
    )]
    pub async fn create_employee(
        last_name: person::NamePart,
        first_name: person::NamePart,
        middle_name: Option<person::NamePart>,
        position: api::employee::Position,
        phone: person::Phone,
        email: person::Email,
        password: api::employee::Password,
        ctx: &Context,
    ) -> Result<api::Employee, Error> {
        ctx.service()
            .execute(command::CreateEmployee {
                name: person::full_name(last_name, first_name, middle_name),
                position: position.into(),
                phone: phone.into(),
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces the profile of the `Employee` with the provided ID.
    ///
    /// The password is changed only if a new one is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPLOYEE_NOT_EXISTS` - the `Employee` with the provided ID does not
    ///                           exist;
    /// - `EMAIL_OCCUPIED` - the provided email is used by another
    ///                      `Employee`.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "updateEmployee",
            id = %id,
            otel.name = Self::SPAN_NAME,
            phone = %phone,
            position = ?position,
        ),
    )]
    pub async fn update_employee(
        id: api::employee::Id,
        last_name: person::NamePart,
        first_name: person::NamePart,
        middle_name: Option<person::NamePart>,
        position: api::employee::Position,
        phone: person::Phone,
        email: person::Email,
        password: Option<api::employee::Password>,
        ctx: &Context,
    ) -> Result<api::Employee, Error> {
        ctx.service()
            .execute(command::UpdateEmployee {
                employee_id: id.into(),
                name: person::full_name(last_name, first_name, middle_name),
                position: position.into(),
                phone: phone.into(),
                email: email.into(),
                password: password.map(|p| {
                    secrecy::SecretBox::init_with(move || p.into())
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Checks the provided credentials and returns the matching `Employee`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - the credentials don't match any `Employee`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "authenticateEmployee",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn authenticate_employee(
        email: person::Email,
        password: api::employee::Password,
        ctx: &Context,
    ) -> Result<api::Employee, Error> {
        ctx.service()
            .execute(command::AuthenticateEmployee {
                email: email.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Opens a new `Rental` of the `Equipment` by the `Client`, marking the
    /// `Equipment` as `RENTED`.
    ///
    /// `plannedReturnAt` defaults to the configured rental duration from now.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CLIENT_NOT_EXISTS` - the `Client` with the provided ID does not
    ///                         exist or is deleted;
    /// - `EMPLOYEE_NOT_EXISTS` - the `Employee` with the provided ID does not
    ///                           exist;
    /// - `EQUIPMENT_NOT_EXISTS` - the `Equipment` with the provided ID does
    ///                            not exist or is deleted;
    /// - `EQUIPMENT_UNAVAILABLE` - the `Equipment` is already rented;
    /// - `MISSING_RATE` - the `Equipment` has no rate for the `unit`;
    /// - `VALIDATION_ERROR` - the `period` is not positive, or the
    ///                        `plannedReturnAt` is in the past.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            client_id = %client_id,
            employee_id = %employee_id,
            equipment_id = %equipment_id,
            gql.name = "openRental",
            otel.name = Self::SPAN_NAME,
            payment_status = ?payment_status,
            period = period,
            unit = ?unit,
        ),
    )]
    pub async fn open_rental(
        client_id: api::client::Id,
        equipment_id: api::equipment::Id,
        employee_id: api::employee::Id,
        unit: api::rental::Unit,
        period: i32,
        payment_status: api::rental::PaymentStatus,
        planned_return_at: Option<DateTime>,
        notes: Option<api::rental::Notes>,
        ctx: &Context,
    ) -> Result<api::Rental, Error> {
        let planned_return_at = planned_return_at.unwrap_or_else(|| {
            DateTime::now() + ctx.service().config().default_rental_duration
        });

        ctx.service()
            .execute(command::OpenRental {
                client_id: client_id.into(),
                equipment_id: equipment_id.into(),
                employee_id: employee_id.into(),
                unit: unit.into(),
                period: u32::try_from(period).unwrap_or_default(),
                planned_return_at: planned_return_at.coerce(),
                payment_status: payment_status.into(),
                notes: notes.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Closes the open `Rental` with the provided ID, settling its deposit
    /// according to the `condition` and marking its `Equipment` as
    /// `AVAILABLE`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RENTAL_NOT_EXISTS` - the `Rental` with the provided ID does not
    ///                         exist;
    /// - `ALREADY_RETURNED` - the `Rental` is already closed;
    /// - `DAMAGE_DESCRIPTION_REQUIRED` - the `condition` is `DAMAGED`, but no
    ///                                   `damageDescription` is provided, or
    ///                                   it's blank;
    /// - `VALIDATION_ERROR` - the trimmed `damageDescription` is too long.
    ///
    /// `damageDescription` is trimmed, and a blank one is treated as absent.
    #[tracing::instrument(
        skip_all,
        fields(
            condition = ?condition,
            gql.name = "processReturn",
            otel.name = Self::SPAN_NAME,
            rental_id = %rental_id,
        ),
    )]
    pub async fn process_return(
        rental_id: api::rental::Id,
        condition: api::return_record::Condition,
        damage_description: Option<String>,
        manager_comment: Option<api::return_record::ManagerComment>,
        ctx: &Context,
    ) -> Result<api::ReturnRecord, Error> {
        let damage_description = damage_description
            .as_deref()
            .map(domain::return_record::DamageDescription::from_trimmed)
            .transpose()
            .map_err(|e| Error::validation(&e))
            .map_err(ctx.error())?
            .flatten();

        ctx.service()
            .execute(command::ProcessReturn {
                rental_id: rental_id.into(),
                condition: condition.into(),
                damage_description,
                manager_comment: manager_comment.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum ConflictError {
        #[code = "HAS_OPEN_RENTAL"]
        #[status = CONFLICT]
        #[message = "Entity is involved into an open `Rental`"]
        HasOpenRental,

        #[code = "EMAIL_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "Email is used by another `Employee`"]
        EmailOccupied,
    }
}

impl AsError for command::authenticate_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any \
                             `Employee`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::WrongCredentials => Some(Error::WrongCredentials.into()),
        }
    }
}

impl AsError for command::create_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(ConflictError::EmailOccupied.into()),
            Self::PasswordHashing(_) => None,
        }
    }
}

impl AsError for command::update_employee::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PasswordHashing(_) => return None,
            Self::EmployeeNotExists(_) => {
                api::query::EmployeeError::NotExists.into()
            }
            Self::EmailOccupied(_) => ConflictError::EmailOccupied.into(),
        })
    }
}

impl AsError for command::create_equipment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CategoryNotExists(_) => {
                api::query::CategoryError::NotExists.into()
            }
            Self::InvalidRates(e) => Error::validation(e),
        })
    }
}

impl AsError for command::update_equipment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EquipmentNotExists(_) => {
                api::query::EquipmentError::NotExists.into()
            }
            Self::CategoryNotExists(_) => {
                api::query::CategoryError::NotExists.into()
            }
            Self::InvalidRates(e) => Error::validation(e),
        })
    }
}

impl AsError for command::delete_equipment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EquipmentNotExists(_) => {
                api::query::EquipmentError::NotExists.into()
            }
            Self::HasOpenRental(_) => ConflictError::HasOpenRental.into(),
        })
    }
}

impl AsError for command::update_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ClientNotExists(_) => {
                Some(api::query::ClientError::NotExists.into())
            }
        }
    }
}

impl AsError for command::delete_client::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ClientNotExists(_) => {
                api::query::ClientError::NotExists.into()
            }
            Self::HasOpenRental(_) => ConflictError::HasOpenRental.into(),
        })
    }
}

impl AsError for command::open_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EQUIPMENT_UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Equipment` is already rented"]
                EquipmentUnavailable,

                #[code = "MISSING_RATE"]
                #[status = BAD_REQUEST]
                #[message = "`Equipment` has no rate for the requested \
                             `RentalUnit`"]
                MissingRate,

                #[code = "COST_OVERFLOW"]
                #[status = BAD_REQUEST]
                #[message = "Rental cost is too large"]
                CostOverflow,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidPeriod | Self::InvalidPlannedReturn => {
                crate::Error::validation(self)
            }
            Self::ClientNotExists(_) => {
                api::query::ClientError::NotExists.into()
            }
            Self::EmployeeNotExists(_) => {
                api::query::EmployeeError::NotExists.into()
            }
            Self::EquipmentNotExists(_) => {
                api::query::EquipmentError::NotExists.into()
            }
            Self::MissingRate(_) => Error::MissingRate.into(),
            Self::CostOverflow(_) => Error::CostOverflow.into(),
            Self::EquipmentUnavailable(_) => {
                Error::EquipmentUnavailable.into()
            }
        })
    }
}

impl AsError for command::process_return::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "ALREADY_RETURNED"]
                #[status = CONFLICT]
                #[message = "`Rental` is already closed"]
                AlreadyReturned,

                #[code = "DAMAGE_DESCRIPTION_REQUIRED"]
                #[status = BAD_REQUEST]
                #[message = "Damaged `Equipment` requires a damage \
                             description"]
                DamageDescriptionRequired,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RentalNotExists(_) => {
                api::query::RentalError::NotExists.into()
            }
            Self::AlreadyReturned(_) => Error::AlreadyReturned.into(),
            Self::DamageDescriptionRequired => {
                Error::DamageDescriptionRequired.into()
            }
        })
    }
}
