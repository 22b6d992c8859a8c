//! [`Command`] for checking credentials of an [`Employee`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret as _, SecretBox};
use tracerr::Traced;

use crate::{
    domain::{employee, person, Employee},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for checking credentials of an [`Employee`].
///
/// Issues no session: the resolved [`Employee`] ID is passed to other
/// [`Command`]s explicitly.
#[derive(Debug)]
pub struct AuthenticateEmployee {
    /// [`person::Email`] of the [`Employee`].
    pub email: person::Email,

    /// [`employee::Password`] of the [`Employee`].
    pub password: SecretBox<employee::Password>,
}

impl<Db> Command<AuthenticateEmployee> for Service<Db>
where
    Db: for<'e> Database<
        Select<By<Option<Employee>, &'e person::Email>>,
        Ok = Option<Employee>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        AuthenticateEmployee { email, password }: AuthenticateEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let employee = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::WrongCredentials)
            .map_err(tracerr::wrap!())?;

        if !employee.password_hash.verify(password.expose_secret()) {
            tracing::debug!(employee.id = %employee.id, "wrong password");
            return Err(tracerr::new!(E::WrongCredentials));
        }

        Ok(employee)
    }
}

/// Error of [`AuthenticateEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Wrong [`person::Email`] or [`employee::Password`].
    #[display("Wrong credentials")]
    WrongCredentials,
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{domain::person, fixture, Command as _};

    use super::{AuthenticateEmployee, ExecutionError as E};

    fn cmd(email: &str, password: &str) -> AuthenticateEmployee {
        AuthenticateEmployee {
            email: person::Email::new(email).unwrap(),
            password: SecretBox::new(Box::new(password.into())),
        }
    }

    #[tokio::test]
    async fn checks_password() {
        let svc = fixture::service();
        let employee = fixture::employee(&svc, "a@shop.ru").await;

        let found = svc.execute(cmd("A@shop.ru", "s3cret!")).await.unwrap();
        assert_eq!(found.id, employee.id);

        let err = svc.execute(cmd("a@shop.ru", "s3cret?")).await.unwrap_err();
        assert!(matches!(err.into_inner(), E::WrongCredentials));

        let err = svc.execute(cmd("b@shop.ru", "s3cret!")).await.unwrap_err();
        assert!(matches!(err.into_inner(), E::WrongCredentials));
    }
}
