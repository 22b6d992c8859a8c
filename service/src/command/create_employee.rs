//! [`Command`] for creating a new [`Employee`].

use argon2::password_hash;
use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret as _, SecretBox};
use tracerr::Traced;

use crate::{
    domain::{employee, person, Employee},
    infra::{
        database::{self, constraint},
        Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Employee`].
#[derive(Debug)]
pub struct CreateEmployee {
    /// [`person::FullName`] of a new [`Employee`].
    pub name: person::FullName,

    /// [`employee::Position`] of a new [`Employee`].
    pub position: employee::Position,

    /// [`person::Phone`] of a new [`Employee`].
    pub phone: person::Phone,

    /// [`person::Email`] of a new [`Employee`], used as the login.
    pub email: person::Email,

    /// [`employee::Password`] of a new [`Employee`].
    pub password: SecretBox<employee::Password>,
}

impl<Db> Command<CreateEmployee> for Service<Db>
where
    Db: for<'e> Database<
            Select<By<Option<Employee>, &'e person::Email>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<Insert<Employee>, Err = Traced<database::Error>>,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateEmployee {
            name,
            position,
            phone,
            email,
            password,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let employee = Employee {
            id: employee::Id::new(),
            name,
            position,
            phone,
            email,
            password_hash: employee::PasswordHash::new(password.expose_secret())
                .map_err(tracerr::from_and_wrap!(=> E))?,
            created_at: DateTime::now().coerce(),
        };

        // Same `Email` may still be taken concurrently.
        let inserted = self.database().execute(Insert(employee.clone())).await;
        if inserted.as_ref().is_err_and(|e| {
            e.as_ref().is_unique_violation(Some(constraint::EMPLOYEE_EMAIL))
        }) {
            return Err(tracerr::new!(E::EmailOccupied(employee.email)));
        }
        inserted
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            employee.id = %employee.id,
            position = %employee.position,
            "employee created",
        );

        Ok(employee)
    }
}

/// Error of [`CreateEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`person::Email`] is already used by another [`Employee`].
    #[display("`{_0}` email is occupied")]
    EmailOccupied(#[error(not(source))] person::Email),

    /// [`employee::Password`] cannot be hashed.
    #[display("Failed to hash password: {_0}")]
    #[from]
    PasswordHashing(#[error(not(source))] password_hash::Error),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        domain::{employee, person},
        fixture,
        query::employees,
        Command as _, Query as _,
    };

    use super::{CreateEmployee, ExecutionError as E};

    fn cmd(email: &str, password: &str) -> CreateEmployee {
        CreateEmployee {
            name: fixture::full_name("Orlov", "Pavel"),
            position: employee::Position::Administrator,
            phone: person::Phone::new("+7 912 000-00-02").unwrap(),
            email: person::Email::new(email).unwrap(),
            password: SecretBox::new(Box::new(password.into())),
        }
    }

    #[tokio::test]
    async fn hashes_password() {
        let svc = fixture::service();

        let created = svc.execute(cmd("boss@shop.ru", "qwerty1")).await.unwrap();

        assert!(created.password_hash.verify(&"qwerty1".into()));
        assert!(!created.password_hash.verify(&"qwerty2".into()));
        let all = svc.execute(employees::List::default()).await.unwrap();
        assert_eq!(all.items.len(), 1);
        assert_eq!(all.items[0].id, created.id);
        assert_eq!(all.stats.administrators, 1);
    }

    #[tokio::test]
    async fn refuses_occupied_email() {
        let svc = fixture::service();
        svc.execute(cmd("boss@shop.ru", "qwerty1")).await.unwrap();

        let err = svc
            .execute(cmd("BOSS@shop.ru", "qwerty2"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            E::EmailOccupied(email) if email.to_string() == "boss@shop.ru",
        ));
    }
}
