//! [`Command`] for updating an [`Employee`].

use argon2::password_hash;
use common::operations::{By, Commit, Select, Transact, Transacted, Update};
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

/// [`Command`] for updating an [`Employee`].
#[derive(Debug)]
pub struct UpdateEmployee {
    /// ID of the [`Employee`] to update.
    pub employee_id: employee::Id,

    /// New [`person::FullName`] of the [`Employee`].
    pub name: person::FullName,

    /// New [`employee::Position`] of the [`Employee`].
    pub position: employee::Position,

    /// New [`person::Phone`] of the [`Employee`].
    pub phone: person::Phone,

    /// New [`person::Email`] of the [`Employee`].
    pub email: person::Email,

    /// New [`employee::Password`] of the [`Employee`].
    ///
    /// [`None`] keeps the current one.
    pub password: Option<SecretBox<employee::Password>>,
}

impl<Db> Command<UpdateEmployee> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Employee>, employee::Id>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + for<'e> Database<
            Select<By<Option<Employee>, &'e person::Email>>,
            Ok = Option<Employee>,
            Err = Traced<database::Error>,
        > + Database<Update<Employee>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Employee;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateEmployee,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateEmployee {
            employee_id,
            name,
            position,
            phone,
            email,
            password,
        } = cmd;

        let password_hash = password
            .map(|p| employee::PasswordHash::new(p.expose_secret()))
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut employee = tx
            .execute(Select(By::<Option<Employee>, _>::new(employee_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EmployeeNotExists(employee_id))
            .map_err(tracerr::wrap!())?;

        if employee.email != email {
            let owner = tx
                .execute(Select(By::new(&email)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if owner.is_some_and(|o| o.id != employee.id) {
                return Err(tracerr::new!(E::EmailOccupied(email)));
            }
        }

        employee.name = name;
        employee.position = position;
        employee.phone = phone;
        employee.email = email;
        if let Some(hash) = password_hash {
            employee.password_hash = hash;
        }

        let updated = tx.execute(Update(employee.clone())).await;
        if updated.as_ref().is_err_and(|e| {
            e.as_ref().is_unique_violation(Some(constraint::EMPLOYEE_EMAIL))
        }) {
            return Err(tracerr::new!(E::EmailOccupied(employee.email)));
        }
        updated
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(employee)
    }
}

/// Error of [`UpdateEmployee`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Employee`] with the provided ID does not exist.
    #[display("`Employee(id: {_0})` does not exist")]
    EmployeeNotExists(#[error(not(source))] employee::Id),

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
        domain::{employee, person, Employee},
        fixture,
        query::employee::ById,
        Command as _, Query as _,
    };

    use super::{ExecutionError as E, UpdateEmployee};

    fn cmd(employee: &Employee, email: &str) -> UpdateEmployee {
        UpdateEmployee {
            employee_id: employee.id,
            name: employee.name.clone(),
            position: employee::Position::Administrator,
            phone: employee.phone.clone(),
            email: person::Email::new(email).unwrap(),
            password: None,
        }
    }

    #[tokio::test]
    async fn keeps_password_unless_provided() {
        let svc = fixture::service();
        let employee = fixture::employee(&svc, "a@shop.ru").await;

        svc.execute(cmd(&employee, "a@shop.ru")).await.unwrap();
        let stored = svc.execute(ById::by(employee.id)).await.unwrap().unwrap();
        assert_eq!(stored.position, employee::Position::Administrator);
        assert_eq!(stored.password_hash, employee.password_hash);

        svc.execute(UpdateEmployee {
            password: Some(SecretBox::new(Box::new("n3w-pass".into()))),
            ..cmd(&employee, "a@shop.ru")
        })
        .await
        .unwrap();
        let stored = svc.execute(ById::by(employee.id)).await.unwrap().unwrap();
        assert!(stored.password_hash.verify(&"n3w-pass".into()));
        assert!(!stored.password_hash.verify(&"s3cret!".into()));
    }

    #[tokio::test]
    async fn refuses_occupied_email() {
        let svc = fixture::service();
        let first = fixture::employee(&svc, "a@shop.ru").await;
        let second = fixture::employee(&svc, "b@shop.ru").await;

        let err = svc.execute(cmd(&second, "a@shop.ru")).await.unwrap_err();
        assert!(matches!(err.into_inner(), E::EmailOccupied(_)));

        svc.execute(cmd(&first, "c@shop.ru")).await.unwrap();
        svc.execute(cmd(&second, "a@shop.ru")).await.unwrap();
    }

    #[tokio::test]
    async fn fails_on_unknown_employee() {
        let svc = fixture::service();
        let employee = fixture::employee(&svc, "a@shop.ru").await;

        let err = svc
            .execute(UpdateEmployee {
                employee_id: employee::Id::new(),
                ..cmd(&employee, "a@shop.ru")
            })
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), E::EmployeeNotExists(_)));
    }
}
