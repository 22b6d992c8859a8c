//! [`Command`] for updating a [`Client`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{client, person, Client},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Client`].
#[derive(Clone, Debug)]
pub struct UpdateClient {
    /// ID of the [`Client`] to update.
    pub client_id: client::Id,

    /// New [`person::FullName`] of the [`Client`].
    pub name: person::FullName,

    /// New [`person::Phone`] of the [`Client`].
    pub phone: person::Phone,

    /// New [`person::Email`] of the [`Client`].
    pub email: Option<person::Email>,
}

impl<Db> Command<UpdateClient> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Client, client::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<Update<Client>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Client;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateClient,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateClient {
            client_id,
            name,
            phone,
            email,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid updating a `Client` being deleted concurrently.
        tx.execute(Lock(By::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut client = tx
            .execute(Select(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;

        client.name = name;
        client.phone = phone;
        client.email = email;
        tx.execute(Update(client.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(client)
    }
}

/// Error of [`UpdateClient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Client`] with the provided ID does not exist.
    #[display("`Client(id: {_0})` does not exist")]
    ClientNotExists(#[error(not(source))] client::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::DeleteClient,
        domain::{client, person},
        fixture,
        query::client::ById,
        Command as _, Query as _,
    };

    use super::{ExecutionError as E, UpdateClient};

    fn cmd(client_id: client::Id) -> UpdateClient {
        UpdateClient {
            client_id,
            name: fixture::full_name("Petrova", "Maria"),
            phone: person::Phone::new("8 (912) 765-43-21").unwrap(),
            email: person::Email::new("maria@mail.ru"),
        }
    }

    #[tokio::test]
    async fn replaces_fields() {
        let svc = fixture::service();
        let client = fixture::client(&svc).await;

        svc.execute(cmd(client.id)).await.unwrap();

        let stored = svc.execute(ById::by(client.id)).await.unwrap().unwrap();
        assert_eq!(stored.name.to_string(), "Petrova Maria");
        assert_eq!(stored.email, person::Email::new("maria@mail.ru"));
        assert_eq!(stored.registered_at, client.registered_at);
    }

    #[tokio::test]
    async fn fails_on_deleted_client() {
        let svc = fixture::service();
        let client = fixture::client(&svc).await;
        svc.execute(DeleteClient {
            client_id: client.id,
        })
        .await
        .unwrap();

        let err = svc.execute(cmd(client.id)).await.unwrap_err();

        assert!(matches!(
            err.into_inner(),
            E::ClientNotExists(id) if id == client.id,
        ));
    }
}
