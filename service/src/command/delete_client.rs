//! [`Command`] for deleting a [`Client`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Rental;
use crate::{
    domain::{client, Client},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting a [`Client`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteClient {
    /// ID of the [`Client`] to delete.
    pub client_id: client::Id,
}

impl<Db> Command<DeleteClient> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Client, client::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::rental::HasOpen, client::Id>>,
            Ok = read::rental::HasOpen,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Client, client::Id>>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteClient { client_id }: DeleteClient,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid a `Rental` being opened for the `Client` concurrently.
        tx.execute(Lock(By::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let client = tx
            .execute(Select(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;

        let has_open = tx
            .execute(Select(By::<read::rental::HasOpen, _>::new(client.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *has_open {
            return Err(tracerr::new!(E::HasOpenRental(client.id)));
        }

        let deleted = tx
            .execute(Delete(By::new(client.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::ClientNotExists(client.id)));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(client.id = %client.id, "client deleted");

        Ok(())
    }
}

/// Error of [`DeleteClient`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Client`] with the provided ID does not exist.
    #[display("`Client(id: {_0})` does not exist")]
    ClientNotExists(#[error(not(source))] client::Id),

    /// [`Client`] has an open [`Rental`].
    #[display("`Client(id: {_0})` has an open rental")]
    HasOpenRental(#[error(not(source))] client::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{OpenRental, ProcessReturn},
        domain::{rental, return_record},
        fixture,
        query::client::{ById, CanDelete},
        Command as _, Query as _,
    };

    use super::{DeleteClient, ExecutionError as E};

    #[tokio::test]
    async fn guards_open_rental() {
        let svc = fixture::service();
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;
        let mut rentals = vec![];
        for _ in 0..2 {
            let eq = fixture::equipment(&svc, "100", None, "0").await;
            rentals.push(
                svc.execute(OpenRental {
                    client_id: client.id,
                    equipment_id: eq.id,
                    employee_id: employee.id,
                    unit: rental::Unit::Day,
                    period: 1,
                    planned_return_at: fixture::tomorrow(),
                    payment_status: rental::PaymentStatus::PartiallyPaid,
                    notes: None,
                })
                .await
                .unwrap(),
            );
        }

        for (i, rental) in rentals.iter().enumerate() {
            assert!(!svc.execute(CanDelete(client.id)).await.unwrap());
            let err = svc
                .execute(DeleteClient {
                    client_id: client.id,
                })
                .await
                .unwrap_err();
            assert!(
                matches!(err.into_inner(), E::HasOpenRental(id) if id == client.id),
                "rental #{i}",
            );

            svc.execute(ProcessReturn {
                rental_id: rental.id,
                condition: return_record::Condition::Good,
                damage_description: None,
                manager_comment: None,
            })
            .await
            .unwrap();
        }

        assert!(svc.execute(CanDelete(client.id)).await.unwrap());
        svc.execute(DeleteClient {
            client_id: client.id,
        })
        .await
        .unwrap();
        assert!(svc.execute(ById::by(client.id)).await.unwrap().is_none());

        let err = svc
            .execute(DeleteClient {
                client_id: client.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), E::ClientNotExists(_)));
    }

    #[tokio::test]
    async fn refuses_rental_of_deleted_client() {
        let svc = fixture::service();
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;
        let eq = fixture::equipment(&svc, "100", None, "0").await;

        svc.execute(DeleteClient {
            client_id: client.id,
        })
        .await
        .unwrap();
        let res = svc
            .execute(OpenRental {
                client_id: client.id,
                equipment_id: eq.id,
                employee_id: employee.id,
                unit: rental::Unit::Day,
                period: 1,
                planned_return_at: fixture::tomorrow(),
                payment_status: rental::PaymentStatus::Paid,
                notes: None,
            })
            .await;

        assert!(res.is_err());
    }
}
