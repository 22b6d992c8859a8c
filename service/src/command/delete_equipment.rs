//! [`Command`] for deleting an [`Equipment`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Rental;
use crate::{
    domain::{equipment, Equipment},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting an [`Equipment`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteEquipment {
    /// ID of the [`Equipment`] to delete.
    pub equipment_id: equipment::Id,
}

impl<Db> Command<DeleteEquipment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Equipment>, equipment::Id>>,
            Ok = Option<Equipment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::rental::HasOpen, equipment::Id>>,
            Ok = read::rental::HasOpen,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Equipment, equipment::Id>>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        DeleteEquipment { equipment_id }: DeleteEquipment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let equipment = tx
            .execute(Select(By::<Option<Equipment>, _>::new(equipment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::EquipmentNotExists(equipment_id))
            .map_err(tracerr::wrap!())?;

        let has_open = tx
            .execute(Select(By::<read::rental::HasOpen, _>::new(equipment.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *has_open {
            return Err(tracerr::new!(E::HasOpenRental(equipment.id)));
        }

        // Deletion applies to an `Available` `Equipment` only, so it fails if
        // the `Equipment` has been rented concurrently.
        let deleted = tx
            .execute(Delete(By::new(equipment.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::HasOpenRental(equipment.id)));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(equipment.id = %equipment.id, "equipment deleted");

        Ok(())
    }
}

/// Error of [`DeleteEquipment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Equipment`] with the provided ID does not exist.
    #[display("`Equipment(id: {_0})` does not exist")]
    EquipmentNotExists(#[error(not(source))] equipment::Id),

    /// [`Equipment`] is given out by an open [`Rental`].
    #[display("`Equipment(id: {_0})` has an open rental")]
    HasOpenRental(#[error(not(source))] equipment::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{OpenRental, ProcessReturn},
        domain::{rental, return_record},
        fixture,
        query::equipment::{ById, CanDelete},
        Command as _, Query as _,
    };

    use super::{DeleteEquipment, ExecutionError as E};

    #[tokio::test]
    async fn guards_open_rental() {
        let svc = fixture::service();
        let eq = fixture::equipment(&svc, "100", None, "500").await;
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;
        let rental = svc
            .execute(OpenRental {
                client_id: client.id,
                equipment_id: eq.id,
                employee_id: employee.id,
                unit: rental::Unit::Day,
                period: 2,
                planned_return_at: fixture::tomorrow(),
                payment_status: rental::PaymentStatus::Paid,
                notes: None,
            })
            .await
            .unwrap();

        assert!(!svc.execute(CanDelete(eq.id)).await.unwrap());
        let err = svc
            .execute(DeleteEquipment {
                equipment_id: eq.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), E::HasOpenRental(id) if id == eq.id));

        svc.execute(ProcessReturn {
            rental_id: rental.id,
            condition: return_record::Condition::Excellent,
            damage_description: None,
            manager_comment: None,
        })
        .await
        .unwrap();

        assert!(svc.execute(CanDelete(eq.id)).await.unwrap());
        svc.execute(DeleteEquipment {
            equipment_id: eq.id,
        })
        .await
        .unwrap();
        assert!(svc.execute(ById::by(eq.id)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fails_on_missing_equipment() {
        let svc = fixture::service();
        let eq = fixture::equipment(&svc, "100", None, "500").await;

        svc.execute(DeleteEquipment {
            equipment_id: eq.id,
        })
        .await
        .unwrap();
        let err = svc
            .execute(DeleteEquipment {
                equipment_id: eq.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), E::EquipmentNotExists(_)));
    }
}
