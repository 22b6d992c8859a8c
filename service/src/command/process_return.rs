//! [`Command`] for processing a return of a rented [`Equipment`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Equipment;
use crate::{
    domain::{equipment, rental, return_record, Rental, ReturnRecord},
    infra::{
        database::{self, constraint},
        Database,
    },
    Service,
};

use super::Command;

/// [`Command`] for processing a return of a rented [`Equipment`].
#[derive(Clone, Debug)]
pub struct ProcessReturn {
    /// ID of the [`Rental`] to close.
    pub rental_id: rental::Id,

    /// [`return_record::Condition`] the [`Equipment`] is returned in.
    pub condition: return_record::Condition,

    /// [`return_record::DamageDescription`] of a damaged [`Equipment`].
    pub damage_description: Option<return_record::DamageDescription>,

    /// [`return_record::ManagerComment`] on the return.
    pub manager_comment: Option<return_record::ManagerComment>,
}

impl<Db> Command<ProcessReturn> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<ReturnRecord>, rental::Id>>,
            Ok = Option<ReturnRecord>,
            Err = Traced<database::Error>,
        > + Database<
            Update<equipment::StatusChange>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<Insert<ReturnRecord>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ReturnRecord;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ProcessReturn,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ProcessReturn {
            rental_id,
            condition,
            damage_description,
            manager_comment,
        } = cmd;

        if condition == return_record::Condition::Damaged
            && damage_description.is_none()
        {
            return Err(tracerr::new!(E::DamageDescriptionRequired));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let rental = tx
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;

        let existing = tx
            .execute(Select(By::<Option<ReturnRecord>, _>::new(rental.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::AlreadyReturned(rental.id)));
        }

        // `Equipment` is not `Rented` anymore only if a concurrent return of
        // the same `Rental` has already released it.
        let released = tx
            .execute(Update(equipment::StatusChange::release(
                rental.equipment_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !released {
            return Err(tracerr::new!(E::AlreadyReturned(rental.id)));
        }

        let settlement =
            return_record::Settlement::new(rental.deposit, condition);
        let record = ReturnRecord {
            id: return_record::Id::new(),
            rental_id: rental.id,
            returned_at: DateTime::now().coerce(),
            condition,
            damage_description,
            manager_comment,
            deposit_withheld: settlement.withheld,
            deposit_returned: settlement.returned,
        };
        let inserted = tx.execute(Insert(record.clone())).await;
        if inserted.as_ref().is_err_and(|e| {
            e.as_ref()
                .is_unique_violation(Some(constraint::RETURN_RENTAL_ID))
        }) {
            return Err(tracerr::new!(E::AlreadyReturned(rental.id)));
        }
        inserted
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            rental.id = %record.rental_id,
            equipment.id = %rental.equipment_id,
            condition = %record.condition,
            deposit_withheld = %record.deposit_withheld,
            "return processed",
        );

        Ok(record)
    }
}

/// Error of [`ProcessReturn`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// [`Rental`] is returned already.
    #[display("`Rental(id: {_0})` is returned already")]
    AlreadyReturned(#[error(not(source))] rental::Id),

    /// [`return_record::Condition::Damaged`] return has no
    /// [`return_record::DamageDescription`].
    #[display("Damaged equipment requires a damage description")]
    DamageDescriptionRequired,
}

#[cfg(test)]
mod spec {
    use crate::{
        command::OpenRental,
        domain::{equipment, rental, return_record, Rental},
        fixture,
        infra::Memory,
        Command as _, Service,
    };

    use super::{ExecutionError as E, ProcessReturn};

    async fn open(svc: &Service<Memory>, deposit: &str) -> Rental {
        let eq = fixture::equipment(svc, "100", None, deposit).await;
        let client = fixture::client(svc).await;
        let employee =
            fixture::employee(svc, &format!("{}@shop.ru", rental::Id::new()))
                .await;
        svc.execute(OpenRental {
            client_id: client.id,
            equipment_id: eq.id,
            employee_id: employee.id,
            unit: rental::Unit::Day,
            period: 1,
            planned_return_at: fixture::tomorrow(),
            payment_status: rental::PaymentStatus::NotPaid,
            notes: None,
        })
        .await
        .unwrap()
    }

    fn cmd(
        rental: &Rental,
        condition: return_record::Condition,
    ) -> ProcessReturn {
        ProcessReturn {
            rental_id: rental.id,
            condition,
            damage_description: None,
            manager_comment: None,
        }
    }

    #[tokio::test]
    async fn requires_damage_description() {
        let svc = fixture::service();
        let rental = open(&svc, "1000").await;

        let err = svc
            .execute(cmd(&rental, return_record::Condition::Damaged))
            .await
            .unwrap_err();
        assert!(matches!(err.into_inner(), E::DamageDescriptionRequired));
        assert_eq!(
            fixture::status_of(&svc, rental.equipment_id).await,
            equipment::Status::Rented,
        );

        let record = svc
            .execute(ProcessReturn {
                damage_description: return_record::DamageDescription::new(
                    "Cracked case",
                ),
                ..cmd(&rental, return_record::Condition::Damaged)
            })
            .await
            .unwrap();
        assert_eq!(record.deposit_withheld, fixture::rub("500.00"));
        assert_eq!(record.deposit_returned, fixture::rub("500.00"));
        assert_eq!(
            fixture::status_of(&svc, rental.equipment_id).await,
            equipment::Status::Available,
        );
    }

    #[tokio::test]
    async fn treats_blank_damage_description_as_missing() {
        let svc = fixture::service();
        let rental = open(&svc, "1000").await;

        for blank in ["", "   ", "\n\t"] {
            let err = svc
                .execute(ProcessReturn {
                    damage_description:
                        return_record::DamageDescription::from_trimmed(blank)
                            .unwrap(),
                    ..cmd(&rental, return_record::Condition::Damaged)
                })
                .await
                .unwrap_err();
            assert!(matches!(err.into_inner(), E::DamageDescriptionRequired));
        }

        let record = svc
            .execute(ProcessReturn {
                damage_description:
                    return_record::DamageDescription::from_trimmed(
                        "  cracked case ",
                    )
                    .unwrap(),
                ..cmd(&rental, return_record::Condition::Damaged)
            })
            .await
            .unwrap();
        assert_eq!(
            record.damage_description.map(|d| d.to_string()),
            Some("cracked case".to_owned()),
        );
    }

    #[tokio::test]
    async fn settles_deposit_by_condition() {
        let svc = fixture::service();

        for (condition, withheld, returned) in [
            (return_record::Condition::Lost, "1000.00", "0.00"),
            (return_record::Condition::Good, "0.00", "1000.00"),
            (return_record::Condition::Excellent, "0.00", "1000.00"),
        ] {
            let rental = open(&svc, "1000").await;
            let record = svc.execute(cmd(&rental, condition)).await.unwrap();

            assert_eq!(record.deposit_withheld, fixture::rub(withheld));
            assert_eq!(record.deposit_returned, fixture::rub(returned));
        }
    }

    #[tokio::test]
    async fn returns_only_once() {
        let svc = fixture::service();
        let rental = open(&svc, "1000").await;

        svc.execute(cmd(&rental, return_record::Condition::Good))
            .await
            .unwrap();
        let err = svc
            .execute(cmd(&rental, return_record::Condition::Good))
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            E::AlreadyReturned(id) if id == rental.id,
        ));
    }

    #[tokio::test]
    async fn returns_only_once_concurrently() {
        let svc = fixture::service();
        let rental = open(&svc, "1000").await;

        let (first, second) = tokio::join!(
            svc.execute(cmd(&rental, return_record::Condition::Good)),
            svc.execute(cmd(&rental, return_record::Condition::Lost)),
        );

        let failed = match (first, second) {
            (Ok(_), Err(e)) | (Err(e), Ok(_)) => e,
            (a, b) => panic!("exactly one must succeed: {a:?}, {b:?}"),
        };
        assert!(matches!(failed.into_inner(), E::AlreadyReturned(_)));
    }

    #[tokio::test]
    async fn fails_on_unknown_rental() {
        let svc = fixture::service();

        let err = svc
            .execute(ProcessReturn {
                rental_id: rental::Id::new(),
                condition: return_record::Condition::Good,
                damage_description: None,
                manager_comment: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), E::RentalNotExists(_)));
    }
}
