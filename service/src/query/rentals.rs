//! [`Query`] collection related to the multiple [`Rental`]s.

use common::{
    operations::{By, Select},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::Rental,
    infra::{database, Database},
    read, Query, Service,
};

/// Queries a list of [`Rental`]s along with the number of overdue ones.
#[derive(Clone, Copy, Debug, Default)]
pub struct List(pub read::rental::list::Filter);

/// Output of the [`List`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Listed [`Rental`]s, newest first.
    pub items: Vec<Rental>,

    /// Number of open listed [`Rental`]s whose planned return has passed.
    pub overdue: usize,
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Rental>, read::rental::list::Filter>>,
        Ok = Vec<Rental>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        List(filter): List,
    ) -> Result<Self::Ok, Self::Err> {
        let items = self
            .database()
            .execute(Select(By::new(filter)))
            .await
            .map_err(tracerr::wrap!())?;

        let overdue = if filter.open == Some(false) {
            0
        } else {
            let open = if filter.open == Some(true) {
                items.clone()
            } else {
                self.database()
                    .execute(Select(By::new(read::rental::list::Filter {
                        open: Some(true),
                        ..filter
                    })))
                    .await
                    .map_err(tracerr::wrap!())?
            };
            let now = DateTime::now();
            open.iter().filter(|r| r.is_overdue_at(&now)).count()
        };

        Ok(Output { items, overdue })
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{operations::Insert, DateTime};

    use crate::{
        command::{OpenRental, ProcessReturn},
        domain::{rental, return_record, Rental},
        fixture,
        infra::Database as _,
        read, Command as _, Query as _,
    };

    use super::List;

    #[tokio::test]
    async fn lists_open_and_closed() {
        let svc = fixture::service();
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;
        let mut opened = vec![];
        for _ in 0..3 {
            let eq = fixture::equipment(&svc, "100", None, "0").await;
            opened.push(
                svc.execute(OpenRental {
                    client_id: client.id,
                    equipment_id: eq.id,
                    employee_id: employee.id,
                    unit: rental::Unit::Day,
                    period: 1,
                    planned_return_at: fixture::tomorrow(),
                    payment_status: rental::PaymentStatus::Paid,
                    notes: None,
                })
                .await
                .unwrap(),
            );
        }
        svc.execute(ProcessReturn {
            rental_id: opened[0].id,
            condition: return_record::Condition::Good,
            damage_description: None,
            manager_comment: None,
        })
        .await
        .unwrap();

        let all = svc.execute(List::default()).await.unwrap();
        assert_eq!(all.items.len(), 3);
        assert_eq!(all.overdue, 0);
        assert!(all
            .items
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));

        let open = svc
            .execute(List(read::rental::list::Filter {
                open: Some(true),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(open.items.len(), 2);
        assert!(open.items.iter().all(|r| r.id != opened[0].id));

        let closed = svc
            .execute(List(read::rental::list::Filter {
                open: Some(false),
                equipment_id: Some(opened[0].equipment_id),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(closed.items.len(), 1);
        assert_eq!(closed.items[0].id, opened[0].id);
    }

    #[tokio::test]
    async fn counts_overdue() {
        let svc = fixture::service();
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;
        let eq = fixture::equipment(&svc, "100", None, "0").await;
        let fresh = svc
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
            .await
            .unwrap();
        let day = Duration::from_secs(24 * 60 * 60);
        let late = Rental {
            id: rental::Id::new(),
            created_at: (DateTime::now() - day - day).coerce(),
            planned_return_at: (DateTime::now() - day).coerce(),
            ..fresh
        };
        svc.database().execute(Insert(late.clone())).await.unwrap();

        let all = svc.execute(List::default()).await.unwrap();
        assert_eq!(all.items.len(), 2);
        assert_eq!(all.overdue, 1);
        assert!(late.is_overdue_at(&DateTime::now()));

        let closed = svc
            .execute(List(read::rental::list::Filter {
                open: Some(false),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(closed.overdue, 0);
    }
}
