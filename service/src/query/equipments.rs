//! [`Query`] collection related to the multiple [`Equipment`].

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Equipment,
    infra::{database, Database},
    read, Query, Service,
};

/// Queries a list of non-deleted [`Equipment`] along with its
/// [`read::equipment::list::Stats`].
#[derive(Clone, Debug, Default)]
pub struct List(pub read::equipment::list::Filter);

/// Output of the [`List`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Listed [`Equipment`], ordered by name.
    pub items: Vec<Equipment>,

    /// [`read::equipment::list::Stats`] of the listed [`Equipment`].
    pub stats: read::equipment::list::Stats,
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Equipment>, read::equipment::list::Filter>>,
        Ok = Vec<Equipment>,
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
        let stats = items.iter().map(|e| &e.status).collect();

        Ok(Output { items, stats })
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{DeleteEquipment, OpenRental},
        domain::{equipment, rental},
        fixture, read, Command as _, Query as _,
    };

    use super::List;

    #[tokio::test]
    async fn filters_and_counts() {
        let svc = fixture::service();
        let client = fixture::client(&svc).await;
        let employee = fixture::employee(&svc, "a@shop.ru").await;
        let rented = fixture::equipment(&svc, "100", None, "0").await;
        let free = fixture::equipment(&svc, "100", None, "0").await;
        let deleted = fixture::equipment(&svc, "100", None, "0").await;
        svc.execute(OpenRental {
            client_id: client.id,
            equipment_id: rented.id,
            employee_id: employee.id,
            unit: rental::Unit::Day,
            period: 1,
            planned_return_at: fixture::tomorrow(),
            payment_status: rental::PaymentStatus::Paid,
            notes: None,
        })
        .await
        .unwrap();
        svc.execute(DeleteEquipment {
            equipment_id: deleted.id,
        })
        .await
        .unwrap();

        let all = svc.execute(List::default()).await.unwrap();
        assert_eq!(all.items.len(), 2);
        assert_eq!(
            all.stats,
            read::equipment::list::Stats {
                total: 2,
                available: 1,
                rented: 1,
            },
        );

        let available = svc
            .execute(List(read::equipment::list::Filter {
                status: Some(equipment::Status::Available),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(available.items.len(), 1);
        assert_eq!(available.items[0].id, free.id);

        let by_name = svc
            .execute(List(read::equipment::list::Filter {
                name: equipment::Name::new("DRILL"),
                category_id: Some(free.category_id),
                status: None,
            }))
            .await
            .unwrap();
        assert_eq!(by_name.items.len(), 1);
        assert_eq!(by_name.items[0].id, free.id);

        let missing = svc
            .execute(List(read::equipment::list::Filter {
                name: equipment::Name::new("Ladder"),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(missing.stats.total, 0);
    }
}
