//! [`Query`] collection related to the multiple [`Employee`]s.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::Employee,
    infra::{database, Database},
    read, Query, Service,
};

/// Queries a list of [`Employee`]s along with their
/// [`read::employee::list::Stats`].
#[derive(Clone, Debug, Default)]
pub struct List(pub read::employee::list::Filter);

/// Output of the [`List`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Listed [`Employee`]s, ordered by full name.
    pub items: Vec<Employee>,

    /// [`read::employee::list::Stats`] of the listed [`Employee`]s.
    pub stats: read::employee::list::Stats,
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Employee>, read::employee::list::Filter>>,
        Ok = Vec<Employee>,
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
        let stats = items.iter().map(|e| &e.position).collect();

        Ok(Output { items, stats })
    }
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        command::CreateEmployee,
        domain::{employee, person},
        fixture,
        infra::Memory,
        read, Command as _, Query as _, Service,
    };

    use super::List;

    async fn hire(
        svc: &Service<Memory>,
        last_name: &str,
        position: employee::Position,
        email: &str,
    ) -> employee::Id {
        svc.execute(CreateEmployee {
            name: fixture::full_name(last_name, "Anna"),
            position,
            phone: person::Phone::new("+7 912 000-00-09").unwrap(),
            email: person::Email::new(email).unwrap(),
            password: SecretBox::new(Box::new("qwerty1".into())),
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn filters_and_counts() {
        let svc = fixture::service();
        let boss = hire(
            &svc,
            "Orlova",
            employee::Position::Administrator,
            "boss@shop.ru",
        )
        .await;
        let first = hire(
            &svc,
            "Belova",
            employee::Position::Manager,
            "belova@shop.ru",
        )
        .await;
        let second = hire(
            &svc,
            "Zueva",
            employee::Position::Manager,
            "desk@shop.ru",
        )
        .await;

        let all = svc.execute(List::default()).await.unwrap();
        assert_eq!(
            all.items.iter().map(|e| e.id).collect::<Vec<_>>(),
            [first, boss, second],
        );
        assert_eq!(
            all.stats,
            read::employee::list::Stats {
                total: 3,
                administrators: 1,
                managers: 2,
            },
        );

        let managers = svc
            .execute(List(read::employee::list::Filter {
                position: Some(employee::Position::Manager),
                search: None,
            }))
            .await
            .unwrap();
        assert_eq!(managers.stats.total, 2);
        assert_eq!(managers.stats.administrators, 0);

        let by_name = svc
            .execute(List(read::employee::list::Filter {
                position: None,
                search: read::employee::list::Search::new("ZUEV"),
            }))
            .await
            .unwrap();
        assert_eq!(by_name.items.len(), 1);
        assert_eq!(by_name.items[0].id, second);

        let by_email = svc
            .execute(List(read::employee::list::Filter {
                position: Some(employee::Position::Administrator),
                search: read::employee::list::Search::new("boss@"),
            }))
            .await
            .unwrap();
        assert_eq!(by_email.items.len(), 1);
        assert_eq!(by_email.items[0].id, boss);

        let missing = svc
            .execute(List(read::employee::list::Filter {
                position: Some(employee::Position::Administrator),
                search: read::employee::list::Search::new("desk"),
            }))
            .await
            .unwrap();
        assert!(missing.items.is_empty());
        assert_eq!(missing.stats, read::employee::list::Stats::default());
    }
}
