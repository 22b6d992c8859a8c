//! [`Command`] for registering a new [`Client`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

use crate::{
    domain::{client, person, Client},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`Client`].
#[derive(Clone, Debug)]
pub struct CreateClient {
    /// [`person::FullName`] of a new [`Client`].
    pub name: person::FullName,

    /// [`person::Phone`] of a new [`Client`].
    pub phone: person::Phone,

    /// [`person::Email`] of a new [`Client`].
    pub email: Option<person::Email>,
}

impl<Db> Command<CreateClient> for Service<Db>
where
    Db: Database<Insert<Client>, Err = Traced<database::Error>>,
{
    type Ok = Client;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CreateClient { name, phone, email }: CreateClient,
    ) -> Result<Self::Ok, Self::Err> {
        let client = Client {
            id: client::Id::new(),
            name,
            phone,
            email,
            registered_at: DateTime::now().coerce(),
            deleted_at: None,
        };
        self.database()
            .execute(Insert(client.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tracing::debug!(client.id = %client.id, "client registered");

        Ok(client)
    }
}

/// Error of [`CreateClient`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{
        domain::person, fixture, query::clients, read, Command as _,
        Query as _,
    };

    use super::CreateClient;

    #[tokio::test]
    async fn searches_registered_clients() {
        let svc = fixture::service();
        for (last, phone) in [
            ("Ivanov", "+7 900 111-22-33"),
            ("Smirnova", "+7 900 444-55-66"),
        ] {
            svc.execute(CreateClient {
                name: fixture::full_name(last, "Olga"),
                phone: person::Phone::new(phone).unwrap(),
                email: None,
            })
            .await
            .unwrap();
        }

        let found = svc
            .execute(clients::List::by(read::client::list::Filter {
                search: read::client::list::Search::new("smirn"),
            }))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.last.to_string(), "Smirnova");

        let found = svc
            .execute(clients::List::by(read::client::list::Filter {
                search: read::client::list::Search::new("111"),
            }))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.last.to_string(), "Ivanov");

        let all = svc
            .execute(clients::List::by(read::client::list::Filter::default()))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
