//! [`Command`] for creating a new [`Category`].

use common::operations::Insert;
use tracerr::Traced;

use crate::{
    domain::{category, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Category`].
#[derive(Clone, Debug)]
pub struct CreateCategory {
    /// [`category::Name`] of a new [`Category`].
    pub name: category::Name,
}

impl<Db> Command<CreateCategory> for Service<Db>
where
    Db: Database<Insert<Category>, Err = Traced<database::Error>>,
{
    type Ok = Category;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        CreateCategory { name }: CreateCategory,
    ) -> Result<Self::Ok, Self::Err> {
        let category = Category {
            id: category::Id::new(),
            name,
        };
        self.database()
            .execute(Insert(category.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(category)
    }
}

/// Error of [`CreateCategory`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{
        domain::category, fixture, query::categories, Command as _,
        Query as _,
    };

    use super::CreateCategory;

    #[tokio::test]
    async fn lists_created_categories_by_name() {
        let svc = fixture::service();

        for name in ["Saws", "Drills", "Ladders"] {
            svc.execute(CreateCategory {
                name: category::Name::new(name).unwrap(),
            })
            .await
            .unwrap();
        }

        let names = svc
            .execute(categories::List::by(()))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Drills", "Ladders", "Saws"]);
    }
}
