//! [`Database`] implementations.

use std::{cmp::Reverse, ops::RangeInclusive};

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{
        category, client, employee, equipment, person, rental, return_record,
        Category, Client, Employee, Equipment, Rental, ReturnRecord,
    },
    infra::{
        database::{self, constraint},
        Database,
    },
    read,
};

use super::{Connection, Error, Memory, State};

impl State {
    /// Indicates whether the provided [`Rental`] is open at the provided
    /// moment.
    fn is_open(&self, rental: &Rental, now: &DateTime) -> bool {
        !now.is_before(&rental.created_at)
            && !self.returns.values().any(|r| r.rental_id == rental.id)
    }
}

impl<C: Connection> Database<Select<By<Option<Category>, category::Id>>>
    for Memory<C>
{
    type Ok = Option<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Category>, category::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.categories.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Vec<Category>, ()>>> for Memory<C> {
    type Ok = Vec<Category>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Category>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| {
            let mut all = s.categories.values().cloned().collect::<Vec<_>>();
            all.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));
            all
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Insert<Category>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(category): Insert<Category>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.categories.insert(category.id, category)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Option<Equipment>, equipment::Id>>>
    for Memory<C>
{
    type Ok = Option<Equipment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Equipment>, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.equipment.get(&id).filter(|e| !e.is_deleted()).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection>
    Database<Select<By<Vec<Equipment>, read::equipment::list::Filter>>>
    for Memory<C>
{
    type Ok = Vec<Equipment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Equipment>, read::equipment::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::equipment::list::Filter {
            name,
            category_id,
            status,
        } = by.into_inner();
        let name = name.map(|n| n.as_ref().to_lowercase());

        self.read(|s| {
            let mut found = s
                .equipment
                .values()
                .filter(|e| {
                    !e.is_deleted()
                        && category_id.map_or(true, |id| e.category_id == id)
                        && status.map_or(true, |st| e.status == st)
                        && name.as_ref().map_or(true, |n| {
                            e.name.as_ref().to_lowercase().contains(n)
                        })
                })
                .cloned()
                .collect::<Vec<_>>();
            found.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));
            found
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Insert<Equipment>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(equipment): Insert<Equipment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.equipment.insert(equipment.id, equipment)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Update<Equipment>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(mut equipment): Update<Equipment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            // `Status` is changed only via `equipment::StatusChange`.
            if let Some(stored) = s.equipment.get(&equipment.id) {
                equipment.status = stored.status;
            }
            drop(s.equipment.insert(equipment.id, equipment));
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Update<equipment::StatusChange>> for Memory<C> {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(change): Update<equipment::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let equipment::StatusChange { id, from, to } = change;
        self.write(|s| {
            s.equipment
                .get_mut(&id)
                .filter(|e| !e.is_deleted() && e.status == from)
                .map(|e| e.status = to)
                .is_some()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Delete<By<Equipment, equipment::Id>>>
    for Memory<C>
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Equipment, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|s| {
            s.equipment
                .get_mut(&id)
                .filter(|e| {
                    !e.is_deleted() && e.status == equipment::Status::Available
                })
                .map(|e| e.deleted_at = Some(DateTime::now().coerce()))
                .is_some()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Option<Client>, client::Id>>>
    for Memory<C>
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.clients.get(&id).filter(|c| !c.is_deleted()).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection>
    Database<Select<By<Vec<Client>, read::client::list::Filter>>> for Memory<C>
{
    type Ok = Vec<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Client>, read::client::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::client::list::Filter { search } = by.into_inner();
        let search = search.map(|q| q.as_ref().to_lowercase());

        self.read(|s| {
            let mut found = s
                .clients
                .values()
                .filter(|c| {
                    !c.is_deleted()
                        && search.as_ref().map_or(true, |q| {
                            c.name.to_string().to_lowercase().contains(q)
                                || c.phone.to_string().contains(q.as_str())
                        })
                })
                .cloned()
                .collect::<Vec<_>>();
            found.sort_by_key(|c| c.name.to_string());
            found
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection>
    Database<
        Select<By<Vec<Client>, RangeInclusive<client::RegistrationDateTime>>>,
    > for Memory<C>
{
    type Ok = Vec<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Client>, RangeInclusive<client::RegistrationDateTime>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let range = by.into_inner();
        self.read(|s| {
            s.clients
                .values()
                .filter(|c| range.contains(&c.registered_at))
                .cloned()
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Insert<Client>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(client): Insert<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.clients.insert(client.id, client)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Update<Client>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(client): Update<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.clients.insert(client.id, client)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Delete<By<Client, client::Id>>> for Memory<C> {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Client, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|s| {
            s.clients
                .get_mut(&id)
                .filter(|c| !c.is_deleted())
                .map(|c| c.deleted_at = Some(DateTime::now().coerce()))
                .is_some()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Lock<By<Client, client::Id>>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Client, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Transactions are serialized already.
        Ok(())
    }
}

impl<C: Connection> Database<Select<By<Option<Employee>, employee::Id>>>
    for Memory<C>
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, employee::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.employees.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<'e, C: Connection>
    Database<Select<By<Option<Employee>, &'e person::Email>>> for Memory<C>
{
    type Ok = Option<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Employee>, &'e person::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        self.read(|s| {
            s.employees.values().find(|e| &e.email == email).cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection>
    Database<Select<By<Vec<Employee>, read::employee::list::Filter>>>
    for Memory<C>
{
    type Ok = Vec<Employee>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Employee>, read::employee::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::employee::list::Filter { position, search } =
            by.into_inner();
        let search = search.map(|q| q.to_string().to_lowercase());

        self.read(|s| {
            let mut found = s
                .employees
                .values()
                .filter(|e| {
                    position.map_or(true, |p| e.position == p)
                        && search.as_ref().map_or(true, |q| {
                            e.name.to_string().to_lowercase().contains(q)
                                || e.phone.to_string().contains(q.as_str())
                                || e.email
                                    .to_string()
                                    .to_lowercase()
                                    .contains(q.as_str())
                        })
                })
                .cloned()
                .collect::<Vec<_>>();
            found.sort_by_key(|e| e.name.to_string());
            found
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Insert<Employee>> for Memory<C>
where
    Self: Database<Update<Employee>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(employee): Insert<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(employee)).await.map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Update<Employee>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(employee): Update<Employee>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            if s
                .employees
                .values()
                .any(|e| e.id != employee.id && e.email == employee.email)
            {
                return Err(Error::UniqueViolation(constraint::EMPLOYEE_EMAIL));
            }
            drop(s.employees.insert(employee.id, employee));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())?
        .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl<C: Connection> Database<Select<By<Option<Rental>, rental::Id>>>
    for Memory<C>
{
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.rentals.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection>
    Database<Select<By<Vec<Rental>, read::rental::list::Filter>>> for Memory<C>
{
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, read::rental::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::list::Filter {
            open,
            client_id,
            equipment_id,
        } = by.into_inner();
        let now = DateTime::now();

        self.read(|s| {
            let mut found = s
                .rentals
                .values()
                .filter(|r| {
                    client_id.map_or(true, |id| r.client_id == id)
                        && equipment_id.map_or(true, |id| r.equipment_id == id)
                        && open.map_or(true, |o| s.is_open(r, &now) == o)
                })
                .cloned()
                .collect::<Vec<_>>();
            found.sort_by_key(|r| Reverse(r.created_at));
            found
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection>
    Database<Select<By<Vec<Rental>, RangeInclusive<rental::CreationDateTime>>>>
    for Memory<C>
{
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Rental>, RangeInclusive<rental::CreationDateTime>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let range = by.into_inner();
        self.read(|s| {
            s.rentals
                .values()
                .filter(|r| range.contains(&r.created_at))
                .cloned()
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection>
    Database<Select<By<read::rental::HasOpen, equipment::Id>>> for Memory<C>
{
    type Ok = read::rental::HasOpen;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::rental::HasOpen, equipment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let now = DateTime::now();
        self.read(|s| {
            read::rental::HasOpen(
                s.rentals
                    .values()
                    .any(|r| r.equipment_id == id && s.is_open(r, &now)),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<read::rental::HasOpen, client::Id>>>
    for Memory<C>
{
    type Ok = read::rental::HasOpen;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::rental::HasOpen, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let now = DateTime::now();
        self.read(|s| {
            read::rental::HasOpen(
                s.rentals
                    .values()
                    .any(|r| r.client_id == id && s.is_open(r, &now)),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Insert<Rental>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| drop(s.rentals.insert(rental.id, rental)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Option<ReturnRecord>, rental::Id>>>
    for Memory<C>
{
    type Ok = Option<ReturnRecord>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ReturnRecord>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.returns.values().find(|r| r.rental_id == id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Vec<ReturnRecord>, ()>>> for Memory<C> {
    type Ok = Vec<ReturnRecord>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<ReturnRecord>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| {
            let mut all = s.returns.values().cloned().collect::<Vec<_>>();
            all.sort_by_key(|r| Reverse(r.returned_at));
            all
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection>
    Database<
        Select<
            By<Vec<ReturnRecord>, RangeInclusive<return_record::ReturnDateTime>>,
        >,
    > for Memory<C>
{
    type Ok = Vec<ReturnRecord>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<ReturnRecord>, RangeInclusive<return_record::ReturnDateTime>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let range = by.into_inner();
        self.read(|s| {
            s.returns
                .values()
                .filter(|r| range.contains(&r.returned_at))
                .cloned()
                .collect()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Insert<ReturnRecord>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<ReturnRecord>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            if s.returns.values().any(|r| r.rental_id == record.rental_id) {
                return Err(Error::UniqueViolation(
                    constraint::RETURN_RENTAL_ID,
                ));
            }
            drop(s.returns.insert(record.id, record));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())?
        .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}
