//! Fixtures of [`Service`] tests over a [`Memory`] database.

use common::{
    operations::{By, Insert, Select},
    Currency, DateTime, Money,
};

use crate::{
    domain::{
        category, client, employee, equipment, person, rental, Category,
        Client, Employee, Equipment,
    },
    infra::{Database as _, Memory},
    Config, Service,
};

/// Creates a new [`Service`] over an empty [`Memory`] database.
pub(crate) fn service() -> Service<Memory> {
    Service::new(Config::default(), Memory::new())
}

/// Parses [`Money`] in [`Currency::Rub`].
pub(crate) fn rub(amount: &str) -> Money {
    Money::new(amount.parse().unwrap(), Currency::Rub)
}

/// Stores a new [`Category`].
pub(crate) async fn category(svc: &Service<Memory>) -> Category {
    let category = Category {
        id: category::Id::new(),
        name: category::Name::new("Drills").unwrap(),
    };
    svc.database().execute(Insert(category.clone())).await.unwrap();
    category
}

/// Stores a new [`equipment::Status::Available`] [`Equipment`] with the
/// provided prices.
pub(crate) async fn equipment(
    svc: &Service<Memory>,
    daily: &str,
    hourly: Option<&str>,
    deposit: &str,
) -> Equipment {
    let category = category(svc).await;
    let equipment = Equipment {
        id: equipment::Id::new(),
        name: equipment::Name::new("Hammer drill").unwrap(),
        category_id: category.id,
        status: equipment::Status::Available,
        serial_number: None,
        description: None,
        notes: None,
        rates: equipment::Rates::new(rub(daily), hourly.map(rub), rub(deposit))
            .unwrap(),
        created_at: DateTime::now().coerce(),
        deleted_at: None,
    };
    svc.database().execute(Insert(equipment.clone())).await.unwrap();
    equipment
}

/// Stores a new [`Client`].
pub(crate) async fn client(svc: &Service<Memory>) -> Client {
    let client = Client {
        id: client::Id::new(),
        name: full_name("Petrov", "Ivan"),
        phone: person::Phone::new("+7 912 345-67-89").unwrap(),
        email: None,
        registered_at: DateTime::now().coerce(),
        deleted_at: None,
    };
    svc.database().execute(Insert(client.clone())).await.unwrap();
    client
}

/// Stores a new [`employee::Position::Manager`] [`Employee`] with the
/// provided login.
pub(crate) async fn employee(svc: &Service<Memory>, email: &str) -> Employee {
    let employee = Employee {
        id: employee::Id::new(),
        name: full_name("Sidorova", "Anna"),
        position: employee::Position::Manager,
        phone: person::Phone::new("+7 912 000-00-01").unwrap(),
        email: person::Email::new(email).unwrap(),
        password_hash: employee::PasswordHash::new(
            &employee::Password::new("s3cret!").unwrap(),
        )
        .unwrap(),
        created_at: DateTime::now().coerce(),
    };
    svc.database().execute(Insert(employee.clone())).await.unwrap();
    employee
}

/// Creates a new [`person::FullName`] without a middle name.
pub(crate) fn full_name(last: &str, first: &str) -> person::FullName {
    person::FullName {
        last: person::NamePart::new(last).unwrap(),
        first: person::NamePart::new(first).unwrap(),
        middle: None,
    }
}

/// Returns the planned return one day from now.
pub(crate) fn tomorrow() -> rental::PlannedReturnDateTime {
    (DateTime::now() + std::time::Duration::from_secs(24 * 60 * 60)).coerce()
}

/// Selects the stored [`equipment::Status`] of the [`Equipment`].
pub(crate) async fn status_of(
    svc: &Service<Memory>,
    id: equipment::Id,
) -> equipment::Status {
    svc.database()
        .execute(Select(By::<Option<Equipment>, _>::new(id)))
        .await
        .unwrap()
        .unwrap()
        .status
}
