//! GraphQL schema of the rental shop.
//!
//! Object types load their entity lazily, so a client asking only for `id`
//! never touches the database.

pub mod category;
pub mod client;
pub mod employee;
pub mod equipment;
mod mutation;
pub mod person;
mod query;
pub mod recipe;
pub mod rental;
pub mod report;
pub mod return_record;
pub mod scalar;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    category::Category, client::Client, employee::Employee,
    equipment::Equipment, mutation::Mutation, query::Query, rental::Rental,
    return_record::ReturnRecord,
};

/// GraphQL schema without subscriptions.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Converts the provided count into a GraphQL `Int`, saturating it.
pub(crate) fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
