//! Entities of the rental shop and the rules they obey on their own.

pub mod category;
pub mod client;
pub mod employee;
pub mod equipment;
pub mod person;
pub mod recipe;
pub mod rental;
pub mod return_record;

pub use self::{
    category::Category, client::Client, employee::Employee,
    equipment::Equipment, rental::Rental, return_record::ReturnRecord,
};
