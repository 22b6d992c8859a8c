//! Read models: entities joined with data of related ones, as shown in
//! listings (e.g. an `Equipment` with its current availability).

pub mod client;
pub mod employee;
pub mod equipment;
pub mod rental;
