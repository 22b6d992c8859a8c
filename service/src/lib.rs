//! Business logic of an equipment rental shop: its catalog, clients and staff,
//! rentals with their returns, and the reports built over them.
//!
//! Writes go through [`Command`]s, reads through [`Query`]s, and both are
//! executed by the [`Service`] over any [`Database`] implementing the
//! operations they need.
//!
//! Storage backends are picked via Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
#[cfg(test)]
mod fixture;
pub mod infra;
pub mod query;
pub mod read;

use std::time::Duration;

use common::Currency;
use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query};

/// Business defaults of the [`Service`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// [`Currency`] of period reports requested without one.
    #[default(Currency::Rub)]
    pub default_currency: Currency,

    /// How long a rental lasts if opened without a planned return moment.
    #[default(Duration::from_secs(24 * 60 * 60))]
    pub default_rental_duration: Duration,
}

/// Equipment rental shop, executing [`Command`]s and [`Query`]s.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Business defaults.
    config: Config,

    /// Storage of every entity.
    database: Db,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] on top of the provided `database`.
    #[must_use]
    pub const fn new(config: Config, database: Db) -> Self {
        Self { config, database }
    }

    /// Returns the business defaults.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the underlying [`Database`].
    #[must_use]
    pub const fn database(&self) -> &Db {
        &self.database
    }
}
