//! [`Category`] definitions.

use common::define_text;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Equipment;

/// Category grouping [`Equipment`] in the catalogue.
#[derive(Clone, Debug)]
pub struct Category {
    /// ID of this [`Category`].
    pub id: Id,

    /// [`Name`] of this [`Category`].
    pub name: Name,
}

/// ID of a [`Category`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_text! {
    #[doc = "Name of a [`Category`]."]
    struct Name(max_len = 256);
}
