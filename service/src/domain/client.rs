//! [`Client`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::person::{Email, FullName, Phone};

/// Client renting equipment.
#[derive(Clone, Debug)]
pub struct Client {
    /// ID of this [`Client`].
    pub id: Id,

    /// [`FullName`] of this [`Client`].
    pub name: FullName,

    /// [`Phone`] of this [`Client`].
    pub phone: Phone,

    /// [`Email`] of this [`Client`], if known.
    pub email: Option<Email>,

    /// [`DateTime`] when this [`Client`] was registered.
    pub registered_at: RegistrationDateTime,

    /// [`DateTime`] when this [`Client`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

impl Client {
    /// Indicates whether this [`Client`] is deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// ID of a [`Client`].
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
    Ord,
    PartialEq,
    PartialOrd,
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

/// [`DateTime`] when a [`Client`] was registered.
pub type RegistrationDateTime = DateTimeOf<(Client, unit::Creation)>;

/// [`DateTime`] when a [`Client`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Client, unit::Deletion)>;
