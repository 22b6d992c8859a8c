//! [`Rental`]-related read definitions.

use derive_more::Deref;

#[cfg(doc)]
use crate::domain::{Client, Equipment, Rental, ReturnRecord};

/// Indicator whether an open [`Rental`] exists.
///
/// A [`Rental`] is open if it has already started and there is no
/// [`ReturnRecord`] for it.
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct HasOpen(pub bool);

impl PartialEq<bool> for HasOpen {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

pub mod list {
    //! [`Rental`]s list definitions.

    use crate::domain::{client, equipment};
    #[cfg(doc)]
    use crate::domain::{Client, Equipment, Rental};

    /// Filter of [`Rental`]s.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Filter {
        /// Whether to list only open (`true`) or only closed (`false`)
        /// [`Rental`]s.
        pub open: Option<bool>,

        /// ID of the [`Client`] to list [`Rental`]s of.
        pub client_id: Option<client::Id>,

        /// ID of the [`Equipment`] to list [`Rental`]s of.
        pub equipment_id: Option<equipment::Id>,
    }
}
