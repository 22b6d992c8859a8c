//! [`Equipment`]-related read definitions.

#[cfg(doc)]
use crate::domain::Equipment;

pub mod list {
    //! [`Equipment`] list definitions.

    use crate::domain::{category, equipment};
    #[cfg(doc)]
    use crate::domain::{Category, Equipment};

    /// Filter of non-deleted [`Equipment`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`equipment::Name`] (or its part) to search for, ignoring case.
        pub name: Option<equipment::Name>,

        /// ID of the [`Category`] to list [`Equipment`] of.
        pub category_id: Option<category::Id>,

        /// [`equipment::Status`] to list [`Equipment`] in.
        pub status: Option<equipment::Status>,
    }

    /// Counts of listed [`Equipment`] by their [`equipment::Status`].
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Stats {
        /// Total number of listed [`Equipment`].
        pub total: usize,

        /// Number of [`equipment::Status::Available`] [`Equipment`].
        pub available: usize,

        /// Number of [`equipment::Status::Rented`] [`Equipment`].
        pub rented: usize,
    }

    impl<'a> FromIterator<&'a equipment::Status> for Stats {
        fn from_iter<I: IntoIterator<Item = &'a equipment::Status>>(
            iter: I,
        ) -> Self {
            iter.into_iter().fold(Self::default(), |mut stats, status| {
                stats.total += 1;
                match status {
                    equipment::Status::Available => stats.available += 1,
                    equipment::Status::Rented => stats.rented += 1,
                }
                stats
            })
        }
    }
}
