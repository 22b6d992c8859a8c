//! [`Employee`]-related read definitions.

#[cfg(doc)]
use crate::domain::Employee;

pub mod list {
    //! [`Employee`] list definitions.

    use common::define_text;

    use crate::domain::employee;
    #[cfg(doc)]
    use crate::domain::Employee;

    define_text! {
        #[doc = "Text searched in an [`Employee`] full name, phone and email."]
        struct Search(max_len = 256);
    }

    /// Filter of [`Employee`]s.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`employee::Position`] to list [`Employee`]s in.
        pub position: Option<employee::Position>,

        /// [`Search`] text, matched ignoring case.
        pub search: Option<Search>,
    }

    /// Counts of listed [`Employee`]s by their [`employee::Position`].
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Stats {
        /// Total number of listed [`Employee`]s.
        pub total: usize,

        /// Number of [`employee::Position::Administrator`]s.
        pub administrators: usize,

        /// Number of [`employee::Position::Manager`]s.
        pub managers: usize,
    }

    impl<'a> FromIterator<&'a employee::Position> for Stats {
        fn from_iter<I: IntoIterator<Item = &'a employee::Position>>(
            iter: I,
        ) -> Self {
            iter.into_iter().fold(Self::default(), |mut stats, position| {
                stats.total += 1;
                match position {
                    employee::Position::Administrator => {
                        stats.administrators += 1;
                    }
                    employee::Position::Manager => stats.managers += 1,
                }
                stats
            })
        }
    }
}
