//! [`Client`]-related read definitions.

#[cfg(doc)]
use crate::domain::Client;

pub mod list {
    //! [`Client`] list definitions.

    use common::define_text;

    #[cfg(doc)]
    use crate::domain::Client;

    define_text! {
        #[doc = "Text searched in a [`Client`] full name and phone."]
        struct Search(max_len = 256);
    }

    /// Filter of non-deleted [`Client`]s.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`Search`] text, matched ignoring case.
        pub search: Option<Search>,
    }
}
