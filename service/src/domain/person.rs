//! Personal details shared by [`Client`]s and [`Employee`]s.

use std::{fmt, str::FromStr, sync::LazyLock};

use common::define_text;
use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;

#[cfg(doc)]
use crate::domain::{Client, Employee};

define_text! {
    #[doc = "Single part (last, first or middle name) of a [`FullName`]."]
    struct NamePart(max_len = 128);
}

/// Full name of a person.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FullName {
    /// Last name (surname).
    pub last: NamePart,

    /// First name.
    pub first: NamePart,

    /// Middle name (patronymic), if any.
    pub middle: Option<NamePart>,
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            last,
            first,
            middle,
        } = self;
        write!(f, "{last} {first}")?;
        if let Some(middle) = middle {
            write!(f, " {middle}")?;
        }
        Ok(())
    }
}

/// Phone number of a person.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Minimal number of digits in a [`Phone`].
    const MIN_DIGITS: usize = 10;

    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] characters: an optional
        /// leading `+` followed by digits, spaces, dashes and parentheses.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[\d\s\-()]{1,31}$").expect("valid regex")
        });

        let number = number.as_ref();
        REGEX.is_match(number)
            && number.chars().filter(char::is_ascii_digit).count()
                >= Self::MIN_DIGITS
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Email address of a person.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    ///
    /// The `address` is lowercased, so the same mailbox is never stored
    /// twice in different cases.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into().to_lowercase();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

#[cfg(test)]
mod spec {
    use super::{Email, FullName, NamePart, Phone};

    #[test]
    fn validates_phone() {
        assert!(Phone::new("+7 (912) 345-67-89").is_some());
        assert!(Phone::new("89123456789").is_some());
        assert!(Phone::new("912-345").is_none());
        assert!(Phone::new("+7 912 abc 67 89").is_none());
        assert!(Phone::new("").is_none());
    }

    #[test]
    fn validates_email() {
        let email = Email::new("Manager@Rental.Shop").unwrap();
        assert_eq!(AsRef::<str>::as_ref(&email), "manager@rental.shop");
        assert!(Email::new("manager@rental").is_none());
        assert!(Email::new("manager rental@shop.ru").is_none());
        assert!(Email::new("@shop.ru").is_none());
    }

    #[test]
    fn displays_full_name() {
        let name = FullName {
            last: NamePart::new("Petrov").unwrap(),
            first: NamePart::new("Ivan").unwrap(),
            middle: None,
        };
        assert_eq!(name.to_string(), "Petrov Ivan");

        let name = FullName {
            middle: Some(NamePart::new("Sergeevich").unwrap()),
            ..name
        };
        assert_eq!(name.to_string(), "Petrov Ivan Sergeevich");
    }

    #[test]
    fn rejects_untrimmed_name_part() {
        assert!(NamePart::new(" Ivan").is_none());
        assert!(NamePart::new("").is_none());
    }
}
