//! [`Employee`] definitions.

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHasher as _, PasswordVerifier as _,
        SaltString,
    },
    Argon2,
};
#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::person::{Email, FullName, Phone};

/// Employee of the rental shop.
#[derive(Clone, Debug)]
pub struct Employee {
    /// ID of this [`Employee`].
    pub id: Id,

    /// [`FullName`] of this [`Employee`].
    pub name: FullName,

    /// [`Position`] of this [`Employee`].
    pub position: Position,

    /// [`Phone`] of this [`Employee`].
    pub phone: Phone,

    /// [`Email`] of this [`Employee`], used as the login.
    pub email: Email,

    /// [`PasswordHash`] of this [`Employee`].
    pub password_hash: PasswordHash,

    /// [`DateTime`] when this [`Employee`] was created.
    pub created_at: CreationDateTime,
}

/// ID of an [`Employee`].
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

define_kind! {
    #[doc = "Position of an [`Employee`]."]
    enum Position {
        #[doc = "Administrator managing the catalogue and the staff."]
        Administrator = 1,

        #[doc = "Manager serving clients."]
        Manager = 2,
    }
}

/// Password of an [`Employee`].
///
/// Displayed masked.
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[display("******")]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `password` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        (6..=128).contains(&password.as_ref().chars().count())
    }
}

impl std::str::FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// [Argon2] hash of a [`Password`] in the [PHC string format].
///
/// [Argon2]: https://en.wikipedia.org/wiki/Argon2
/// [PHC string format]: https://github.com/P-H-C/phc-string-format
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes the provided [`Password`] with a random salt.
    ///
    /// # Errors
    ///
    /// If [`Argon2`] fails to hash the [`Password`].
    pub fn new(password: &Password) -> Result<Self, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.0.as_bytes(), &salt)
            .map(|h| Self(h.to_string()))
    }

    /// Creates a new [`PasswordHash`] out of an already computed PHC string.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `hash` is a valid PHC string.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Checks whether this [`PasswordHash`] was computed from the provided
    /// [`Password`].
    #[must_use]
    pub fn verify(&self, password: &Password) -> bool {
        password_hash::PasswordHash::new(&self.0).is_ok_and(|hash| {
            Argon2::default()
                .verify_password(password.0.as_bytes(), &hash)
                .is_ok()
        })
    }
}

/// [`DateTime`] when an [`Employee`] was created.
pub type CreationDateTime = DateTimeOf<(Employee, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Password, PasswordHash, Position};

    #[test]
    fn verifies_password_hash() {
        let password = Password::new("s3cret!").unwrap();
        let hash = PasswordHash::new(&password).unwrap();

        assert!(hash.verify(&password));
        assert!(!hash.verify(&Password::new("s3cret?").unwrap()));
        assert_ne!(hash.to_string(), "s3cret!");
    }

    #[test]
    fn salts_every_hash() {
        let password = Password::new("s3cret!").unwrap();

        assert_ne!(
            PasswordHash::new(&password).unwrap(),
            PasswordHash::new(&password).unwrap(),
        );
    }

    #[test]
    fn rejects_malformed_hash() {
        #[expect(unsafe_code, reason = "testing malformed input")]
        let hash = unsafe { PasswordHash::new_unchecked("plain") };

        assert!(!hash.verify(&Password::new("plain!").unwrap()));
    }

    #[test]
    fn checks_password_length() {
        assert!(Password::new("12345").is_none());
        assert!(Password::new("123456").is_some());
        assert!(Password::new("x".repeat(129)).is_none());
    }

    #[test]
    fn parses_position() {
        assert_eq!("MANAGER".parse::<Position>(), Ok(Position::Manager));
        assert!("Менеджер".parse::<Position>().is_err());
    }
}
