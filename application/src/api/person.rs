//! Definitions shared by `Client`s and `Employee`s.

use derive_more::{AsRef, Display, From, Into};
use juniper::GraphQLScalar;
use service::domain;

use crate::api::scalar;

/// Part of a person's full name.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PersonNamePart",
    with = scalar::Via::<domain::person::NamePart>,
)]
pub struct NamePart(domain::person::NamePart);

/// Phone number of a person.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PersonPhone",
    with = scalar::Via::<domain::person::Phone>,
)]
pub struct Phone(domain::person::Phone);

/// Email address of a person.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PersonEmail",
    with = scalar::Via::<domain::person::Email>,
)]
pub struct Email(domain::person::Email);

/// Assembles a [`domain::person::FullName`] out of its parts.
pub(crate) fn full_name(
    last: NamePart,
    first: NamePart,
    middle: Option<NamePart>,
) -> domain::person::FullName {
    domain::person::FullName {
        last: last.into(),
        first: first.into(),
        middle: middle.map(Into::into),
    }
}
