//! Helpers for defining string-based GraphQL scalars.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Strategy for `#[graphql(with = ..)]` exposing a newtype as a string scalar.
///
/// The newtype is converted from and into its `As` representation via
/// [`TryFrom`] and [`AsRef`], so its validation (e.g. a non-empty equipment
/// name) runs on input, while `As` itself is parsed via [`FromStr`] and
/// printed via [`Display`].
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Converts the target type into a string scalar [`Value`].
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the target type out of a string scalar [`InputValue`].
    ///
    /// # Errors
    ///
    /// If the `input` is not a string, or it is not a valid `As`, or `As`
    /// isn't convertible into the target type.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).unwrap_or("<unnamed>");

        let s = input.as_string_value().ok_or_else(|| {
            format!("`{name}` expects a string, found: {input}")
        })?;
        let value = s.parse::<As>().map_err(|e| {
            format!("`{name}` cannot be parsed from \"{s}\": {e}")
        })?;
        T::try_from(value).map_err(|e| format!("invalid `{name}`: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a [`String`].
    ///
    /// # Errors
    ///
    /// If the token is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}
