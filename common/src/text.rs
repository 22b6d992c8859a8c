//! Macro for defining validated text newtypes.

/// Defines a `String` newtype which is guaranteed to be trimmed, non-empty
/// and not longer than the provided number of bytes.
///
/// The generated type provides `new()`, `from_trimmed()`, `new_unchecked()`,
/// [`FromStr`], [`Display`] and [`AsRef<str>`] implementations, and is stored
/// as a plain text column when the `postgres` feature of the calling crate is
/// enabled.
///
/// [`Display`]: std::fmt::Display
/// [`FromStr`]: std::str::FromStr
#[macro_export]
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        struct $name:ident(max_len = $max:literal);
    ) => {
        #[derive(Clone, Debug, Eq, Hash, PartialEq)]
        #[doc = $doc]
        pub struct $name(::std::string::String);

        impl $name {
            /// Creates a new value without checking its invariants.
            ///
            /// # Safety
            ///
            /// The caller must ensure that the given `value` is trimmed,
            /// non-empty and fits the maximum length.
            #[expect(unsafe_code, reason = "bypass")]
            #[must_use]
            pub unsafe fn new_unchecked(
                value: impl ::core::convert::Into<::std::string::String>,
            ) -> Self {
                Self(value.into())
            }

            /// Creates a new value if the given `value` is valid.
            #[must_use]
            pub fn new(
                value: impl ::core::convert::Into<::std::string::String>,
            ) -> ::core::option::Option<Self> {
                let value = value.into();
                Self::check(&value).then_some(Self(value))
            }

            /// Creates a new value out of the trimmed `value`, treating a blank
            /// one as absent.
            ///
            /// # Errors
            ///
            /// If the trimmed `value` is longer than the maximum length.
            pub fn from_trimmed(
                value: &str,
            ) -> ::core::result::Result<
                ::core::option::Option<Self>,
                &'static str,
            > {
                let value = value.trim();
                if value.is_empty() {
                    return ::core::result::Result::Ok(
                        ::core::option::Option::None,
                    );
                }
                Self::new(value)
                    .map(::core::option::Option::Some)
                    .ok_or(::core::concat!(
                        "`",
                        ::core::stringify!($name),
                        "` is too long",
                    ))
            }

            /// Checks whether the given `value` satisfies the invariants.
            fn check(value: &str) -> bool {
                value.trim() == value && !value.is_empty() && value.len() <= $max
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(
                &self,
                f: &mut ::core::fmt::Formatter<'_>,
            ) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::new(s).ok_or(::core::concat!(
                    "invalid `",
                    ::core::stringify!($name),
                    "`",
                ))
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            $crate::private::postgres_types::accepts!(TEXT, VARCHAR);

            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &'a [u8],
            ) -> ::core::result::Result<
                $name,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                <::std::string::String as $crate::private::postgres_types::FromSql>
                    ::from_sql(ty, raw)
                    .map(Self)
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::accepts!(TEXT, VARCHAR);
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> ::core::result::Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                <::std::string::String as $crate::private::postgres_types::ToSql>
                    ::to_sql(&self.0, ty, w)
            }
        }
    };
}
