//! [`LikePattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// `LIKE` pattern matching any text containing the provided substring.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] matching the given `substring` literally.
    #[must_use]
    pub fn containing(substring: &str) -> Self {
        let mut pattern = String::with_capacity(substring.len() + 2);
        pattern.push('%');
        for c in substring.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Self(pattern)
    }
}

#[cfg(test)]
mod spec {
    use super::LikePattern;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(LikePattern::containing("drill").to_string(), "%drill%");
        assert_eq!(
            LikePattern::containing(r"50%_off\").to_string(),
            r"%50\%\_off\\%",
        );
    }
}
