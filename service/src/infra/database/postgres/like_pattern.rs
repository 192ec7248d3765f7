//! [`LikePattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// `ILIKE` pattern matching a substring anywhere in a column.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] out of the given `input`.
    ///
    /// The `input` is matched literally: `LIKE` metacharacters are escaped.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(format!(
            "%{}%",
            input
                .replace('\\', r"\\")
                .replace('%', r"\%")
                .replace('_', r"\_"),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::LikePattern;

    #[test]
    fn escapes_metacharacters() {
        assert_eq!(LikePattern::new("nairobi").to_string(), "%nairobi%");
        assert_eq!(LikePattern::new("50%_off").to_string(), r"%50\%\_off%");
    }
}
