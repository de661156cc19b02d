//! [`LikePattern`] definition.

use derive_more::{AsRef, Display};
use postgres_types::ToSql;

/// Pattern for the `LIKE`/`ILIKE` operators matching the provided text as
/// a literal substring.
///
/// Wildcards and the escape character of the text are escaped, so
/// `50%` matches only `50%` itself rather than anything starting with `50`.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, ToSql)]
#[as_ref(forward)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] matching any text containing the
    /// provided `substring`.
    #[must_use]
    pub fn contains(substring: impl AsRef<str>) -> Self {
        let substring = substring.as_ref();

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
    fn wraps_in_wildcards() {
        assert_eq!(LikePattern::contains("down").to_string(), "%down%");
        assert_eq!(LikePattern::contains("").to_string(), "%%");
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(
            LikePattern::contains(r"50%_off\").to_string(),
            r"%50\%\_off\\%",
        );
    }
}
