//! [`Price`]-related definitions.
//!
//! Prices are kept in minor units of their [`Currency`] (cents for `USD`),
//! so no floating point ever touches an amount.
// TODO: Convert between currencies once an exchange rates provider is
//       chosen (https://docs.awesomeapi.com.br/api-de-moedas was proposed).

use std::{fmt, str::FromStr};

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Amount of some [`Currency`] in its minor units.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Price {
    /// Amount of this [`Price`] in minor units (cents).
    pub amount: i64,

    /// [`Currency`] of this [`Price`].
    pub currency: Currency,
}

impl Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        let sign = if *amount < 0 { "-" } else { "" };
        let abs = amount.unsigned_abs();
        write!(f, "{sign}{}.{:02}{currency}", abs / 100, abs % 100)
    }
}

impl FromStr for Price {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let currency = Currency::new(currency).ok_or("invalid currency")?;

        let (negative, amount) = match amount.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, amount),
        };
        let (major, minor) = amount.split_once('.').unwrap_or((amount, ""));
        if major.is_empty()
            || minor.len() > 2
            || !major.bytes().chain(minor.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err("invalid amount");
        }
        let major = major.parse::<i64>().map_err(|_| "invalid amount")?;
        let minor = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| "invalid amount")? * 10,
            _ => minor.parse::<i64>().map_err(|_| "invalid amount")?,
        };
        let amount = major
            .checked_mul(100)
            .and_then(|a| a.checked_add(minor))
            .ok_or("amount overflow")?;

        Ok(Self {
            amount: if negative { -amount } else { amount },
            currency,
        })
    }
}

/// Three-letter currency code of a [`Price`] (`USD`, `EUR`, `BRL`, ...).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Currency(String);

impl Currency {
    /// Creates a new [`Currency`] if the given `code` consists of exactly
    /// three ASCII letters.
    ///
    /// The code is normalized to upper case.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Option<Self> {
        let code = code.as_ref();
        Self::check(code).then(|| Self(code.to_ascii_uppercase()))
    }

    /// Checks whether the given `code` is a valid [`Currency`].
    fn check(code: &str) -> bool {
        code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic())
    }
}

impl FromStr for Currency {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Currency`")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Price in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer, optionally negative;
    /// - `minor` is an optional one or two digit integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Price = super::Price;

    impl Price {
        fn to_output<S: ScalarValue>(p: &Price) -> Value<S> {
            Value::scalar(p.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Price` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Price` input scalar: {e}")
                    })
                })
        }
    }
}
