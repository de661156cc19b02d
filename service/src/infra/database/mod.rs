//! [`Database`]-related implementations.

#[cfg(test)]
pub mod mock;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),

    #[cfg(test)]
    /// [`mock::Mock`] error.
    Mock(mock::Error),
}

impl Error {
    /// Indicates whether this [`Error`] is caused by inserting a property
    /// code that is taken already.
    #[must_use]
    pub fn is_code_collision(&self) -> bool {
        match *self {
            #[cfg(feature = "postgres")]
            Self::Postgres(ref e) => {
                e.is_unique_violation(Some(postgres::CODE_CONSTRAINT))
            }
            #[cfg(test)]
            Self::Mock(e) => e == mock::Error::CodeCollision,
        }
    }
}
