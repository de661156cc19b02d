//! [`Command`] definition.

pub mod register_property;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::register_property::RegisterProperty;
