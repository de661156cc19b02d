//! Domain definitions.

pub mod property;

pub use self::property::Property;
