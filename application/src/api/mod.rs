//! GraphQL API definitions.

mod mutation;
pub mod property;
mod query;
pub mod scalar;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{mutation::Mutation, property::Property, query::Query};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
