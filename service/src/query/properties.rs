//! [`Query`] collection related to multiple [`Property`]s.

use common::operations::{By, Commit, Select, Transact, Transacted};
use tracerr::Traced;

use crate::{
    domain::Property,
    infra::{database, Database},
    read, Service,
};

use super::Query;

/// Searches non-deleted [`Property`]s satisfying a
/// [`read::property::Filter`].
///
/// [`Property`]s are ordered by their creation, oldest first.
#[derive(Clone, Debug, Default)]
pub struct Search {
    /// [`read::property::Filter`] to apply.
    pub filter: read::property::Filter,
}

impl<Db> Query<Search> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<Property>, read::property::Filter>>,
            Ok = Vec<Property>,
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Vec<Property>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Search) -> Result<Self::Ok, Self::Err> {
        let Search { filter } = query;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        let found = tx
            .execute(Select(By::<Vec<Property>, _>::new(filter)))
            .await
            .map_err(tracerr::wrap!())?;

        tx.execute(Commit).await.map_err(tracerr::wrap!())?;

        Ok(found)
    }
}

/// Error of [`Search`] [`Query`] execution.
pub type ExecutionError = database::Error;
