//! In-memory [`Database`] for testing.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use common::operations::{By, Commit, Insert, Select, Transact};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{property, Property},
    infra::{database, Database},
    read,
};

/// In-memory [`Database`] storing [`Property`]s.
///
/// [`Transact`] returns a clone buffering its inserts until [`Commit`].
/// Dropping such a clone uncommitted discards the buffer.
#[derive(Clone, Debug, Default)]
pub struct Mock {
    /// Committed [`Property`]s in insertion order.
    committed: Arc<Mutex<Vec<Property>>>,

    /// [`Property`]s inserted in the current transaction, if any.
    pending: Option<Arc<Mutex<Vec<Property>>>>,

    /// Number of upcoming inserts to reject as [`Error::CodeCollision`]
    /// regardless of their [`property::Code`].
    forced_collisions: Arc<AtomicUsize>,

    /// Number of finished [`Insert`] attempts.
    inserts: Arc<AtomicUsize>,
}

impl Mock {
    /// Makes the next `n` inserts fail with [`Error::CodeCollision`].
    pub fn force_collisions(&self, n: usize) {
        self.forced_collisions.store(n, Ordering::SeqCst);
    }

    /// Returns the number of [`Insert`] attempts made so far.
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Returns all the committed [`Property`]s.
    pub fn committed(&self) -> Vec<Property> {
        self.committed.lock().unwrap().clone()
    }

    /// Stores the provided [`Property`] as committed.
    pub fn seed(&self, property: Property) {
        self.committed.lock().unwrap().push(property);
    }

    /// Returns the committed [`Property`]s followed by the pending ones.
    fn visible(&self) -> Vec<Property> {
        let mut all = self.committed();
        if let Some(pending) = &self.pending {
            all.extend(pending.lock().unwrap().iter().cloned());
        }
        all
    }
}

/// [`Mock`] error.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Inserted [`property::Code`] is taken already.
    #[display("`property::Code` is taken already")]
    CodeCollision,
}

impl Database<Transact> for Mock {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let mut tx = self.clone();
        if tx.pending.is_none() {
            tx.pending = Some(Arc::default());
        }
        Ok(tx)
    }
}

impl Database<Commit> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        if let Some(pending) = &self.pending {
            self.committed
                .lock()
                .unwrap()
                .append(&mut pending.lock().unwrap());
        }
        Ok(())
    }
}

impl Database<Insert<Property>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.inserts.fetch_add(1, Ordering::SeqCst);

        let forced = self
            .forced_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                n.checked_sub(1)
            })
            .is_ok();
        if forced || self.visible().iter().any(|p| p.code == property.code) {
            return Err(tracerr::new!(database::Error::from(
                Error::CodeCollision
            )));
        }

        match &self.pending {
            Some(pending) => pending.lock().unwrap().push(property),
            None => self.seed(property),
        }
        Ok(())
    }
}

impl Database<Select<By<Option<Property>, property::Code>>> for Mock {
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();
        Ok(self
            .visible()
            .into_iter()
            .find(|p| p.code == code && p.deleted_at.is_none()))
    }
}

impl Database<Select<By<Vec<Property>, read::property::Filter>>> for Mock {
    type Ok = Vec<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Property>, read::property::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let mut found = self
            .visible()
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect::<Vec<_>>();
        found.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });
        Ok(found)
    }
}
