//! [`Query`] collection related to a single [`Property`].

use common::operations::{By, Commit, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{property, Property},
    infra::{database, Database},
    Service,
};

use super::Query;

/// Queries a non-deleted [`Property`] by its [`property::Code`].
#[derive(Clone, Debug)]
pub struct ByCode {
    /// [`property::Code`] of the [`Property`].
    pub code: property::Code,

    /// [`property::Name`] the found [`Property`] is expected to have, if
    /// any.
    pub name: Option<property::Name>,
}

impl<Db> Query<ByCode> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Code>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: ByCode) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ByCode { code, name } = query;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let property = tx
            .execute(Select(By::<Option<Property>, _>::new(code.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(code))
            .map_err(tracerr::wrap!())?;
        if let Some(expected) = name {
            if property.name != expected {
                return Err(tracerr::new!(E::NameMismatch {
                    expected,
                    actual: property.name,
                }));
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(property)
    }
}

/// Error of [`ByCode`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] doesn't exist.
    #[display("`Property(code: {_0})` does not exist")]
    #[from(ignore)]
    NotExists(#[error(not(source))] property::Code),

    /// [`Property`] exists, but under another [`property::Name`].
    #[display("`Property` is named `{actual}`, not `{expected}`")]
    #[from(ignore)]
    NameMismatch {
        /// [`property::Name`] provided by the caller.
        expected: property::Name,

        /// [`property::Name`] of the [`Property`].
        actual: property::Name,
    },
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{property, Property},
        infra::database::mock::Mock,
        Config, Query as _, Service,
    };

    use super::{ByCode, ExecutionError};

    fn listed() -> Property {
        Property::new(&property::Draft {
            property_type: "house".into(),
            neighborhood: "Downtown".into(),
            city: "Metropolis".into(),
            description: "Cozy house".into(),
            rent_amount: 0,
            rent_currency: "EUR".into(),
            bedrooms: 4,
            bathrooms: 2,
            area: 180.0,
            latitude: 48.85,
            longitude: 2.35,
            is_for_rent: false,
            is_for_sale: true,
            sale_price: 45_000_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn finds_by_code() {
        let property = listed();
        let service = Service::new(Config::default(), Mock::default());
        service.database().seed(property.clone());

        let found = service
            .execute(ByCode {
                code: property.code.clone(),
                name: None,
            })
            .await
            .unwrap();
        assert_eq!(found, property);

        let found = service
            .execute(ByCode {
                code: property.code.clone(),
                name: Some(property.name.clone()),
            })
            .await
            .unwrap();
        assert_eq!(found, property);
    }

    #[tokio::test]
    async fn reports_absent() {
        let service = Service::new(Config::default(), Mock::default());
        let code = property::Code::new("0123456789").unwrap();

        let err = service
            .execute(ByCode { code, name: None })
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::NotExists(_)));
    }

    #[tokio::test]
    async fn ignores_deleted() {
        let mut property = listed();
        property.deleted_at = Some(common::DateTime::now().coerce());
        let service = Service::new(Config::default(), Mock::default());
        service.database().seed(property.clone());

        let err = service
            .execute(ByCode {
                code: property.code,
                name: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::NotExists(_)));
    }

    #[tokio::test]
    async fn reports_name_mismatch() {
        let property = listed();
        let service = Service::new(Config::default(), Mock::default());
        service.database().seed(property.clone());

        let err = service
            .execute(ByCode {
                code: property.code,
                name: property::Name::new("apartment-Gotham-Narrows-1-1"),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::NameMismatch { .. },
        ));
    }
}
