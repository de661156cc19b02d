//! [`Command`] for registering a new [`Property`].

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::Config;
use crate::{
    domain::{property, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering a new [`Property`].
#[derive(Clone, Debug, From)]
pub struct RegisterProperty {
    /// [`property::Draft`] of the new [`Property`].
    pub draft: property::Draft,
}

impl<Db> Command<RegisterProperty> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Property>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterProperty { draft } = cmd;

        let mut property = Property::new(&draft)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let attempts = self.config().code_issuance_attempts.get();
        let mut attempt = 1;
        loop {
            let Err(e) = insert(self.database(), property.clone()).await
            else {
                log::debug!(
                    code = %property.code,
                    id = %property.id,
                    "`Property` registered",
                );
                return Ok(property);
            };

            let collided =
                AsRef::<database::Error>::as_ref(&e).is_code_collision();
            if !collided || attempt >= attempts {
                return Err(e).map_err(tracerr::map_from_and_wrap!(=> E));
            }

            log::warn!(
                code = %property.code,
                attempt,
                "`property::Code` is taken already, issuing another one",
            );
            property.code = property::Code::generate()
                .map_err(tracerr::from_and_wrap!(=> E))?;
            attempt += 1;
        }
    }
}

/// Inserts the provided [`Property`] into the [`Database`] in its own
/// transaction.
async fn insert<Db>(
    db: &Db,
    property: Property,
) -> Result<(), Traced<database::Error>>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Insert<Property>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    let tx = db.execute(Transact).await.map_err(tracerr::wrap!())?;
    tx.execute(Insert(property))
        .await
        .map_err(tracerr::wrap!())?;
    tx.execute(Commit).await.map_err(tracerr::wrap!())
}

/// Error of [`RegisterProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    ///
    /// Includes a [`property::Code`] collision outliving the
    /// [`Config::code_issuance_attempts`].
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`property::Draft`] breaks a [`Property`] rule.
    #[display("Invalid `Property`: {_0}")]
    Invalid(property::ValidationError),

    /// [`property::Code`] could not be generated.
    #[display("Cannot issue `property::Code`: {_0}")]
    Code(property::code::GenerationError),
}

impl From<property::CreationError> for ExecutionError {
    fn from(e: property::CreationError) -> Self {
        match e {
            property::CreationError::Invalid(e) => Self::Invalid(e),
            property::CreationError::Code(e) => Self::Code(e),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroU8;

    use crate::{
        domain::property::{Draft, ValidationError},
        infra::database::mock::Mock,
        Command as _, Config, Service,
    };

    use super::{ExecutionError, RegisterProperty};

    fn draft() -> Draft {
        Draft {
            property_type: "apartment".into(),
            neighborhood: "Central".into(),
            city: "Metropolis".into(),
            description: "Sunny two-bedroom flat".into(),
            rent_amount: 1200,
            rent_currency: "USD".into(),
            bedrooms: 2,
            bathrooms: 1,
            area: 55.5,
            latitude: 10.0,
            longitude: 20.0,
            is_for_rent: true,
            is_for_sale: false,
            sale_price: 0,
        }
    }

    fn service(attempts: u8) -> Service<Mock> {
        Service::new(
            Config {
                code_issuance_attempts: NonZeroU8::new(attempts).unwrap(),
            },
            Mock::default(),
        )
    }

    #[tokio::test]
    async fn registers() {
        let service = service(1);

        let property = service
            .execute(RegisterProperty { draft: draft() })
            .await
            .unwrap();

        assert_eq!(service.database().committed(), [property]);
    }

    #[tokio::test]
    async fn stores_nothing_when_invalid() {
        let service = service(1);

        let err = service
            .execute(RegisterProperty {
                draft: Draft {
                    city: String::new(),
                    ..draft()
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::Invalid(ValidationError::EmptyCity),
        ));
        assert_eq!(service.database().inserts(), 0);
        assert!(service.database().committed().is_empty());
    }

    #[tokio::test]
    async fn fails_on_first_collision_by_default() {
        let service = service(1);
        service.database().force_collisions(1);

        let err = service
            .execute(RegisterProperty { draft: draft() })
            .await
            .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::Db(e) if e.is_code_collision(),
        ));
        assert_eq!(service.database().inserts(), 1);
        assert!(service.database().committed().is_empty());
    }

    #[tokio::test]
    async fn reissues_code_on_collision() {
        let service = service(3);
        service.database().force_collisions(2);

        let property = service
            .execute(RegisterProperty { draft: draft() })
            .await
            .unwrap();

        assert_eq!(service.database().inserts(), 3);
        assert_eq!(service.database().committed(), [property]);
    }

    #[tokio::test]
    async fn gives_up_after_all_attempts() {
        let service = service(2);
        service.database().force_collisions(5);

        let err = service
            .execute(RegisterProperty { draft: draft() })
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::Db(_)));
        assert_eq!(service.database().inserts(), 2);
    }
}
