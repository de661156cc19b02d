//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, domain::property, Command as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `Property` with a freshly issued `PropertyCode`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_LISTED` - neither `isForRent` nor `isForSale` is set;
    /// - `PROPERTY_INVALID` - any other attribute breaks the `Property`
    ///                        rules, the message names the first one.
    #[tracing::instrument(
        skip_all,
        fields(
            city = %input.city,
            gql.name = "registerProperty",
            neighborhood = %input.neighborhood,
            otel.name = Self::SPAN_NAME,
            property_type = %input.property_type,
        ),
    )]
    pub async fn register_property(
        input: api::property::RegisterPropertyInput,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        ctx.service()
            .execute(command::RegisterProperty {
                draft: input.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::register_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(e) => e.try_as_error(),
            Self::Code(_) => None,
        }
    }
}

impl AsError for property::ValidationError {
    fn try_as_error(&self) -> Option<Error> {
        let code = match self {
            Self::NotListed => "PROPERTY_NOT_LISTED",
            Self::NotForRent
            | Self::EmptyNeighborhood
            | Self::EmptyCity
            | Self::EmptyDescription
            | Self::InvalidRentAmount
            | Self::InvalidCurrency
            | Self::NegativeBedrooms
            | Self::NegativeBathrooms
            | Self::InvalidArea
            | Self::InvalidLatitude
            | Self::InvalidLongitude
            | Self::NegativeSalePrice
            | Self::SalePriceNotForSale
            | Self::UnknownPropertyType => "PROPERTY_INVALID",
        };
        Some(Error {
            code,
            status_code: http::StatusCode::BAD_REQUEST,
            message: self.to_string(),
            backtrace: None,
        })
    }
}
