//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{domain, query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Property` with the specified `PropertyCode`.
    ///
    /// If the `name` is provided and not blank, the found `Property` must
    /// have exactly this name.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPERTY_NOT_EXISTS` - no `Property` has the specified
    ///                           `PropertyCode`;
    /// - `PROPERTY_NAME_MISMATCH` - the `Property` has another name.
    #[tracing::instrument(
        skip_all,
        fields(
            code = %code,
            gql.name = "property",
            name = ?name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn property(
        code: api::property::Code,
        name: Option<String>,
        ctx: &Context,
    ) -> Result<api::Property, Error> {
        ctx.service()
            .execute(query::property::ByCode {
                code: code.into(),
                name: name.and_then(domain::property::Name::new),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Searches non-deleted `Property`s, oldest first.
    ///
    /// Omitting the `filter` returns every non-deleted `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            filter = ?filter,
            gql.name = "properties",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn properties(
        filter: Option<api::property::PropertyFilter>,
        ctx: &Context,
    ) -> Result<Vec<api::Property>, Error> {
        ctx.service()
            .execute(query::properties::Search {
                filter: filter.map(Into::into).unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|props| props.into_iter().map(Into::into).collect())
    }
}

impl AsError for query::property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotExists(_) => Some(PropertyError::NotExists.into()),
            Self::NameMismatch { .. } => {
                Some(PropertyError::NameMismatch.into())
            }
        }
    }
}

define_error! {
    enum PropertyError {
        #[code = "PROPERTY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Property` with the specified code does not exist"]
        NotExists,

        #[code = "PROPERTY_NAME_MISMATCH"]
        #[status = CONFLICT]
        #[message = "`Property` with the specified code has another name"]
        NameMismatch,
    }
}
