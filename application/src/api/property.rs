//! [`Property`]-related definitions.

use common::{DateTime, DateTimeOf, Price};
use derive_more::{AsRef, Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar,
};
use service::{domain, read};
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// A real-estate property.
#[derive(Clone, Debug, From, Into)]
pub struct Property(domain::Property);

/// A real-estate property listed for rent, for sale or both.
#[graphql_object(context = Context)]
impl Property {
    /// Unique identifier of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Human-shareable code of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.code",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn code(&self) -> Code {
        self.0.code.clone().into()
    }

    /// Name of this `Property` derived from its type, location and layout.
    ///
    /// Not unique across `Property`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> String {
        self.0.name.to_string()
    }

    /// Type of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.propertyType",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn property_type(&self) -> PropertyType {
        self.0.property_type.into()
    }

    /// Neighborhood this `Property` is located in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.neighborhood",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn neighborhood(&self) -> &str {
        self.0.neighborhood.as_ref()
    }

    /// City this `Property` is located in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.city",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn city(&self) -> &str {
        self.0.city.as_ref()
    }

    /// Description of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn description(&self) -> &str {
        self.0.description.as_ref()
    }

    /// Number of bedrooms in this `Property`.
    pub fn bedrooms(&self) -> i32 {
        self.0.bedrooms
    }

    /// Number of bathrooms in this `Property`.
    pub fn bathrooms(&self) -> i32 {
        self.0.bathrooms
    }

    /// Area of this `Property` in square meters.
    pub fn area(&self) -> f64 {
        self.0.area
    }

    /// Latitude of this `Property` in degrees.
    pub fn latitude(&self) -> f64 {
        self.0.latitude
    }

    /// Longitude of this `Property` in degrees.
    pub fn longitude(&self) -> f64 {
        self.0.longitude
    }

    /// Indicator whether this `Property` is listed for rent.
    pub fn is_for_rent(&self) -> bool {
        self.0.is_for_rent
    }

    /// Indicator whether this `Property` is listed for sale.
    pub fn is_for_sale(&self) -> bool {
        self.0.is_for_sale
    }

    /// Monthly rent of this `Property`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.rent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn rent(&self) -> Price {
        self.0.rent.clone()
    }

    /// Sale price of this `Property` in minor units of its rent currency.
    ///
    /// Always `0` when this `Property` is not for sale.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.salePrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn sale_price(&self) -> Cents {
        self.0.sale_price.into()
    }

    /// `DateTime` when this `Property` was registered.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Property` was deleted.
    ///
    /// `null` while this `Property` is listed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Property.deletedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn deleted_at(&self) -> Option<DateTime> {
        self.0.deleted_at.map(DateTimeOf::coerce)
    }
}

/// Unique identifier of a `Property`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::property::Id)]
#[into(domain::property::Id)]
#[graphql(name = "PropertyId", transparent)]
pub struct Id(Uuid);

/// Code of a `Property`: ten hexadecimal digits, like `0A1B2C3D4E`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PropertyCode",
    with = scalar::Via::<domain::property::Code>,
)]
pub struct Code(domain::property::Code);

/// Amount of money in minor units (cents), encoded as a string to keep
/// 64-bit precision.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "Cents", with = scalar::Via::<i64>)]
pub struct Cents(i64);

/// Type of a `Property`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum PropertyType {
    /// An apartment in a building.
    Apartment,

    /// A standalone house.
    House,
}

impl From<domain::property::Kind> for PropertyType {
    fn from(kind: domain::property::Kind) -> Self {
        use domain::property::Kind as K;
        match kind {
            K::Apartment => Self::Apartment,
            K::House => Self::House,
        }
    }
}

impl From<PropertyType> for domain::property::Kind {
    fn from(kind: PropertyType) -> Self {
        match kind {
            PropertyType::Apartment => Self::Apartment,
            PropertyType::House => Self::House,
        }
    }
}

/// Attributes of a new `Property`.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct RegisterPropertyInput {
    /// Type of the `Property`: `apartment` or `house`, in any case.
    pub property_type: String,

    /// Neighborhood the `Property` is located in.
    pub neighborhood: String,

    /// City the `Property` is located in.
    pub city: String,

    /// Description of the `Property`.
    pub description: String,

    /// Monthly rent in minor units of the `rentCurrency`.
    ///
    /// Defaults to `0`.
    pub rent_amount: Option<Cents>,

    /// Three-letter code of the rent currency, like `USD`.
    pub rent_currency: String,

    /// Number of bedrooms.
    pub bedrooms: i32,

    /// Number of bathrooms.
    pub bathrooms: i32,

    /// Area in square meters.
    pub area: f64,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// Indicator whether the `Property` is listed for rent.
    pub is_for_rent: bool,

    /// Indicator whether the `Property` is listed for sale.
    pub is_for_sale: bool,

    /// Sale price in minor units of the `rentCurrency`.
    ///
    /// Defaults to `0`, and must stay `0` unless `isForSale` is set.
    pub sale_price: Option<Cents>,
}

impl From<RegisterPropertyInput> for domain::property::Draft {
    fn from(input: RegisterPropertyInput) -> Self {
        let RegisterPropertyInput {
            property_type,
            neighborhood,
            city,
            description,
            rent_amount,
            rent_currency,
            bedrooms,
            bathrooms,
            area,
            latitude,
            longitude,
            is_for_rent,
            is_for_sale,
            sale_price,
        } = input;

        Self {
            property_type,
            neighborhood,
            city,
            description,
            rent_amount: rent_amount.map_or(0, Into::into),
            rent_currency,
            bedrooms,
            bathrooms,
            area,
            latitude,
            longitude,
            is_for_rent,
            is_for_sale,
            sale_price: sale_price.map_or(0, Into::into),
        }
    }
}

/// Filter of a `Property` search.
///
/// Omitted fields are not constrained. Text fields match any `Property`
/// containing them, ignoring case.
#[derive(Clone, Debug, Default, GraphQLInputObject)]
pub struct PropertyFilter {
    /// Exact type of the `Property`.
    pub property_type: Option<PropertyType>,

    /// Substring of the neighborhood.
    pub neighborhood: Option<String>,

    /// Substring of the city.
    pub city: Option<String>,

    /// Exact rent listing indicator.
    pub is_for_rent: Option<bool>,

    /// Exact sale listing indicator.
    pub is_for_sale: Option<bool>,

    /// Exact rent amount in minor units.
    pub rent_amount: Option<Cents>,

    /// Exact sale price in minor units.
    pub sale_price: Option<Cents>,

    /// Exact area in square meters.
    pub area: Option<f64>,
}

impl From<PropertyFilter> for read::property::Filter {
    fn from(filter: PropertyFilter) -> Self {
        let PropertyFilter {
            property_type,
            neighborhood,
            city,
            is_for_rent,
            is_for_sale,
            rent_amount,
            sale_price,
            area,
        } = filter;

        Self {
            property_type: property_type.map(Into::into),
            neighborhood,
            city,
            is_for_rent,
            is_for_sale,
            rent_amount: rent_amount.map(Into::into),
            sale_price: sale_price.map(Into::into),
            area,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use service::{domain, read};

    use super::{
        Cents, Property, PropertyFilter, PropertyType, RegisterPropertyInput,
    };

    fn input() -> RegisterPropertyInput {
        RegisterPropertyInput {
            property_type: "apartment".into(),
            neighborhood: "Central".into(),
            city: "Metropolis".into(),
            description: "Sunny flat".into(),
            rent_amount: Some(Cents(120_000)),
            rent_currency: "USD".into(),
            bedrooms: 2,
            bathrooms: 1,
            area: 55.5,
            latitude: 10.0,
            longitude: 20.0,
            is_for_rent: true,
            is_for_sale: false,
            sale_price: None,
        }
    }

    #[test]
    fn input_becomes_draft() {
        let draft = domain::property::Draft::from(input());

        assert_eq!(draft.rent_amount, 120_000);
        assert_eq!(draft.sale_price, 0);
        assert_eq!(draft.city, "Metropolis");
        assert!(draft.check().is_ok());
    }

    #[test]
    fn omitted_amounts_default_to_zero() {
        let draft = domain::property::Draft::from(RegisterPropertyInput {
            rent_amount: None,
            ..input()
        });

        assert_eq!(draft.rent_amount, 0);
    }

    #[test]
    fn deleted_at_is_exposed_once_set() {
        let mut property =
            domain::Property::new(&domain::property::Draft::from(input()))
                .unwrap();
        assert!(Property::from(property.clone()).deleted_at().is_none());

        let at = DateTime::now();
        property.deleted_at = Some(at.coerce());

        assert_eq!(
            Property::from(property).deleted_at().map(|d| d.to_rfc3339()),
            Some(at.to_rfc3339()),
        );
    }

    #[test]
    fn filter_keeps_only_provided_fields() {
        let filter = read::property::Filter::from(PropertyFilter {
            property_type: Some(PropertyType::House),
            neighborhood: Some("down".into()),
            sale_price: Some(Cents(0)),
            ..PropertyFilter::default()
        });

        assert_eq!(
            filter,
            read::property::Filter {
                property_type: Some(domain::property::Kind::House),
                neighborhood: Some("down".into()),
                sale_price: Some(0),
                ..read::property::Filter::default()
            },
        );
        assert!(read::property::Filter::from(PropertyFilter::default())
            .is_empty());
    }
}
