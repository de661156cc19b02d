//! [`Property`]-related read definitions.

use derive_more::{Display, Error};

use crate::domain::{property, Property};

/// Filter of a [`Property`] search.
///
/// Every [`None`] field is ignored, so [`Filter::default()`] matches every
/// non-deleted [`Property`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    /// Exact [`property::Kind`].
    pub property_type: Option<property::Kind>,

    /// Substring of the [`property::Neighborhood`], matched ignoring case.
    pub neighborhood: Option<String>,

    /// Substring of the [`property::City`], matched ignoring case.
    pub city: Option<String>,

    /// Exact [`Property::is_for_rent`] indicator.
    pub is_for_rent: Option<bool>,

    /// Exact [`Property::is_for_sale`] indicator.
    pub is_for_sale: Option<bool>,

    /// Exact rent amount in minor units.
    pub rent_amount: Option<i64>,

    /// Exact [`Property::sale_price`].
    pub sale_price: Option<i64>,

    /// Exact [`Property::area`].
    pub area: Option<f64>,
}

impl Filter {
    /// Indicates whether this [`Filter`] sets no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Checks whether the provided [`Property`] satisfies this [`Filter`].
    ///
    /// Deleted [`Property`]s never match.
    #[must_use]
    pub fn matches(&self, property: &Property) -> bool {
        fn contains(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        property.deleted_at.is_none()
            && self.property_type.map_or(true, |k| property.property_type == k)
            && self.is_for_rent.map_or(true, |v| property.is_for_rent == v)
            && self.is_for_sale.map_or(true, |v| property.is_for_sale == v)
            && self
                .neighborhood
                .as_deref()
                .map_or(true, |n| contains(property.neighborhood.as_ref(), n))
            && self
                .city
                .as_deref()
                .map_or(true, |c| contains(property.city.as_ref(), c))
            && self.rent_amount.map_or(true, |a| property.rent.amount == a)
            && self.sale_price.map_or(true, |p| property.sale_price == p)
            && self.area.map_or(true, |a| property.area.total_cmp(&a).is_eq())
    }
}

/// [`Filter`] in a shape where zero values mean "not set".
///
/// Kept for clients using the zero-value convention. It cannot express
/// searching for a zero price, a zero area or a `false` indicator: those
/// are indistinguishable from an unset field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegacyFilter {
    /// [`property::Kind`] name, or empty.
    pub property_type: String,

    /// Neighborhood substring, or empty.
    pub neighborhood: String,

    /// City substring, or empty.
    pub city: String,

    /// Whether to search for rent only.
    pub is_for_rent: bool,

    /// Whether to search for sale only.
    pub is_for_sale: bool,

    /// Rent amount in minor units, or `0`.
    pub rent_amount: i64,

    /// Sale price in minor units, or `0`.
    pub sale_price: i64,

    /// Area, or `0`.
    pub size: f64,
}

impl TryFrom<LegacyFilter> for Filter {
    type Error = UnknownKindError;

    fn try_from(legacy: LegacyFilter) -> Result<Self, Self::Error> {
        fn text(s: String) -> Option<String> {
            (!s.is_empty()).then_some(s)
        }

        fn non_zero(n: i64) -> Option<i64> {
            (n != 0).then_some(n)
        }

        let property_type = if legacy.property_type.is_empty() {
            None
        } else {
            Some(
                legacy
                    .property_type
                    .parse()
                    .map_err(|_| UnknownKindError(legacy.property_type))?,
            )
        };

        Ok(Self {
            property_type,
            neighborhood: text(legacy.neighborhood),
            city: text(legacy.city),
            is_for_rent: legacy.is_for_rent.then_some(true),
            is_for_sale: legacy.is_for_sale.then_some(true),
            rent_amount: non_zero(legacy.rent_amount),
            sale_price: non_zero(legacy.sale_price),
            area: (legacy.size != 0.0).then_some(legacy.size),
        })
    }
}

/// Unknown [`property::Kind`] name in a [`LegacyFilter`].
#[derive(Clone, Debug, Display, Error)]
#[display("unknown property type: `{_0}`")]
pub struct UnknownKindError(#[error(not(source))] pub String);

#[cfg(test)]
mod spec {
    use common::{Currency, DateTime};

    use crate::domain::{property, Property};

    use super::{Filter, LegacyFilter};

    fn listed_in(neighborhood: &str) -> Property {
        Property::new(&property::Draft {
            property_type: "house".into(),
            neighborhood: neighborhood.into(),
            city: "Metropolis".into(),
            description: "Quiet place".into(),
            rent_amount: 90_000,
            rent_currency: "BRL".into(),
            bedrooms: 3,
            bathrooms: 2,
            area: 120.0,
            latitude: -23.5,
            longitude: -46.6,
            is_for_rent: true,
            is_for_sale: false,
            sale_price: 0,
        })
        .unwrap()
    }

    #[test]
    fn empty_matches_everything_alive() {
        let mut deleted = listed_in("Downtown");
        deleted.deleted_at = Some(DateTime::now().coerce());

        assert!(Filter::default().is_empty());
        assert!(Filter::default().matches(&listed_in("Downtown")));
        assert!(!Filter::default().matches(&deleted));
    }

    #[test]
    fn matches_neighborhood_substring_ignoring_case() {
        let filter = Filter {
            neighborhood: Some("down".into()),
            ..Filter::default()
        };

        assert!(filter.matches(&listed_in("Downtown")));
        assert!(filter.matches(&listed_in("Lowndowntown")));
        assert!(!filter.matches(&listed_in("Uptown")));
    }

    #[test]
    fn matches_exact_fields() {
        let p = listed_in("Downtown");
        assert_eq!(p.rent.currency, Currency::new("BRL").unwrap());

        let hit = Filter {
            property_type: Some(property::Kind::House),
            is_for_rent: Some(true),
            rent_amount: Some(90_000),
            area: Some(120.0),
            ..Filter::default()
        };
        assert!(hit.matches(&p));

        let miss = Filter {
            is_for_sale: Some(true),
            ..Filter::default()
        };
        assert!(!miss.matches(&p));
    }

    #[test]
    fn converts_legacy() {
        let filter = Filter::try_from(LegacyFilter {
            property_type: "Apartment".into(),
            city: "metro".into(),
            is_for_sale: true,
            sale_price: 500_000,
            ..LegacyFilter::default()
        })
        .unwrap();

        assert_eq!(
            filter,
            Filter {
                property_type: Some(property::Kind::Apartment),
                city: Some("metro".into()),
                is_for_sale: Some(true),
                sale_price: Some(500_000),
                ..Filter::default()
            },
        );

        assert!(Filter::try_from(LegacyFilter::default()).unwrap().is_empty());
        assert!(Filter::try_from(LegacyFilter {
            property_type: "castle".into(),
            ..LegacyFilter::default()
        })
        .is_err());
    }
}
