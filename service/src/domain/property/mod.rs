//! [`Property`] definitions.

pub mod code;
pub mod draft;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Price};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::{
    code::Code,
    draft::{CreationError, Draft, ValidationError},
};

/// Real-estate property listed for rent, for sale or both.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// Human-shareable [`Code`] of this [`Property`].
    pub code: Code,

    /// [`Name`] of this [`Property`] derived from its attributes.
    pub name: Name,

    /// [`Kind`] of this [`Property`].
    pub property_type: Kind,

    /// [`Neighborhood`] this [`Property`] is located in.
    pub neighborhood: Neighborhood,

    /// [`City`] this [`Property`] is located in.
    pub city: City,

    /// [`Description`] of this [`Property`].
    pub description: Description,

    /// Number of bedrooms in this [`Property`].
    pub bedrooms: i32,

    /// Number of bathrooms in this [`Property`].
    pub bathrooms: i32,

    /// Area of this [`Property`] in square meters.
    pub area: f64,

    /// Latitude of this [`Property`] in degrees.
    pub latitude: f64,

    /// Longitude of this [`Property`] in degrees.
    pub longitude: f64,

    /// Indicator whether this [`Property`] is listed for rent.
    pub is_for_rent: bool,

    /// Indicator whether this [`Property`] is listed for sale.
    pub is_for_sale: bool,

    /// Monthly rent of this [`Property`].
    pub rent: Price,

    /// Sale price of this [`Property`] in minor units of its rent currency.
    ///
    /// Always `0` when this [`Property`] is not for sale.
    pub sale_price: i64,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Property`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,
}

/// ID of a [`Property`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Kind of a [`Property`]."]
    enum Kind {
        #[doc = "An apartment in a building."]
        Apartment = 1,

        #[doc = "A standalone house."]
        House = 2,
    }
}

/// Neighborhood of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Neighborhood(String);

impl Neighborhood {
    /// Creates a new [`Neighborhood`] if the given `neighborhood` is not
    /// blank.
    #[must_use]
    pub fn new(neighborhood: impl Into<String>) -> Option<Self> {
        let neighborhood = neighborhood.into();
        is_filled(&neighborhood).then_some(Self(neighborhood))
    }
}

impl FromStr for Neighborhood {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Neighborhood`")
    }
}

/// City of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct City(String);

impl City {
    /// Creates a new [`City`] if the given `city` is not blank.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        is_filled(&city).then_some(Self(city))
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `City`")
    }
}

/// Free-form description of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `description` is not
    /// blank.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        is_filled(&description).then_some(Self(description))
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Name of a [`Property`].
///
/// Not unique: two properties of the same [`Kind`] and layout in the same
/// [`Neighborhood`] share it.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is not blank.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        is_filled(&name).then_some(Self(name))
    }

    /// Creates a new [`Name`] in the
    /// `{kind}-{city}-{neighborhood}-{bedrooms}-{bathrooms}` format.
    #[must_use]
    pub fn from_parts(
        kind: Kind,
        city: &City,
        neighborhood: &Neighborhood,
        bedrooms: i32,
        bathrooms: i32,
    ) -> Self {
        Self(format!(
            "{kind}-{city}-{neighborhood}-{bedrooms}-{bathrooms}",
        ))
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Checks whether the given text contains anything besides whitespaces.
fn is_filled(text: &str) -> bool {
    !text.trim().is_empty()
}

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

/// [`DateTime`] when a [`Property`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Property, unit::Deletion)>;
