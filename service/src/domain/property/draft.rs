//! [`Draft`] of a [`Property`] and its validation.

use std::str::FromStr as _;

use common::{Currency, DateTime, Price};
use derive_more::{Display, Error, From};

use super::{
    code::{self, Code},
    City, Description, Id, Kind, Name, Neighborhood, Property,
};

/// Unvalidated attributes of a new [`Property`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Draft {
    /// Raw [`Kind`] of the [`Property`] (`apartment` or `house`).
    pub property_type: String,

    /// Raw [`Neighborhood`] of the [`Property`].
    pub neighborhood: String,

    /// Raw [`City`] of the [`Property`].
    pub city: String,

    /// Raw [`Description`] of the [`Property`].
    pub description: String,

    /// Rent amount in minor units of the [`Draft::rent_currency`].
    pub rent_amount: i64,

    /// Raw [`Currency`] of the rent.
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

    /// Indicator whether the [`Property`] is listed for rent.
    pub is_for_rent: bool,

    /// Indicator whether the [`Property`] is listed for sale.
    pub is_for_sale: bool,

    /// Sale price in minor units of the [`Draft::rent_currency`].
    pub sale_price: i64,
}

/// Validated [`Draft`] missing only the generated attributes.
struct Checked {
    property_type: Kind,
    neighborhood: Neighborhood,
    city: City,
    description: Description,
    rent: Price,
}

impl Draft {
    /// Checks this [`Draft`] against the [`Property`] rules.
    ///
    /// Rules are checked in a fixed order and the first broken one is
    /// reported.
    ///
    /// # Errors
    ///
    /// With the [`ValidationError`] of the first broken rule.
    pub fn check(&self) -> Result<(), ValidationError> {
        self.validate().map(drop)
    }

    /// Validates this [`Draft`] and parses its raw attributes.
    fn validate(&self) -> Result<Checked, ValidationError> {
        use ValidationError as E;

        if !self.is_for_rent && !self.is_for_sale {
            return Err(E::NotListed);
        }
        if self.rent_amount < 0 && !self.is_for_rent {
            return Err(E::NotForRent);
        }

        let neighborhood = Neighborhood::new(self.neighborhood.as_str())
            .ok_or(E::EmptyNeighborhood)?;
        let city = City::new(self.city.as_str()).ok_or(E::EmptyCity)?;
        let description = Description::new(self.description.as_str())
            .ok_or(E::EmptyDescription)?;

        if self.rent_amount < 0 {
            return Err(E::InvalidRentAmount);
        }
        let currency =
            Currency::new(&self.rent_currency).ok_or(E::InvalidCurrency)?;

        if self.bedrooms < 0 {
            return Err(E::NegativeBedrooms);
        }
        if self.bathrooms < 0 {
            return Err(E::NegativeBathrooms);
        }
        if self.area.is_nan() || self.area <= 0.0 {
            return Err(E::InvalidArea);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(E::InvalidLatitude);
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(E::InvalidLongitude);
        }

        if self.is_for_sale && self.sale_price < 0 {
            return Err(E::NegativeSalePrice);
        }
        if !self.is_for_sale && self.sale_price != 0 {
            return Err(E::SalePriceNotForSale);
        }

        let property_type = Kind::from_str(self.property_type.trim())
            .map_err(|_| E::UnknownPropertyType)?;

        Ok(Checked {
            property_type,
            neighborhood,
            city,
            description,
            rent: Price {
                amount: self.rent_amount,
                currency,
            },
        })
    }
}

impl Property {
    /// Creates a new [`Property`] out of the provided [`Draft`], issuing a
    /// random [`Code`] for it.
    ///
    /// # Errors
    ///
    /// - [`CreationError::Invalid`] if the [`Draft`] breaks any rule.
    /// - [`CreationError::Code`] if no [`Code`] could be generated.
    pub fn new(draft: &Draft) -> Result<Self, CreationError> {
        Self::with_code(draft, Code::generate)
    }

    /// Creates a new [`Property`] out of the provided [`Draft`], issuing its
    /// [`Code`] with the provided function.
    ///
    /// The function is not called if the [`Draft`] is invalid.
    ///
    /// # Errors
    ///
    /// - [`CreationError::Invalid`] if the [`Draft`] breaks any rule.
    /// - [`CreationError::Code`] if the function fails.
    pub fn with_code(
        draft: &Draft,
        issue: impl FnOnce() -> Result<Code, code::GenerationError>,
    ) -> Result<Self, CreationError> {
        let Checked {
            property_type,
            neighborhood,
            city,
            description,
            rent,
        } = draft.validate()?;
        let code = issue()?;

        Ok(Self {
            id: Id::new(),
            code,
            name: Name::from_parts(
                property_type,
                &city,
                &neighborhood,
                draft.bedrooms,
                draft.bathrooms,
            ),
            property_type,
            neighborhood,
            city,
            description,
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            area: draft.area,
            latitude: draft.latitude,
            longitude: draft.longitude,
            is_for_rent: draft.is_for_rent,
            is_for_sale: draft.is_for_sale,
            rent,
            sale_price: draft.sale_price,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        })
    }
}

/// Broken [`Property`] rule.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum ValidationError {
    /// [`Property`] is listed neither for rent nor for sale.
    #[display("`Property` must be listed for rent or for sale")]
    NotListed,

    /// Negative rent of a [`Property`] not listed for rent.
    #[display("`Property` is not for rent, but has a negative rent")]
    NotForRent,

    /// Blank [`Neighborhood`].
    #[display("`Neighborhood` must not be empty")]
    EmptyNeighborhood,

    /// Blank [`City`].
    #[display("`City` must not be empty")]
    EmptyCity,

    /// Blank [`Description`].
    #[display("`Description` must not be empty")]
    EmptyDescription,

    /// Negative rent.
    #[display("rent amount must not be negative")]
    InvalidRentAmount,

    /// Rent [`Currency`] is not a three-letter code.
    #[display("rent currency must be a three-letter code")]
    InvalidCurrency,

    /// Negative number of bedrooms.
    #[display("number of bedrooms must not be negative")]
    NegativeBedrooms,

    /// Negative number of bathrooms.
    #[display("number of bathrooms must not be negative")]
    NegativeBathrooms,

    /// Area is not a positive number.
    #[display("area must be positive")]
    InvalidArea,

    /// Latitude is out of the `[-90, 90]` range.
    #[display("latitude must be within [-90, 90]")]
    InvalidLatitude,

    /// Longitude is out of the `[-180, 180]` range.
    #[display("longitude must be within [-180, 180]")]
    InvalidLongitude,

    /// Negative sale price of a [`Property`] listed for sale.
    #[display("sale price must not be negative")]
    NegativeSalePrice,

    /// Non-zero sale price of a [`Property`] not listed for sale.
    #[display("`Property` is not for sale, but has a sale price")]
    SalePriceNotForSale,

    /// Property type is not a known [`Kind`].
    #[display("unknown property type")]
    UnknownPropertyType,
}

/// Error of creating a new [`Property`].
#[derive(Debug, Display, Error, From)]
pub enum CreationError {
    /// [`Draft`] breaks a [`Property`] rule.
    #[display("invalid `Property`: {_0}")]
    Invalid(ValidationError),

    /// [`Code`] could not be issued.
    Code(code::GenerationError),
}

#[cfg(test)]
mod spec {
    use common::Currency;

    use super::{
        super::{code::ALPHABET, Code, Kind, Property},
        CreationError, Draft, ValidationError,
    };

    fn metropolis() -> Draft {
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

    fn invalid(draft: &Draft) -> ValidationError {
        match Property::new(draft).unwrap_err() {
            CreationError::Invalid(e) => e,
            CreationError::Code(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn creates_valid() {
        let property = Property::new(&metropolis()).unwrap();

        assert_eq!(property.property_type, Kind::Apartment);
        assert_eq!(property.city.to_string(), "Metropolis");
        assert_eq!(property.rent.amount, 1200);
        assert_eq!(property.rent.currency, Currency::new("USD").unwrap());
        assert_eq!(property.name.to_string(), "apartment-Metropolis-Central-2-1");
        assert!(property.deleted_at.is_none());

        let code = property.code.to_string();
        assert_eq!(code.len(), 10);
        assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn not_listed_is_checked_first() {
        let draft = Draft {
            is_for_rent: false,
            is_for_sale: false,
            city: String::new(),
            area: -1.0,
            property_type: "castle".into(),
            ..metropolis()
        };

        assert_eq!(invalid(&draft), ValidationError::NotListed);
    }

    #[test]
    fn rejects_negative_rent_when_not_for_rent() {
        let draft = Draft {
            is_for_rent: false,
            is_for_sale: true,
            rent_amount: -1,
            sale_price: 100,
            ..metropolis()
        };

        assert_eq!(invalid(&draft), ValidationError::NotForRent);
    }

    #[test]
    fn rejects_negative_rent_when_for_rent() {
        let draft = Draft {
            rent_amount: -1,
            ..metropolis()
        };

        assert_eq!(invalid(&draft), ValidationError::InvalidRentAmount);
    }

    #[test]
    fn rejects_blank_texts_in_order() {
        let draft = Draft {
            neighborhood: " ".into(),
            city: String::new(),
            ..metropolis()
        };
        assert_eq!(invalid(&draft), ValidationError::EmptyNeighborhood);

        let draft = Draft {
            city: String::new(),
            ..metropolis()
        };
        assert_eq!(invalid(&draft), ValidationError::EmptyCity);

        let draft = Draft {
            description: String::new(),
            ..metropolis()
        };
        assert_eq!(invalid(&draft), ValidationError::EmptyDescription);
    }

    #[test]
    fn rejects_invalid_currency() {
        for currency in ["", "US", "DOLLAR"] {
            let draft = Draft {
                rent_currency: currency.into(),
                ..metropolis()
            };

            assert_eq!(invalid(&draft), ValidationError::InvalidCurrency);
        }
    }

    #[test]
    fn rejects_invalid_measures() {
        let cases = [
            (Draft { bedrooms: -1, ..metropolis() }, ValidationError::NegativeBedrooms),
            (Draft { bathrooms: -1, ..metropolis() }, ValidationError::NegativeBathrooms),
            (Draft { area: 0.0, ..metropolis() }, ValidationError::InvalidArea),
            (Draft { area: f64::NAN, ..metropolis() }, ValidationError::InvalidArea),
            (Draft { latitude: 90.5, ..metropolis() }, ValidationError::InvalidLatitude),
            (Draft { latitude: f64::NAN, ..metropolis() }, ValidationError::InvalidLatitude),
            (Draft { longitude: -180.5, ..metropolis() }, ValidationError::InvalidLongitude),
        ];

        for (draft, expected) in cases {
            assert_eq!(invalid(&draft), expected);
        }
    }

    #[test]
    fn accepts_boundary_coordinates() {
        let draft = Draft {
            latitude: -90.0,
            longitude: 180.0,
            ..metropolis()
        };

        assert!(Property::new(&draft).is_ok());
    }

    #[test]
    fn checks_sale_price() {
        let draft = Draft {
            is_for_sale: true,
            sale_price: -5,
            ..metropolis()
        };
        assert_eq!(invalid(&draft), ValidationError::NegativeSalePrice);

        let draft = Draft {
            sale_price: 100_000,
            ..metropolis()
        };
        assert_eq!(invalid(&draft), ValidationError::SalePriceNotForSale);

        let draft = Draft {
            is_for_sale: true,
            sale_price: 100_000,
            ..metropolis()
        };
        assert_eq!(Property::new(&draft).unwrap().sale_price, 100_000);
    }

    #[test]
    fn parses_property_type_case_insensitively() {
        let draft = Draft {
            property_type: "HOUSE".into(),
            ..metropolis()
        };
        assert_eq!(Property::new(&draft).unwrap().property_type, Kind::House);

        let draft = Draft {
            property_type: "castle".into(),
            ..metropolis()
        };
        assert_eq!(invalid(&draft), ValidationError::UnknownPropertyType);
    }

    #[test]
    fn does_not_issue_code_for_invalid() {
        let draft = Draft {
            city: String::new(),
            ..metropolis()
        };

        let res = Property::with_code(&draft, || -> Result<Code, _> {
            panic!("code must not be issued")
        });

        assert!(matches!(
            res,
            Err(CreationError::Invalid(ValidationError::EmptyCity)),
        ));
    }
}
