//! [`Conditions`] of a [`Property`] search query.
//!
//! A [`read::property::Filter`] is turned into an ordered list of
//! [`Predicate`]s, which is rendered once into a SQL fragment with numbered
//! placeholders. The [`Conditions::arguments()`] follow the very same order,
//! so placeholders and bound values cannot drift apart.

use std::error::Error as StdError;

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{private::BytesMut, IsNull, ToSql, Type};

#[cfg(doc)]
use crate::domain::Property;
use crate::{domain::property, read};

use super::LikePattern;

/// Column of the `properties` table constrained by a [`Predicate`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Column {
    /// `property_type` column.
    #[display("property_type")]
    PropertyType,

    /// `is_for_rent` column.
    #[display("is_for_rent")]
    IsForRent,

    /// `is_for_sale` column.
    #[display("is_for_sale")]
    IsForSale,

    /// `neighborhood` column.
    #[display("neighborhood")]
    Neighborhood,

    /// `city` column.
    #[display("city")]
    City,

    /// `rent_amount` column.
    #[display("rent_amount")]
    RentAmount,

    /// `sale_price` column.
    #[display("sale_price")]
    SalePrice,

    /// `area` column.
    #[display("area")]
    Area,
}

/// Comparison operator of a [`Predicate`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Operator {
    /// Exact equality.
    #[display("=")]
    Eq,

    /// Case-insensitive [`LikePattern`] match.
    #[display("ILIKE")]
    ILike,
}

/// Value bound to a [`Predicate`] placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    /// `INT2` encoded [`property::Kind`].
    Kind(property::Kind),

    /// `BOOL` value.
    Bool(bool),

    /// `VARCHAR` [`LikePattern`].
    Pattern(LikePattern),

    /// `INT8` value.
    Int8(i64),

    /// `FLOAT8` value.
    Float8(f64),
}

impl Argument {
    /// Returns the SQL type this [`Argument`] is cast to.
    #[must_use]
    pub const fn sql_type(&self) -> &'static str {
        match self {
            Self::Kind(_) => "INT2",
            Self::Bool(_) => "BOOL",
            Self::Pattern(_) => "VARCHAR",
            Self::Int8(_) => "INT8",
            Self::Float8(_) => "FLOAT8",
        }
    }
}

impl ToSql for Argument {
    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        match self {
            Self::Kind(v) => v.to_sql(ty, w),
            Self::Bool(v) => v.to_sql(ty, w),
            Self::Pattern(v) => v.to_sql(ty, w),
            Self::Int8(v) => v.to_sql(ty, w),
            Self::Float8(v) => v.to_sql(ty, w),
        }
    }

    fn accepts(_: &Type) -> bool {
        // Checked per variant in `to_sql_checked()`.
        true
    }

    fn to_sql_checked(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        match self {
            Self::Kind(v) => v.to_sql_checked(ty, w),
            Self::Bool(v) => v.to_sql_checked(ty, w),
            Self::Pattern(v) => v.to_sql_checked(ty, w),
            Self::Int8(v) => v.to_sql_checked(ty, w),
            Self::Float8(v) => v.to_sql_checked(ty, w),
        }
    }
}

/// Single `{column} {operator} ${n}::{type}` condition.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    /// [`Column`] being constrained.
    pub column: Column,

    /// [`Operator`] comparing the [`Column`] with the [`Argument`].
    pub operator: Operator,

    /// [`Argument`] the [`Column`] is compared with.
    pub argument: Argument,
}

impl Predicate {
    /// Creates a new [`Operator::Eq`] [`Predicate`].
    const fn equals(column: Column, argument: Argument) -> Self {
        Self {
            column,
            operator: Operator::Eq,
            argument,
        }
    }

    /// Creates a new [`Operator::ILike`] [`Predicate`] matching the provided
    /// `substring`.
    fn contains(column: Column, substring: &str) -> Self {
        Self {
            column,
            operator: Operator::ILike,
            argument: Argument::Pattern(LikePattern::contains(substring)),
        }
    }
}

/// Conjunction of [`Predicate`]s over non-deleted [`Property`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conditions {
    /// [`Predicate`]s in the order of their placeholders.
    predicates: Vec<Predicate>,
}

impl Conditions {
    /// Condition every non-deleted [`Property`] satisfies.
    pub const BASE: &'static str = "deleted_at IS NULL";

    /// Builds new [`Conditions`] out of the provided
    /// [`read::property::Filter`].
    #[must_use]
    pub fn new(filter: &read::property::Filter) -> Self {
        use Argument as A;
        use Column as C;
        use Predicate as P;

        let read::property::Filter {
            property_type,
            neighborhood,
            city,
            is_for_rent,
            is_for_sale,
            rent_amount,
            sale_price,
            area,
        } = filter;

        let predicates = [
            property_type.map(|k| P::equals(C::PropertyType, A::Kind(k))),
            is_for_rent.map(|v| P::equals(C::IsForRent, A::Bool(v))),
            is_for_sale.map(|v| P::equals(C::IsForSale, A::Bool(v))),
            neighborhood
                .as_deref()
                .map(|n| P::contains(C::Neighborhood, n)),
            city.as_deref().map(|c| P::contains(C::City, c)),
            rent_amount.map(|a| P::equals(C::RentAmount, A::Int8(a))),
            sale_price.map(|p| P::equals(C::SalePrice, A::Int8(p))),
            area.map(|a| P::equals(C::Area, A::Float8(a))),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self { predicates }
    }

    /// Returns [`Predicate`]s of these [`Conditions`] in the order of their
    /// placeholders.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Renders these [`Conditions`] as a SQL boolean expression.
    ///
    /// Placeholders are numbered from `offset + 1`, so the expression can be
    /// appended to a statement already binding `offset` parameters.
    #[must_use]
    pub fn to_sql(&self, offset: usize) -> String {
        format!(
            "{}{}",
            Self::BASE,
            self.predicates.iter().enumerate().format_with(
                "",
                |(i, p), f| {
                    f(&format_args!(
                        " AND {} {} ${}::{}",
                        p.column,
                        p.operator,
                        offset + i + 1,
                        p.argument.sql_type(),
                    ))
                },
            ),
        )
    }

    /// Returns the values to bind to the placeholders rendered by
    /// [`Conditions::to_sql()`].
    #[must_use]
    pub fn arguments(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.predicates
            .iter()
            .map(|p| -> &(dyn ToSql + Sync) { &p.argument })
            .collect()
    }
}

#[cfg(test)]
mod spec {
    use crate::{domain::property, read::property::Filter};

    use super::{Argument, Column, Conditions, LikePattern, Operator};

    #[test]
    fn empty_filter_selects_all_alive() {
        let conds = Conditions::new(&Filter::default());

        assert_eq!(conds.to_sql(0), "deleted_at IS NULL");
        assert!(conds.arguments().is_empty());
    }

    #[test]
    fn numbers_placeholders_in_order() {
        let conds = Conditions::new(&Filter {
            property_type: Some(property::Kind::House),
            neighborhood: Some("down".into()),
            city: Some("Metro".into()),
            is_for_rent: Some(true),
            is_for_sale: Some(false),
            rent_amount: Some(1200),
            sale_price: Some(0),
            area: Some(55.5),
        });

        assert_eq!(
            conds.to_sql(0),
            "deleted_at IS NULL \
             AND property_type = $1::INT2 \
             AND is_for_rent = $2::BOOL \
             AND is_for_sale = $3::BOOL \
             AND neighborhood ILIKE $4::VARCHAR \
             AND city ILIKE $5::VARCHAR \
             AND rent_amount = $6::INT8 \
             AND sale_price = $7::INT8 \
             AND area = $8::FLOAT8",
        );
        assert_eq!(conds.arguments().len(), 8);

        let arguments = conds
            .predicates()
            .iter()
            .map(|p| p.argument.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            arguments,
            [
                Argument::Kind(property::Kind::House),
                Argument::Bool(true),
                Argument::Bool(false),
                Argument::Pattern(LikePattern::contains("down")),
                Argument::Pattern(LikePattern::contains("Metro")),
                Argument::Int8(1200),
                Argument::Int8(0),
                Argument::Float8(55.5),
            ],
        );
    }

    #[test]
    fn skips_unset_fields() {
        let conds = Conditions::new(&Filter {
            city: Some("Metro".into()),
            sale_price: Some(100),
            ..Filter::default()
        });

        assert_eq!(
            conds.to_sql(0),
            "deleted_at IS NULL \
             AND city ILIKE $1::VARCHAR \
             AND sale_price = $2::INT8",
        );
        assert_eq!(conds.predicates()[0].column, Column::City);
        assert_eq!(conds.predicates()[0].operator, Operator::ILike);
        assert_eq!(conds.predicates()[1].operator, Operator::Eq);
    }

    #[test]
    fn respects_offset() {
        let conds = Conditions::new(&Filter {
            is_for_sale: Some(true),
            ..Filter::default()
        });

        assert_eq!(
            conds.to_sql(2),
            "deleted_at IS NULL AND is_for_sale = $3::BOOL",
        );
    }
}
