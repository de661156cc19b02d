//! [`Property`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    Price,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{property, Property},
    infra::{
        database::{
            self,
            postgres::{self, Conditions, Connection},
            Postgres,
        },
        Database,
    },
    read,
};

/// Columns of the `properties` table in the order [`decode()`] expects.
macro_rules! columns {
    () => {
        "id, code, name, property_type, \
         neighborhood, city, description, \
         bedrooms, bathrooms, area, latitude, longitude, \
         is_for_rent, is_for_sale, rent_amount, rent_currency, sale_price, \
         created_at, deleted_at"
    };
}

/// Decodes a [`Property`] out of the provided [`Row`] with the [`columns!`].
fn decode(row: &Row) -> Result<Property, Traced<database::Error>> {
    try_decode(row)
        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
        .map_err(tracerr::map_from)
}

/// Same as [`decode()`], but without tracing.
fn try_decode(row: &Row) -> Result<Property, postgres::connection::Error> {
    Ok(Property {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        property_type: row.try_get("property_type")?,
        neighborhood: row.try_get("neighborhood")?,
        city: row.try_get("city")?,
        description: row.try_get("description")?,
        bedrooms: row.try_get("bedrooms")?,
        bathrooms: row.try_get("bathrooms")?,
        area: row.try_get("area")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        is_for_rent: row.try_get("is_for_rent")?,
        is_for_sale: row.try_get("is_for_sale")?,
        rent: Price {
            amount: row.try_get("rent_amount")?,
            currency: row.try_get("rent_currency")?,
        },
        sale_price: row.try_get("sale_price")?,
        created_at: row.try_get("created_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

impl<C> Database<Insert<Property>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let Property {
            id,
            code,
            name,
            property_type,
            neighborhood,
            city,
            description,
            bedrooms,
            bathrooms,
            area,
            latitude,
            longitude,
            is_for_rent,
            is_for_sale,
            rent: Price {
                amount: rent_amount,
                currency: rent_currency,
            },
            sale_price,
            created_at,
            deleted_at,
        } = property;

        const SQL: &str = concat!(
            "INSERT INTO properties (",
            columns!(),
            ") VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::INT2, \
                $5::VARCHAR, $6::VARCHAR, $7::TEXT, \
                $8::INT4, $9::INT4, $10::FLOAT8, $11::FLOAT8, $12::FLOAT8, \
                $13::BOOL, $14::BOOL, $15::INT8, $16::VARCHAR, $17::INT8, \
                $18::TIMESTAMPTZ, $19::TIMESTAMPTZ\
            )",
        );
        self.exec(
            SQL,
            &[
                &id,
                &code,
                &name,
                &property_type,
                &neighborhood,
                &city,
                &description,
                &bedrooms,
                &bathrooms,
                &area,
                &latitude,
                &longitude,
                &is_for_rent,
                &is_for_sale,
                &rent_amount,
                &rent_currency,
                &sale_price,
                &created_at,
                &deleted_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Option<Property>, property::Code>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code: property::Code = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM properties \
              WHERE code = $1::VARCHAR \
                AND deleted_at IS NULL \
              LIMIT 1",
        );
        self.query_opt(SQL, &[&code])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(decode)
            .transpose()
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Property>, read::property::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Property>, read::property::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let conditions = Conditions::new(by.as_inner());

        let sql = format!(
            concat!(
                "SELECT ",
                columns!(),
                " FROM properties \
                  WHERE {conditions} \
                  ORDER BY created_at, id",
            ),
            conditions = conditions.to_sql(0),
        );
        self.query(&sql, &conditions.arguments())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(decode)
            .collect::<Result<_, _>>()
            .map_err(tracerr::wrap!())
    }
}
