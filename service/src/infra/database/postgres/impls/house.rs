//! [`House`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{house, House},
    infra::{
        database::{
            self,
            postgres::{Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Columns of the `houses` table, in [`house_from_row`] order.
const COLUMNS: &str = "\
    id, landlord_id, title, description, category, \
    price, price_currency, \
    num_rooms, total_units, available_units, \
    location, latitude, longitude, amenities, \
    contact_phone, contact_email, \
    created_at, updated_at";

/// Reconstructs a [`House`] from the provided [`Row`].
fn house_from_row(row: &Row) -> House {
    House {
        id: row.get("id"),
        landlord_id: row.get("landlord_id"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        price: Money {
            amount: row.get("price"),
            currency: row.get("price_currency"),
        },
        num_rooms: u16::try_from(row.get::<_, i32>("num_rooms"))
            .expect("`num_rooms` overflow"),
        total_units: u16::try_from(row.get::<_, i32>("total_units"))
            .expect("`total_units` overflow"),
        available_units: u16::try_from(row.get::<_, i32>("available_units"))
            .expect("`available_units` overflow"),
        location: row.get("location"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        amenities: row
            .get::<_, String>("amenities")
            .parse()
            .expect("valid `Amenities`"),
        contact_phone: row.get("contact_phone"),
        contact_email: row.get("contact_email"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<house::Id, House>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[house::Id]>,
{
    type Ok = HashMap<house::Id, House>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<house::Id, House>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[house::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM houses \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let house = house_from_row(row);
                (house.id, house)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<House>, house::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<house::Id, House>, [house::Id; 1]>>,
        Ok = HashMap<house::Id, House>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<House>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<House>, house::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<House>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<House>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(house): Insert<House>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(house)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<House>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(house): Update<House>,
    ) -> Result<Self::Ok, Self::Err> {
        let House {
            id,
            landlord_id,
            title,
            description,
            category,
            price,
            num_rooms,
            total_units,
            available_units,
            location,
            latitude,
            longitude,
            amenities,
            contact_phone,
            contact_email,
            created_at,
            updated_at,
        } = house;

        let num_rooms = i32::from(num_rooms);
        let total_units = i32::from(total_units);
        let available_units = i32::from(available_units);
        let amenities = amenities.to_string();

        const SQL: &str = "\
            INSERT INTO houses (\
                id, landlord_id, title, description, category, \
                price, price_currency, \
                num_rooms, total_units, available_units, \
                location, latitude, longitude, amenities, \
                contact_phone, contact_email, \
                created_at, updated_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, $5::INT2, \
                $6::NUMERIC, $7::INT2, \
                $8::INT4, $9::INT4, $10::INT4, \
                $11::VARCHAR, \
                $12::NUMERIC, $13::NUMERIC, \
                $14::VARCHAR, \
                $15::VARCHAR, $16::VARCHAR, \
                $17::TIMESTAMPTZ, $18::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                category = EXCLUDED.category, \
                price = EXCLUDED.price, \
                price_currency = EXCLUDED.price_currency, \
                num_rooms = EXCLUDED.num_rooms, \
                total_units = EXCLUDED.total_units, \
                available_units = EXCLUDED.available_units, \
                location = EXCLUDED.location, \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude, \
                amenities = EXCLUDED.amenities, \
                contact_phone = EXCLUDED.contact_phone, \
                contact_email = EXCLUDED.contact_email, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &landlord_id,
                &title,
                &description,
                &category,
                &price.amount,
                &price.currency,
                &num_rooms,
                &total_units,
                &available_units,
                &location,
                &latitude,
                &longitude,
                &amenities,
                &contact_phone,
                &contact_email,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<House, house::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<House, house::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: house::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM houses \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<House, house::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<House, house::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: house::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO houses_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<House>, read::house::Filter>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<House>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<House>, read::house::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::house::Filter {
            landlord_id,
            category,
            location,
            only_available,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = Vec::new();

        let landlord_idx = landlord_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let category_idx = category.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let location_pattern =
            location.as_deref().map(LikePattern::new);
        let location_idx = location_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM houses \
             WHERE true \
                   {landlord_filtering} \
                   {category_filtering} \
                   {location_filtering} \
                   {availability_filtering} \
             ORDER BY created_at DESC",
            landlord_filtering =
                landlord_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND landlord_id = ${idx}::UUID"))
                }),
            category_filtering =
                category_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND category = ${idx}::INT2"))
                }),
            location_filtering =
                location_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND location ILIKE ${idx}::VARCHAR"))
                }),
            availability_filtering =
                if only_available { "AND available_units > 0" } else { "" },
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(house_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<House>, read::house::RecentLimit>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<House>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<House>, read::house::RecentLimit>>,
    ) -> Result<Self::Ok, Self::Err> {
        let limit: i32 = by.into_inner().into();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM houses \
             ORDER BY created_at DESC \
             LIMIT $1::INT4",
        );
        Ok(self
            .query(&sql, &[&limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(house_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<read::house::Stats, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::house::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::house::Stats, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT8 AS total, \
                   COUNT(*) FILTER (WHERE category = $1::INT2)::INT8 \
                       AS standalone, \
                   COUNT(*) FILTER (WHERE category = $2::INT2)::INT8 \
                       AS hostels, \
                   COUNT(*) FILTER (WHERE category = $3::INT2)::INT8 \
                       AS apartments, \
                   COUNT(*) FILTER (WHERE category = $4::INT2)::INT8 \
                       AS roommates \
            FROM houses";
        self.query_opt(
            SQL,
            &[
                &house::Category::Standalone,
                &house::Category::Hostel,
                &house::Category::Apartment,
                &house::Category::Roommate,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|row| {
            let row = row.expect("always exists");
            read::house::Stats {
                total: row.get("total"),
                standalone: row.get("standalone"),
                hostels: row.get("hostels"),
                apartments: row.get("apartments"),
                roommates: row.get("roommates"),
            }
        })
    }
}

impl<C> Database<Insert<house::Image>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(image): Insert<house::Image>,
    ) -> Result<Self::Ok, Self::Err> {
        let house::Image {
            id,
            house_id,
            url,
            caption,
            is_primary,
            uploaded_at,
        } = image;

        const SQL: &str = "\
            INSERT INTO house_images (\
                id, house_id, url, caption, is_primary, uploaded_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, \
                $5::BOOL, \
                $6::TIMESTAMPTZ \
            )";
        self.exec(SQL, &[&id, &house_id, &url, &caption, &is_primary, &uploaded_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<house::Image>, house::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<house::Image>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<house::Image>, house::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let house_id: house::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, house_id, url, caption, is_primary, uploaded_at \
            FROM house_images \
            WHERE house_id = $1::UUID \
            ORDER BY is_primary DESC, uploaded_at ASC";
        Ok(self
            .query(SQL, &[&house_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| house::Image {
                id: row.get("id"),
                house_id: row.get("house_id"),
                url: row.get("url"),
                caption: row.get("caption"),
                is_primary: row.get("is_primary"),
                uploaded_at: row.get("uploaded_at"),
            })
            .collect())
    }
}
